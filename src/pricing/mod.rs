//! Price aggregation
//!
//! ```text
//! Product snapshot -> metrics (derive) -> grouping -> sort -> PriceView
//! ```

pub mod metrics;
pub mod grouping;
pub mod sort;
pub mod view;
pub mod history;

pub use metrics::{Currency, DerivedProduct, ExchangeRates};
pub use sort::{SortDirection, SortKey, SortSpec, SortState};
pub use view::{build_view, PriceView};
