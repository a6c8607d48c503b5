//! Services Layer
//!
//! Business logic called by the Tauri IPC commands.
//!
//! # Architecture
//!
//! ```text
//! Frontend UI --> Tauri Commands --> Services --> PriceApi / Store / SQLite
//! ```
//!
//! # Services
//!
//! - `PriceService` - Session start, price view, sorting
//! - `RefreshService` - Manual refresh and refresh status
//! - `AlertService` - Price alert dialogs
//! - `HistoryService` - Price history charts
//! - `SettingsService` - Tracker settings

pub mod price_service;
pub mod refresh_service;
pub mod alert_service;
pub mod history_service;
pub mod settings_service;

pub use price_service::{PriceService, SessionStart, StalenessReport};
pub use refresh_service::{RefreshService, RefreshStatus};
pub use alert_service::AlertService;
pub use history_service::{HistoryService, PriceChart};
pub use settings_service::SettingsService;
