//! Table ordering

use super::metrics::DerivedProduct;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Column a product table can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Id,
    Price,
    Weight,
    /// Derived euros-per-gram
    PricePerGram,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Asc,
        }
    }

    /// Spec after clicking `key`: descending only when `key` is already
    /// the active ascending column, ascending otherwise.
    pub fn toggled(current: Option<SortSpec>, key: SortKey) -> SortSpec {
        match current {
            Some(spec) if spec.key == key && spec.direction == SortDirection::Asc => SortSpec {
                key,
                direction: SortDirection::Desc,
            },
            _ => SortSpec::ascending(key),
        }
    }
}

/// Session sort selection; `None` means the default per-gram ordering
#[derive(Debug, Clone, Default)]
pub struct SortState {
    current: Option<SortSpec>,
}

impl SortState {
    pub fn current(&self) -> Option<SortSpec> {
        self.current
    }

    pub fn click(&mut self, key: SortKey) -> SortSpec {
        let next = SortSpec::toggled(self.current, key);
        self.current = Some(next);
        next
    }

    pub fn reset(&mut self) {
        self.current = None;
    }
}

fn sort_value(product: &DerivedProduct, key: SortKey) -> Option<f64> {
    match key {
        SortKey::Id => Some(product.id as f64),
        SortKey::Price => Some(product.price),
        SortKey::Weight => Some(product.weight_grams).filter(|w| !w.is_nan()),
        SortKey::PricePerGram => product.price_per_gram,
    }
}

/// Stable sort by `spec`, or ascending price-per-gram when absent.
///
/// Records without a value for the key keep their relative order after
/// every valued record, whichever the direction.
pub fn sort_products(mut products: Vec<DerivedProduct>, spec: Option<SortSpec>) -> Vec<DerivedProduct> {
    let spec = spec.unwrap_or(SortSpec::ascending(SortKey::PricePerGram));

    products.sort_by(|a, b| match (sort_value(a, spec.key), sort_value(b, spec.key)) {
        (Some(x), Some(y)) => {
            let ordering = x.total_cmp(&y);
            match spec.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    products
}
