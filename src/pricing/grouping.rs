//! Category grouping

use super::metrics::DerivedProduct;
use crate::api::types::{Category, Product};
use serde::Serialize;

/// Anything that belongs to a metal category
pub trait Categorized {
    fn category(&self) -> Category;
}

impl Categorized for Product {
    fn category(&self) -> Category {
        self.category
    }
}

impl Categorized for DerivedProduct {
    fn category(&self) -> Category {
        self.category
    }
}

/// Non-empty run of items sharing a category, in input order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryGroup<T> {
    pub category: Category,
    pub items: Vec<T>,
}

/// Partition items by category.
///
/// Groups follow [`Category::DISPLAY_ORDER`] (gold, silver, then a
/// catch-all for anything unrecognised). Empty categories are omitted.
pub fn group_by_category<T, I>(items: I) -> Vec<CategoryGroup<T>>
where
    T: Categorized,
    I: IntoIterator<Item = T>,
{
    let mut buckets: Vec<CategoryGroup<T>> = Category::DISPLAY_ORDER
        .iter()
        .map(|&category| CategoryGroup {
            category,
            items: Vec::new(),
        })
        .collect();

    for item in items {
        let category = item.category();
        if let Some(bucket) = buckets.iter_mut().find(|b| b.category == category) {
            bucket.items.push(item);
        }
    }

    buckets.retain(|b| !b.items.is_empty());
    buckets
}
