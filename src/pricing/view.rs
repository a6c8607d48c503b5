//! Display model for the price tables

use super::grouping::group_by_category;
use super::metrics::{Currency, DerivedProduct, ExchangeRates};
use super::sort::{sort_products, SortSpec};
use crate::api::types::{Category, Product};
use chrono::{DateTime, Utc};
use chrono_tz::Europe::Sofia;
use serde::Serialize;

const LAST_UPDATED_FORMAT: &str = "%d.%m.%Y, %H:%M";

/// One category table
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceGroupView {
    pub category: Category,
    pub title: String,
    pub products: Vec<DerivedProduct>,
}

/// Everything the price page renders
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceView {
    pub groups: Vec<PriceGroupView>,
    pub total: usize,
    /// Show the "no products available" placeholder
    pub is_empty: bool,
    pub sort: Option<SortSpec>,
    pub currency: Currency,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_updated_display: Option<String>,
}

/// Derive, group, then sort each group independently
pub fn build_view(
    products: &[Product],
    sort: Option<SortSpec>,
    rates: &ExchangeRates,
    currency: Currency,
    last_updated: Option<DateTime<Utc>>,
) -> PriceView {
    let derived = products
        .iter()
        .map(|p| DerivedProduct::derive(p, rates, currency));

    let groups: Vec<PriceGroupView> = group_by_category(derived)
        .into_iter()
        .map(|group| PriceGroupView {
            category: group.category,
            title: group.category.title().to_string(),
            products: sort_products(group.items, sort),
        })
        .collect();

    let total = groups.iter().map(|g| g.products.len()).sum();

    PriceView {
        groups,
        total,
        is_empty: total == 0,
        sort,
        currency,
        last_updated,
        last_updated_display: last_updated.map(format_last_updated),
    }
}

/// `dd.mm.yyyy, HH:MM` in Bulgarian local time
pub fn format_last_updated(at: DateTime<Utc>) -> String {
    at.with_timezone(&Sofia).format(LAST_UPDATED_FORMAT).to_string()
}
