//! Tracker server record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Dealer label used when the server omits the dealer name
pub const UNKNOWN_DEALER: &str = "Unknown";

/// Metal category of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Gold,
    Silver,
    #[serde(other)]
    Other,
}

impl Category {
    /// Order in which category sections are presented
    pub const DISPLAY_ORDER: [Category; 3] = [Category::Gold, Category::Silver, Category::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Gold => "gold",
            Category::Silver => "silver",
            Category::Other => "other",
        }
    }

    /// Section title shown above the category table
    pub fn title(&self) -> &'static str {
        match self {
            Category::Gold => "Gold",
            Category::Silver => "Silver",
            Category::Other => "Other",
        }
    }
}

/// Product as returned by `prices.getAll`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub dealer_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dealer_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category: Category,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    /// Zero when the server has no weight; such products have no per-gram price
    #[serde(default, deserialize_with = "null_as_default")]
    pub weight_grams: f64,
    /// Price in euro cents
    #[serde(rename = "priceEur", default, deserialize_with = "null_as_default")]
    pub price_cents: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

impl Product {
    /// Dealer name, falling back to [`UNKNOWN_DEALER`] when blank
    pub fn dealer_label(&self) -> &str {
        if self.dealer_name.trim().is_empty() {
            UNKNOWN_DEALER
        } else {
            &self.dealer_name
        }
    }
}

/// Response of `prices.getLastUpdateTime`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastUpdateInfo {
    /// `None` when the server has never recorded a scrape
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Response of `scraper.updatePrices`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeOutcome {
    pub success: bool,
    #[serde(default)]
    pub updated: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

/// One row of `prices.getPriceHistory`, amounts in euro cents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryRecord {
    pub recorded_at: DateTime<Utc>,
    #[serde(rename = "priceEur")]
    pub price_cents: i64,
    #[serde(rename = "pricePerGramEur")]
    pub price_per_gram_cents: i64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_decodes_wire_names() {
        let product: Product = serde_json::from_value(json!({
            "id": 7,
            "dealerId": 2,
            "dealerName": "Tavex",
            "name": "1 oz Krugerrand",
            "type": "gold",
            "url": "https://example.com/krugerrand",
            "weightGrams": 31.1,
            "priceEur": 250000,
            "status": "active"
        }))
        .unwrap();

        assert_eq!(product.id, 7);
        assert_eq!(product.category, Category::Gold);
        assert_eq!(product.price_cents, 250000);
        assert_eq!(product.dealer_label(), "Tavex");
    }

    #[test]
    fn test_missing_dealer_and_price_use_defaults() {
        let product: Product = serde_json::from_value(json!({
            "id": 1,
            "dealerId": 3,
            "dealerName": null,
            "name": "Silver bar",
            "type": "silver",
            "weightGrams": 1000.0,
            "priceEur": null
        }))
        .unwrap();

        assert_eq!(product.dealer_label(), UNKNOWN_DEALER);
        assert_eq!(product.price_cents, 0);
        assert!(product.status.is_empty());
    }

    #[test]
    fn test_null_weight_does_not_fail_the_whole_list() {
        let products: Vec<Product> = serde_json::from_value(json!([
            {
                "id": 1, "dealerId": 1, "name": "1 oz coin", "type": "gold",
                "weightGrams": 31.1, "priceEur": 250000
            },
            {
                "id": 2, "dealerId": 1, "name": "Mystery bar", "type": "silver",
                "weightGrams": null, "priceEur": 5000
            }
        ]))
        .unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[1].weight_grams, 0.0);
        assert_eq!(crate::pricing::metrics::price_per_gram(&products[1]), None);
    }

    #[test]
    fn test_unknown_category_decodes_as_other() {
        let category: Category = serde_json::from_value(json!("platinum")).unwrap();
        assert_eq!(category, Category::Other);
    }

    #[test]
    fn test_scrape_outcome_tolerates_missing_fields() {
        let outcome: ScrapeOutcome = serde_json::from_value(json!({ "success": false })).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.updated, 0);
        assert!(outcome.message.is_empty());
    }

    #[test]
    fn test_last_update_may_be_null() {
        let info: LastUpdateInfo = serde_json::from_value(json!({ "lastUpdated": null })).unwrap();
        assert!(info.last_updated.is_none());

        let info: LastUpdateInfo =
            serde_json::from_value(json!({ "lastUpdated": "2026-10-19T08:30:00Z" })).unwrap();
        assert!(info.last_updated.is_some());
    }
}
