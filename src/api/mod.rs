//! Tracker server API
//!
//! The scraping subsystem and record persistence live on the tracker
//! server. Everything the controller needs from it goes through
//! [`PriceApi`].

pub mod types;
mod http;

pub use http::HttpPriceApi;

use crate::alerts::AlertRequest;
use crate::error::Result;
use async_trait::async_trait;
use types::*;

/// Default number of days of price history shown in charts
pub const DEFAULT_HISTORY_DAYS: u32 = 30;

/// Operations the tracker server exposes to the controller
#[async_trait]
pub trait PriceApi: Send + Sync {
    /// All products with their latest prices (query, no side effects)
    async fn fetch_all_products(&self) -> Result<Vec<Product>>;

    /// When the server last stored scraped prices
    async fn fetch_last_update_time(&self) -> Result<LastUpdateInfo>;

    /// Re-scrape every dealer and persist the results. Not idempotent.
    async fn trigger_scrape(&self) -> Result<ScrapeOutcome>;

    /// Register a price alert
    async fn create_alert(&self, request: &AlertRequest) -> Result<()>;

    /// Price history for one product, newest first
    async fn fetch_price_history(&self, product_id: i64, days: u32) -> Result<Vec<PriceHistoryRecord>>;
}
