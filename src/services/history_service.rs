//! History Service
//!
//! Price history charts for a single product.

use crate::error::{AppError, Result};
use crate::pricing::history::{chart_series, ChartPoint};
use crate::state::AppState;
use serde::Serialize;
use tracing::info;

/// Chart payload for one product
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChart {
    pub product_id: i64,
    pub days: u32,
    /// Oldest first; empty when the server has no history
    pub points: Vec<ChartPoint>,
}

/// History service for business logic
pub struct HistoryService;

impl HistoryService {
    /// Get the price chart, defaulting to the configured window
    pub async fn get_chart(state: &AppState, product_id: i64, days: Option<u32>) -> Result<PriceChart> {
        let days = days.unwrap_or_else(|| state.settings().history_days);
        if days == 0 {
            return Err(AppError::Validation("History window must be at least one day".to_string()));
        }

        info!("HistoryService::get_chart - product {} over {} days", product_id, days);

        let records = state.api.fetch_price_history(product_id, days).await?;

        Ok(PriceChart {
            product_id,
            days,
            points: chart_series(records),
        })
    }
}
