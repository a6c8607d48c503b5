//! Price history commands

use crate::error::Result;
use crate::services::{HistoryService, PriceChart};
use crate::state::AppState;
use tauri::State;

/// Get a product's price chart, `days` defaulting to the configured window
#[tauri::command]
pub async fn get_price_history(
    state: State<'_, AppState>,
    product_id: i64,
    days: Option<u32>,
) -> Result<PriceChart> {
    HistoryService::get_chart(&state, product_id, days).await
}
