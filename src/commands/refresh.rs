//! Refresh commands

use crate::error::Result;
use crate::refresh::RefreshOutcome;
use crate::services::{RefreshService, RefreshStatus};
use crate::state::AppState;
use tauri::State;

/// Refresh button. Progress arrives as `refresh-state` events.
#[tauri::command]
pub async fn refresh_prices(state: State<'_, AppState>) -> Result<RefreshOutcome> {
    Ok(RefreshService::refresh_now(&state).await)
}

#[tauri::command]
pub async fn get_refresh_status(state: State<'_, AppState>) -> Result<RefreshStatus> {
    Ok(RefreshService::status(&state))
}
