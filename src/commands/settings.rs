//! Settings management commands

use crate::db::sqlite::{TrackerSettings, UpdateSettingsRequest};
use crate::error::Result;
use crate::services::SettingsService;
use crate::state::AppState;
use tauri::State;

/// Get current settings
#[tauri::command]
pub async fn get_settings(state: State<'_, AppState>) -> Result<TrackerSettings> {
    Ok(SettingsService::get(&state))
}

/// Update settings
#[tauri::command]
pub async fn update_settings(
    state: State<'_, AppState>,
    request: UpdateSettingsRequest,
) -> Result<TrackerSettings> {
    SettingsService::update(&state, &request)
}
