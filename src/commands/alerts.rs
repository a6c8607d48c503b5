//! Price alert commands

use crate::alerts::{AlertForm, AlertFormInput, AlertSubmission};
use crate::error::Result;
use crate::services::AlertService;
use crate::state::AppState;
use tauri::State;

#[tauri::command]
pub async fn open_alert_form(state: State<'_, AppState>, product_id: i64) -> Result<AlertForm> {
    AlertService::get_form(&state, product_id)
}

#[tauri::command]
pub async fn submit_alert(
    state: State<'_, AppState>,
    product_id: i64,
    input: AlertFormInput,
) -> Result<AlertSubmission> {
    AlertService::submit(&state, product_id, input).await
}
