//! Price table commands

use crate::error::{AppError, Result};
use crate::pricing::{DerivedProduct, PriceView, SortKey};
use crate::services::{PriceService, SessionStart};
use crate::state::AppState;
use tauri::{AppHandle, State};
use tauri_plugin_shell::ShellExt;

/// Load products and run the session's staleness check
#[tauri::command]
pub async fn start_session(state: State<'_, AppState>) -> Result<SessionStart> {
    PriceService::start_session(&state).await
}

#[tauri::command]
pub async fn get_price_view(state: State<'_, AppState>) -> Result<PriceView> {
    Ok(PriceService::current_view(&state))
}

/// Column header click
#[tauri::command]
pub async fn sort_products(state: State<'_, AppState>, key: SortKey) -> Result<PriceView> {
    Ok(PriceService::sort_by(&state, key))
}

#[tauri::command]
pub async fn reset_sort(state: State<'_, AppState>) -> Result<PriceView> {
    Ok(PriceService::reset_sort(&state))
}

#[tauri::command]
pub async fn get_product(state: State<'_, AppState>, product_id: i64) -> Result<DerivedProduct> {
    PriceService::get_product(&state, product_id)
}

/// Open the dealer's product page in the system browser
#[tauri::command]
#[allow(deprecated)]
pub async fn open_product_link(
    app: AppHandle,
    state: State<'_, AppState>,
    product_id: i64,
) -> Result<()> {
    let product = PriceService::get_product(&state, product_id)?;
    if product.url.trim().is_empty() {
        return Err(AppError::NotFound(format!("Product {} has no link", product_id)));
    }

    app.shell()
        .open(product.url, None)
        .map_err(|e| AppError::Internal(format!("Failed to open link: {}", e)))
}
