//! Metals Tracker - Precious Metals Price Tracker
//!
//! Aggregates gold and silver bullion prices from several dealers,
//! groups and ranks them by price per gram, and keeps the snapshot
//! fresh by asking the tracker server to re-scrape dealers.

#[cfg(feature = "desktop")]
pub mod commands;
pub mod alerts;
pub mod api;
pub mod clock;
pub mod db;
pub mod error;
pub mod events;
pub mod pricing;
pub mod refresh;
pub mod services;
pub mod state;
pub mod store;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "metals_tracker=debug,metals_tracker_lib=debug,tauri=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Initialize and run the Tauri application
#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use state::AppState;
    use tauri::Manager;

    init_tracing();

    tracing::info!("Starting Metals Tracker...");

    let result = tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .setup(|app| {
            let app_state = AppState::new(app.handle())?;
            app.manage(app_state);

            tracing::info!("Application state initialized");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Price table commands
            commands::prices::start_session,
            commands::prices::get_price_view,
            commands::prices::sort_products,
            commands::prices::reset_sort,
            commands::prices::get_product,
            commands::prices::open_product_link,
            // Refresh commands
            commands::refresh::refresh_prices,
            commands::refresh::get_refresh_status,
            // Alert commands
            commands::alerts::open_alert_form,
            commands::alerts::submit_alert,
            // History commands
            commands::history::get_price_history,
            // Settings commands
            commands::settings::get_settings,
            commands::settings::update_settings,
        ])
        .run(tauri::generate_context!());

    if let Err(e) = result {
        tracing::error!("Error while running tauri application: {}", e);
    }
}
