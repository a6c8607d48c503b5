//! Application state management

use crate::alerts::AlertForm;
use crate::api::{HttpPriceApi, PriceApi};
use crate::clock::Clock;
use crate::db::sqlite::{validate_api_base_url, SqliteDb, TrackerSettings, DEFAULT_API_BASE_URL};
use crate::error::Result;
use crate::events::Notifier;
use crate::pricing::SortState;
use crate::refresh::{LastUpdateMarker, RefreshOrchestrator, SessionFlags};
use crate::store::ProductStore;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;
#[cfg(feature = "desktop")]
use {
    crate::clock::SystemClock,
    crate::error::AppError,
    tauri::{AppHandle, Manager},
};

/// Environment variable overriding the stored tracker server URL
pub const API_URL_ENV: &str = "TRACKER_API_URL";

/// Application state shared across all commands
pub struct AppState {
    /// Local settings database
    pub sqlite: Arc<SqliteDb>,

    /// Tracker server
    pub api: Arc<dyn PriceApi>,

    /// Latest product snapshot
    pub store: Arc<ProductStore>,

    /// When the snapshot was last known fresh
    pub marker: Arc<LastUpdateMarker>,

    /// Single-flight refresh state machine
    pub refresh: Arc<RefreshOrchestrator>,

    /// Session-scoped flags, created once per application session
    pub session: SessionFlags,

    pub clock: Arc<dyn Clock>,

    /// Cached copy of the settings row
    pub settings: RwLock<TrackerSettings>,

    /// Active table ordering
    pub sort: RwLock<SortState>,

    /// Alert dialogs by product id
    pub alert_forms: Mutex<HashMap<i64, AlertForm>>,
}

impl AppState {
    /// Create new application state
    #[cfg(feature = "desktop")]
    pub fn new(app_handle: &AppHandle) -> Result<Self> {
        let data_dir = app_handle
            .path()
            .app_data_dir()
            .map_err(|e| AppError::Config(format!("Failed to get app data directory: {}", e)))?;

        std::fs::create_dir_all(&data_dir)?;

        tracing::info!("Data directory: {:?}", data_dir);

        let sqlite = Arc::new(SqliteDb::new(&data_dir.join("tracker.db"))?);

        let api_url = match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => {
                tracing::info!("Using tracker server from {}: {}", API_URL_ENV, url);
                url
            }
            _ => sqlite.get_settings()?.api_base_url,
        };
        let api = Arc::new(tracker_api(&api_url)?);

        Self::from_parts(sqlite, api, Arc::new(SystemClock), Arc::new(app_handle.clone()))
    }

    /// Assemble state around an existing database and server client
    pub fn from_parts(
        sqlite: Arc<SqliteDb>,
        api: Arc<dyn PriceApi>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let settings = sqlite.get_settings()?;
        let store = Arc::new(ProductStore::new());
        let marker = Arc::new(LastUpdateMarker::new());
        let refresh = Arc::new(RefreshOrchestrator::new(
            api.clone(),
            store.clone(),
            marker.clone(),
            clock.clone(),
            notifier,
        ));

        Ok(Self {
            sqlite,
            api,
            store,
            marker,
            refresh,
            session: SessionFlags::new(),
            clock,
            settings: RwLock::new(settings),
            sort: RwLock::new(SortState::default()),
            alert_forms: Mutex::new(HashMap::new()),
        })
    }

    /// Get current settings
    pub fn settings(&self) -> TrackerSettings {
        self.settings.read().clone()
    }

    /// Replace the cached settings
    pub fn apply_settings(&self, settings: TrackerSettings) {
        *self.settings.write() = settings;
    }
}

/// Client for the configured tracker server. A stored address that is no
/// longer usable falls back to the default so the app still starts.
pub fn tracker_api(api_url: &str) -> Result<HttpPriceApi> {
    match validate_api_base_url(api_url).and_then(|_| HttpPriceApi::new(api_url)) {
        Ok(api) => Ok(api),
        Err(e) => {
            warn!("{}; falling back to {}", e, DEFAULT_API_BASE_URL);
            HttpPriceApi::new(DEFAULT_API_BASE_URL)
        }
    }
}
