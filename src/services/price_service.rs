//! Price Service
//!
//! Session start, the grouped/sorted price view, and sort clicks.

use crate::error::{AppError, Result};
use crate::pricing::{build_view, DerivedProduct, PriceView, SortKey};
use crate::refresh::staleness::{hours_since, marker_is_stale};
use crate::refresh::RefreshTrigger;
use crate::state::AppState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

/// Staleness evaluation made when a session starts
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StalenessReport {
    pub last_updated: Option<DateTime<Utc>>,
    pub hours_since_update: Option<f64>,
    pub threshold_hours: f64,
    pub stale: bool,
    /// An automatic refresh was started by this evaluation
    pub auto_refresh_started: bool,
}

/// Result of starting a session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStart {
    /// Last known good view; unchanged when loading failed
    pub view: PriceView,
    /// Why products could not be loaded, if they could not
    pub load_error: Option<String>,
    /// `None` when the server's update time could not be read
    pub staleness: Option<StalenessReport>,
}

/// Price service for business logic
pub struct PriceService;

impl PriceService {
    /// Load products, then check staleness and start the session's
    /// automatic refresh if warranted. A failed load keeps the previous
    /// snapshot and does not skip the staleness check.
    pub async fn start_session(state: &AppState) -> Result<SessionStart> {
        info!("PriceService::start_session");

        let seen = state.store.generation();
        let load_error = match state.api.fetch_all_products().await {
            Ok(products) => {
                state.store.replace_if_unchanged(products, seen);
                None
            }
            Err(e) => {
                warn!("Failed to load products, keeping the last snapshot: {}", e);
                Some(e.to_string())
            }
        };

        let staleness = match Self::evaluate_staleness(state).await {
            Ok(report) => Some(report),
            Err(e) => {
                warn!("Could not read last update time, skipping staleness check: {}", e);
                None
            }
        };

        Ok(SessionStart {
            view: Self::current_view(state),
            load_error,
            staleness,
        })
    }

    async fn evaluate_staleness(state: &AppState) -> Result<StalenessReport> {
        let info = state.api.fetch_last_update_time().await?;
        state.marker.seed_from_server(info.last_updated);

        let now = state.clock.now();
        let threshold_hours = state.settings().staleness_threshold_hours;
        let last_updated = state.marker.get();
        let hours = last_updated.map(|at| hours_since(at, now));
        let stale = marker_is_stale(last_updated, now, threshold_hours);

        let mut auto_refresh_started = false;
        if stale {
            if state.refresh.is_in_progress() {
                info!("Prices are stale but a refresh is already running");
            } else if state.session.try_claim_auto_refresh() {
                match hours {
                    Some(h) => info!("Last update was {:.1} hours ago. Triggering automatic update...", h),
                    None => info!("No recorded update. Triggering automatic update..."),
                }
                let orchestrator = state.refresh.clone();
                tokio::spawn(async move {
                    orchestrator.refresh(RefreshTrigger::Automatic).await;
                });
                auto_refresh_started = true;
            }
        }

        Ok(StalenessReport {
            last_updated,
            hours_since_update: hours,
            threshold_hours,
            stale,
            auto_refresh_started,
        })
    }

    /// View over the current snapshot with the active sort
    pub fn current_view(state: &AppState) -> PriceView {
        let settings = state.settings();
        let sort = state.sort.read().current();
        build_view(
            &state.store.snapshot(),
            sort,
            &settings.exchange_rates(),
            settings.display_currency,
            state.marker.get(),
        )
    }

    /// Apply a column click and return the re-sorted view
    pub fn sort_by(state: &AppState, key: SortKey) -> PriceView {
        let spec = state.sort.write().click(key);
        info!("Sorting by {:?} {:?}", spec.key, spec.direction);
        Self::current_view(state)
    }

    /// Back to the default per-gram ordering
    pub fn reset_sort(state: &AppState) -> PriceView {
        state.sort.write().reset();
        Self::current_view(state)
    }

    pub fn get_product(state: &AppState, product_id: i64) -> Result<DerivedProduct> {
        let settings = state.settings();
        state
            .store
            .find(product_id)
            .map(|p| DerivedProduct::derive(&p, &settings.exchange_rates(), settings.display_currency))
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", product_id)))
    }
}
