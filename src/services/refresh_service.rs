//! Refresh Service
//!
//! Manual refresh and refresh status for the frontend.

use crate::refresh::{RefreshOutcome, RefreshState, RefreshTrigger};
use crate::state::AppState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// What the refresh button and progress banner render
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshStatus {
    pub state: RefreshState,
    pub last_outcome: Option<RefreshState>,
    pub last_updated: Option<DateTime<Utc>>,
    /// Refresh controls are disabled while this is set
    pub in_progress: bool,
}

/// Refresh service for business logic
pub struct RefreshService;

impl RefreshService {
    /// User-initiated refresh. Returns the running attempt's state if one
    /// is already in flight.
    pub async fn refresh_now(state: &AppState) -> RefreshOutcome {
        info!("RefreshService::refresh_now");
        state.refresh.refresh(RefreshTrigger::Manual).await
    }

    pub fn status(state: &AppState) -> RefreshStatus {
        let current = state.refresh.state();
        RefreshStatus {
            in_progress: current.is_in_progress(),
            state: current,
            last_outcome: state.refresh.last_outcome(),
            last_updated: state.marker.get(),
        }
    }
}
