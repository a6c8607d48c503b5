//! When the price snapshot was last known to be fresh

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

#[derive(Debug, Default)]
struct MarkerState {
    server: Option<DateTime<Utc>>,
    current: Option<DateTime<Utc>>,
}

/// Seeded once from the server, then advanced locally after each
/// successful refresh. Never moves backwards.
#[derive(Debug, Default)]
pub struct LastUpdateMarker {
    state: RwLock<MarkerState>,
}

impl LastUpdateMarker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the server-reported marker. Later calls are ignored once a
    /// server value is known.
    pub fn seed_from_server(&self, at: Option<DateTime<Utc>>) {
        let mut state = self.state.write();
        if state.server.is_some() {
            return;
        }
        state.server = at;
        state.current = max_opt(state.current, at);
    }

    pub fn mark_refreshed(&self, now: DateTime<Utc>) {
        let mut state = self.state.write();
        state.current = max_opt(state.current, Some(now));
    }

    pub fn get(&self) -> Option<DateTime<Utc>> {
        self.state.read().current
    }

    pub fn server_reported(&self) -> Option<DateTime<Utc>> {
        self.state.read().server
    }
}

fn max_opt(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}
