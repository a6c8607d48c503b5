//! Staleness check for the cached price snapshot

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};

/// Default maximum snapshot age before an automatic refresh
pub const DEFAULT_STALENESS_HOURS: f64 = 6.0;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Hours elapsed between `last_update` and `now`
pub fn hours_since(last_update: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - last_update).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Strictly older than `threshold_hours`; exactly on the threshold is fresh
pub fn is_stale(last_update: DateTime<Utc>, now: DateTime<Utc>, threshold_hours: f64) -> bool {
    hours_since(last_update, now) > threshold_hours
}

/// A missing marker means the server has never scraped: always stale
pub fn marker_is_stale(last_update: Option<DateTime<Utc>>, now: DateTime<Utc>, threshold_hours: f64) -> bool {
    last_update.map_or(true, |at| is_stale(at, now, threshold_hours))
}

/// Per-session flags. Created fresh for every session and never reset.
#[derive(Debug, Default)]
pub struct SessionFlags {
    auto_refresh_triggered: AtomicBool,
}

impl SessionFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the session's single automatic refresh. Only the first call
    /// returns `true`.
    pub fn try_claim_auto_refresh(&self) -> bool {
        self.auto_refresh_triggered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn auto_refresh_triggered(&self) -> bool {
        self.auto_refresh_triggered.load(Ordering::Acquire)
    }
}
