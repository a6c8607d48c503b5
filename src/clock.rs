//! Wall-clock source

use chrono::{DateTime, Utc};

/// Source of "now" for staleness checks and update markers
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
