//! SQLite database models

use crate::pricing::metrics::{Currency, ExchangeRates, DEFAULT_BGN_PER_EUR};
use crate::refresh::DEFAULT_STALENESS_HOURS;
use crate::api::DEFAULT_HISTORY_DAYS;
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

/// Tracker settings (single row)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSettings {
    /// Tracker server root, e.g. `https://metals.example`
    pub api_base_url: String,
    pub staleness_threshold_hours: f64,
    pub bgn_per_eur: f64,
    pub display_currency: Currency,
    /// Days of history shown in price charts
    pub history_days: u32,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            staleness_threshold_hours: DEFAULT_STALENESS_HOURS,
            bgn_per_eur: DEFAULT_BGN_PER_EUR,
            display_currency: Currency::Eur,
            history_days: DEFAULT_HISTORY_DAYS,
        }
    }
}

impl TrackerSettings {
    pub fn exchange_rates(&self) -> ExchangeRates {
        ExchangeRates {
            bgn_per_eur: self.bgn_per_eur,
        }
    }
}

/// Partial settings update; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub api_base_url: Option<String>,
    pub staleness_threshold_hours: Option<f64>,
    pub bgn_per_eur: Option<f64>,
    pub display_currency: Option<Currency>,
    pub history_days: Option<u32>,
}
