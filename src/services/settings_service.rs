//! Settings Service
//!
//! Persists settings and keeps the in-memory copy in step.

use crate::db::sqlite::{TrackerSettings, UpdateSettingsRequest};
use crate::error::Result;
use crate::state::AppState;
use tracing::info;

/// Settings service for business logic
pub struct SettingsService;

impl SettingsService {
    pub fn get(state: &AppState) -> TrackerSettings {
        state.settings()
    }

    /// Threshold, rate and currency changes apply immediately; a new
    /// server URL is used from the next launch.
    pub fn update(state: &AppState, request: &UpdateSettingsRequest) -> Result<TrackerSettings> {
        info!("Updating settings");

        let previous = state.settings();
        let updated = state.sqlite.update_settings(request)?;

        if updated.api_base_url != previous.api_base_url {
            info!("Tracker server changed to {}; takes effect on restart", updated.api_base_url);
        }

        state.apply_settings(updated.clone());
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{product, ScriptedApi};
    use crate::api::types::Category;
    use crate::pricing::Currency;
    use crate::services::PriceService;
    use crate::state::testing::test_state;
    use chrono::Utc;

    #[test]
    fn test_currency_change_applies_to_view() {
        let t = test_state(ScriptedApi::new(vec![]), Utc::now());
        t.state.store.replace(vec![product(1, Category::Gold, 10000, 1.0)]);

        SettingsService::update(
            &t.state,
            &UpdateSettingsRequest {
                display_currency: Some(Currency::Bgn),
                bgn_per_eur: Some(2.0),
                ..Default::default()
            },
        )
        .unwrap();

        let view = PriceService::current_view(&t.state);
        assert_eq!(view.currency, Currency::Bgn);
        assert_eq!(view.groups[0].products[0].display_price, 200.0);
        assert_eq!(SettingsService::get(&t.state).bgn_per_eur, 2.0);
    }

    #[test]
    fn test_invalid_update_keeps_cached_settings() {
        let t = test_state(ScriptedApi::new(vec![]), Utc::now());
        let before = SettingsService::get(&t.state);

        let result = SettingsService::update(
            &t.state,
            &UpdateSettingsRequest {
                staleness_threshold_hours: Some(-1.0),
                ..Default::default()
            },
        );

        assert!(result.is_err());
        assert_eq!(SettingsService::get(&t.state), before);
    }
}
