//! Settings management

use crate::db::sqlite::models::{TrackerSettings, UpdateSettingsRequest};
use crate::error::{AppError, Result};
use rusqlite::Connection;
use url::Url;

/// Get settings
pub fn get_settings(conn: &Connection) -> Result<TrackerSettings> {
    let (settings, currency) = conn.query_row(
        "SELECT api_base_url, staleness_threshold_hours, bgn_per_eur, display_currency, history_days
         FROM settings WHERE id = 1",
        [],
        |row| {
            Ok((
                TrackerSettings {
                    api_base_url: row.get(0)?,
                    staleness_threshold_hours: row.get(1)?,
                    bgn_per_eur: row.get(2)?,
                    display_currency: Default::default(),
                    history_days: row.get(4)?,
                },
                row.get::<_, String>(3)?,
            ))
        },
    )?;

    Ok(TrackerSettings {
        display_currency: currency.parse()?,
        ..settings
    })
}

/// Update settings
pub fn update_settings(conn: &Connection, request: &UpdateSettingsRequest) -> Result<TrackerSettings> {
    validate(request)?;

    let mut updates = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(url) = &request.api_base_url {
        updates.push("api_base_url = ?");
        params.push(Box::new(url.trim().to_string()));
    }
    if let Some(hours) = request.staleness_threshold_hours {
        updates.push("staleness_threshold_hours = ?");
        params.push(Box::new(hours));
    }
    if let Some(rate) = request.bgn_per_eur {
        updates.push("bgn_per_eur = ?");
        params.push(Box::new(rate));
    }
    if let Some(currency) = request.display_currency {
        updates.push("display_currency = ?");
        params.push(Box::new(currency.as_str()));
    }
    if let Some(days) = request.history_days {
        updates.push("history_days = ?");
        params.push(Box::new(days));
    }

    if !updates.is_empty() {
        updates.push("updated_at = datetime('now')");

        let sql = format!("UPDATE settings SET {} WHERE id = 1", updates.join(", "));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;
    }

    get_settings(conn)
}

fn validate(request: &UpdateSettingsRequest) -> Result<()> {
    if let Some(url) = &request.api_base_url {
        validate_api_base_url(url)?;
    }
    if let Some(hours) = request.staleness_threshold_hours {
        if !hours.is_finite() || hours <= 0.0 {
            return Err(AppError::Validation(format!(
                "Staleness threshold must be a positive number of hours, got {}",
                hours
            )));
        }
    }
    if let Some(rate) = request.bgn_per_eur {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(AppError::Validation(format!("Exchange rate must be positive, got {}", rate)));
        }
    }
    if request.history_days == Some(0) {
        return Err(AppError::Validation("History window must be at least one day".to_string()));
    }
    Ok(())
}

/// The tracker server must be reachable over http(s)
pub fn validate_api_base_url(url: &str) -> Result<()> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("API base URL must not be empty".to_string()));
    }

    let parsed = Url::parse(trimmed)
        .map_err(|e| AppError::Validation(format!("Invalid API base URL '{}': {}", trimmed, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(AppError::Validation(format!(
            "API base URL must be an http or https address, got '{}'",
            trimmed
        )));
    }
    Ok(())
}
