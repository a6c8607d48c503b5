//! Price history chart series

use super::metrics::CENTS_PER_EURO;
use crate::api::types::PriceHistoryRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub recorded_at: DateTime<Utc>,
    /// Euros
    pub price: f64,
    /// Euros per gram
    pub price_per_gram: f64,
}

/// Chronological series from the server's newest-first records
pub fn chart_series(mut records: Vec<PriceHistoryRecord>) -> Vec<ChartPoint> {
    records.reverse();
    records.sort_by_key(|r| r.recorded_at);

    records
        .into_iter()
        .map(|r| ChartPoint {
            recorded_at: r.recorded_at,
            price: r.price_cents as f64 / CENTS_PER_EURO,
            price_per_gram: r.price_per_gram_cents as f64 / CENTS_PER_EURO,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(days_ago: i64, price_cents: i64) -> PriceHistoryRecord {
        PriceHistoryRecord {
            recorded_at: DateTime::parse_from_rfc3339("2026-10-19T12:00:00Z")
                .unwrap()
                .with_timezone(&Utc)
                - Duration::days(days_ago),
            price_cents,
            price_per_gram_cents: price_cents / 31,
        }
    }

    #[test]
    fn test_series_is_oldest_first_in_euros() {
        let series = chart_series(vec![record(0, 250000), record(1, 248000), record(2, 245000)]);

        assert_eq!(series.len(), 3);
        assert!(series.windows(2).all(|w| w[0].recorded_at < w[1].recorded_at));
        assert_eq!(series[0].price, 2450.0);
        assert_eq!(series[2].price, 2500.0);
        assert_eq!(series[2].price_per_gram, 80.64);
    }

    #[test]
    fn test_empty_history() {
        assert!(chart_series(Vec::new()).is_empty());
    }
}
