//! Derived price metrics
//!
//! Prices arrive from the server in euro cents. Everything here is
//! computed at read time and never written back.

use crate::api::types::{Category, Product};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const CENTS_PER_EURO: f64 = 100.0;

/// Approximate fixed BGN/EUR rate; not a live quote
pub const DEFAULT_BGN_PER_EUR: f64 = 1.96;

/// Currencies a price can be displayed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Bgn,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Bgn => "BGN",
        }
    }
}

impl FromStr for Currency {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EUR" => Ok(Currency::Eur),
            "BGN" => Ok(Currency::Bgn),
            other => Err(AppError::Validation(format!("Unsupported currency: {}", other))),
        }
    }
}

/// Configured exchange rates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRates {
    pub bgn_per_eur: f64,
}

impl Default for ExchangeRates {
    fn default() -> Self {
        Self {
            bgn_per_eur: DEFAULT_BGN_PER_EUR,
        }
    }
}

impl ExchangeRates {
    /// Multiplier taking an amount in `from` to `to`
    pub fn rate(&self, from: Currency, to: Currency) -> f64 {
        match (from, to) {
            (Currency::Eur, Currency::Bgn) => self.bgn_per_eur,
            (Currency::Bgn, Currency::Eur) => 1.0 / self.bgn_per_eur,
            _ => 1.0,
        }
    }

    pub fn convert(&self, value: f64, from: Currency, to: Currency) -> f64 {
        if from == to {
            return value;
        }
        convert(value, self.rate(from, to))
    }
}

/// `round(value * rate * 100) / 100`, halves rounded away from zero
pub fn convert(value: f64, rate: f64) -> f64 {
    (value * rate * 100.0).round() / 100.0
}

pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Price in euros
pub fn price_major(product: &Product) -> f64 {
    product.price_cents as f64 / CENTS_PER_EURO
}

/// Euros per gram, or `None` when the weight is not a positive number
pub fn price_per_gram(product: &Product) -> Option<f64> {
    let weight = product.weight_grams;
    if !weight.is_finite() || weight <= 0.0 {
        return None;
    }
    Some(price_major(product) / weight)
}

/// Product with its derived display figures
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedProduct {
    pub id: i64,
    pub dealer_id: i64,
    pub dealer_name: String,
    pub name: String,
    pub category: Category,
    pub url: String,
    pub status: String,
    pub weight_grams: f64,
    pub price_cents: i64,
    /// Price in euros
    pub price: f64,
    /// Euros per gram; absent for records without a usable weight
    pub price_per_gram: Option<f64>,
    pub currency: Currency,
    /// Price in the display currency, rounded to cents
    pub display_price: f64,
    pub display_price_per_gram: Option<f64>,
}

impl DerivedProduct {
    pub fn derive(product: &Product, rates: &ExchangeRates, currency: Currency) -> Self {
        let price = price_major(product);
        let per_gram = price_per_gram(product);

        Self {
            id: product.id,
            dealer_id: product.dealer_id,
            dealer_name: product.dealer_label().to_string(),
            name: product.name.clone(),
            category: product.category,
            url: product.url.clone(),
            status: product.status.clone(),
            weight_grams: product.weight_grams,
            price_cents: product.price_cents,
            price,
            price_per_gram: per_gram,
            currency,
            display_price: round_to_cents(rates.convert(price, Currency::Eur, currency)),
            display_price_per_gram: per_gram
                .map(|p| round_to_cents(rates.convert(p, Currency::Eur, currency))),
        }
    }
}
