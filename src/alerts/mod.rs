//! Price alert intake
//!
//! Validates a user-submitted target price and contact address before an
//! alert-creation request is sent to the tracker server. Matching and
//! email delivery happen server-side.

mod form;

pub use form::{AlertForm, AlertFormInput, AlertSubmission};

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Which side of the target price fires the alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    Above,
    #[default]
    Below,
}

impl AlertDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertDirection::Above => "above",
            AlertDirection::Below => "below",
        }
    }
}

impl FromStr for AlertDirection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "above" => Ok(AlertDirection::Above),
            "below" => Ok(AlertDirection::Below),
            other => Err(ValidationError::UnknownDirection(other.to_string())),
        }
    }
}

/// Validated alert, in the shape `alerts.create` expects
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRequest {
    pub product_id: i64,
    /// Target price in euros
    pub target_price: f64,
    #[serde(rename = "alertType")]
    pub direction: AlertDirection,
    #[serde(rename = "email")]
    pub contact: String,
}

/// Field-level rejection of alert input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid target price (got {0:?})")]
    InvalidPrice(String),

    #[error("Please enter a valid email address")]
    InvalidContact,

    #[error("Unknown alert direction: {0}")]
    UnknownDirection(String),
}

impl ValidationError {
    /// Name of the form field the error belongs to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidPrice(_) => "targetPrice",
            ValidationError::InvalidContact => "email",
            ValidationError::UnknownDirection(_) => "alertType",
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Validate raw alert input. The price is checked before the contact.
pub fn validate(
    product_id: i64,
    target_price_text: &str,
    direction: AlertDirection,
    contact_text: &str,
) -> Result<AlertRequest, ValidationError> {
    let target_price = parse_target_price(target_price_text)?;
    let contact = parse_contact(contact_text)?;

    Ok(AlertRequest {
        product_id,
        target_price,
        direction,
        contact,
    })
}

fn parse_target_price(text: &str) -> Result<f64, ValidationError> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(price) if price.is_finite() && price > 0.0 => Ok(price),
        _ => Err(ValidationError::InvalidPrice(trimmed.to_string())),
    }
}

/// Minimal syntactic check: exactly one `@` with something on both sides
fn parse_contact(text: &str) -> Result<String, ValidationError> {
    let trimmed = text.trim();
    let mut parts = trimmed.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => {
            Ok(trimmed.to_string())
        }
        _ => Err(ValidationError::InvalidContact),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(price: &str, contact: &str) -> Result<AlertRequest, ValidationError> {
        validate(42, price, AlertDirection::Below, contact)
    }

    #[test]
    fn test_rejects_non_positive_prices() {
        assert!(matches!(check("0", "a@b.com"), Err(ValidationError::InvalidPrice(_))));
        assert!(matches!(check("-5", "a@b.com"), Err(ValidationError::InvalidPrice(_))));
        assert!(matches!(check("abc", "a@b.com"), Err(ValidationError::InvalidPrice(_))));
        assert!(matches!(check("", "a@b.com"), Err(ValidationError::InvalidPrice(_))));
        assert!(matches!(check("inf", "a@b.com"), Err(ValidationError::InvalidPrice(_))));
        assert!(matches!(check("NaN", "a@b.com"), Err(ValidationError::InvalidPrice(_))));
    }

    #[test]
    fn test_accepts_decimal_price() {
        let request = check("12.50", "a@b.com").unwrap();
        assert_eq!(request.product_id, 42);
        assert_eq!(request.target_price, 12.5);
        assert_eq!(request.contact, "a@b.com");
        assert_eq!(request.direction, AlertDirection::Below);
    }

    #[test]
    fn test_contact_rules() {
        assert!(check("10", "a@b.com").is_ok());
        assert!(check("10", "  a@b.com ").is_ok());
        assert_eq!(check("10", "abc"), Err(ValidationError::InvalidContact));
        assert_eq!(check("10", ""), Err(ValidationError::InvalidContact));
        assert_eq!(check("10", "@b.com"), Err(ValidationError::InvalidContact));
        assert_eq!(check("10", "a@"), Err(ValidationError::InvalidContact));
        assert_eq!(check("10", "a@b@c"), Err(ValidationError::InvalidContact));
    }

    #[test]
    fn test_price_error_reported_first() {
        let err = check("0", "abc").unwrap_err();
        assert_eq!(err.field(), "targetPrice");
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("above".parse::<AlertDirection>().unwrap(), AlertDirection::Above);
        assert_eq!(" Below ".parse::<AlertDirection>().unwrap(), AlertDirection::Below);
        assert!("sideways".parse::<AlertDirection>().is_err());
    }

    #[test]
    fn test_request_wire_shape() {
        let request = check("12.50", "a@b.com").unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["productId"], 42);
        assert_eq!(json["targetPrice"], 12.5);
        assert_eq!(json["alertType"], "below");
        assert_eq!(json["email"], "a@b.com");
    }
}
