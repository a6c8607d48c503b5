//! Per-product alert form state

use super::{validate, AlertDirection, AlertRequest};
use crate::api::PriceApi;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Alert dialog state for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertForm {
    pub product_id: i64,
    /// Current price in euros, used as the default target
    pub current_price: f64,
    pub target_price: String,
    pub direction: AlertDirection,
    pub contact: String,
    /// A submission is waiting on the server; submit is disabled
    #[serde(default)]
    pub pending: bool,
}

/// Values typed into the alert dialog
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertFormInput {
    pub target_price: String,
    #[serde(default)]
    pub direction: AlertDirection,
    pub contact: String,
}

/// Result of submitting the alert dialog
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum AlertSubmission {
    /// Server accepted the alert; the form has been reset
    Created { request: AlertRequest },
    /// Input failed validation; nothing was sent
    Rejected { field: String, message: String },
    /// Server rejected or the request failed; the form is kept as typed
    Failed { message: String },
    /// An earlier submission for this product has not finished yet
    InProgress { message: String },
}

impl AlertForm {
    pub fn new(product_id: i64, current_price: f64) -> Self {
        Self {
            product_id,
            current_price,
            target_price: format!("{:.2}", current_price),
            direction: AlertDirection::default(),
            contact: String::new(),
            pending: false,
        }
    }

    pub fn apply(&mut self, input: AlertFormInput) {
        self.target_price = input.target_price;
        self.direction = input.direction;
        self.contact = input.contact;
    }

    /// Restore defaults: current price, `below`, empty contact
    pub fn reset(&mut self) {
        *self = Self::new(self.product_id, self.current_price);
    }

    pub fn to_request(&self) -> Result<AlertRequest, super::ValidationError> {
        validate(self.product_id, &self.target_price, self.direction, &self.contact)
    }

    /// Validate and send. The form is reset only once the server confirms.
    pub async fn submit(&mut self, api: &dyn PriceApi) -> AlertSubmission {
        let request = match self.to_request() {
            Ok(request) => request,
            Err(err) => {
                return AlertSubmission::Rejected {
                    field: err.field().to_string(),
                    message: err.to_string(),
                }
            }
        };

        match api.create_alert(&request).await {
            Ok(()) => {
                info!(
                    "Created {} alert for product {} at {:.2}",
                    request.direction.as_str(),
                    request.product_id,
                    request.target_price
                );
                self.reset();
                AlertSubmission::Created { request }
            }
            Err(e) => {
                warn!("Alert creation failed for product {}: {}", request.product_id, e);
                AlertSubmission::Failed {
                    message: e.to_string(),
                }
            }
        }
    }
}
