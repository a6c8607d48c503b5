//! Alert Service
//!
//! Per-product alert dialogs and submission to the tracker server.

use crate::alerts::{AlertForm, AlertFormInput, AlertSubmission};
use crate::error::{AppError, Result};
use crate::pricing::metrics::price_major;
use crate::state::AppState;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{info, warn};

/// Alert service for business logic
pub struct AlertService;

impl AlertService {
    /// Current dialog state, created with defaults on first open
    pub fn get_form(state: &AppState, product_id: i64) -> Result<AlertForm> {
        let current_price = Self::current_price(state, product_id)?;

        let mut forms = state.alert_forms.lock();
        let form = Self::form_entry(&mut forms, product_id, current_price);
        Ok(form.clone())
    }

    /// Validate and send the dialog; the stored form is reset only when
    /// the server confirms creation. A second submit while one is waiting
    /// on the server sends nothing.
    pub async fn submit(state: &AppState, product_id: i64, input: AlertFormInput) -> Result<AlertSubmission> {
        info!("AlertService::submit - product {}", product_id);

        let current_price = Self::current_price(state, product_id)?;
        let mut form = {
            let mut forms = state.alert_forms.lock();
            let stored = Self::form_entry(&mut forms, product_id, current_price);
            if stored.pending {
                warn!("Alert for product {} is already being created", product_id);
                return Ok(AlertSubmission::InProgress {
                    message: "This alert is already being created".to_string(),
                });
            }
            let form = stored.clone();
            stored.pending = true;
            form
        };
        let _pending = PendingSubmit {
            forms: &state.alert_forms,
            product_id,
        };

        form.apply(input);
        let outcome = form.submit(state.api.as_ref()).await;

        state.alert_forms.lock().insert(product_id, form);
        Ok(outcome)
    }

    fn current_price(state: &AppState, product_id: i64) -> Result<f64> {
        state
            .store
            .find(product_id)
            .map(|product| price_major(&product))
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", product_id)))
    }

    fn form_entry(forms: &mut HashMap<i64, AlertForm>, product_id: i64, current_price: f64) -> &mut AlertForm {
        let form = forms
            .entry(product_id)
            .or_insert_with(|| AlertForm::new(product_id, current_price));
        form.current_price = current_price;
        form
    }
}

/// Clears the pending flag however the submission ends, including when
/// the caller stops waiting for it
struct PendingSubmit<'a> {
    forms: &'a Mutex<HashMap<i64, AlertForm>>,
    product_id: i64,
}

impl Drop for PendingSubmit<'_> {
    fn drop(&mut self) {
        if let Some(form) = self.forms.lock().get_mut(&self.product_id) {
            form.pending = false;
        }
    }
}
