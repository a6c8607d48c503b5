//! Events pushed to the frontend

use crate::refresh::RefreshState;
use serde::{Deserialize, Serialize};
#[cfg(feature = "desktop")]
use tauri::{AppHandle, Emitter};
use tracing::instrument;

pub trait Notifier: Send + Sync {
    fn notify(&self, event: &Event);
}

#[cfg(feature = "desktop")]
impl Notifier for AppHandle {
    fn notify(&self, event: &Event) {
        if let Err(e) = self.emit(event.name(), event) {
            tracing::warn!("Failed to emit {} event: {}", event.name(), e);
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "refresh-state")]
    RefreshState { state: RefreshState },
    #[serde(rename = "toast")]
    Toast {
        variant: ToastVariant,
        message: String,
    },
}

impl Event {
    #[instrument(skip(notifier))]
    pub fn notify(&self, notifier: &dyn Notifier) {
        notifier.notify(self);
    }

    pub fn name(&self) -> &'static str {
        match self {
            Event::RefreshState { .. } => "refresh-state",
            Event::Toast { .. } => "toast",
        }
    }
}

pub fn toast(variant: ToastVariant, message: String, notifier: &dyn Notifier) {
    Event::Toast { variant, message }.notify(notifier)
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    Info,
    Success,
    Warning,
    Error,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_wire_shape() {
        let event = Event::Toast {
            variant: ToastVariant::Success,
            message: "Prices updated".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "toast");
        assert_eq!(json["variant"], "success");
        assert_eq!(event.name(), "toast");
    }

    #[test]
    fn test_refresh_state_event_name() {
        let event = Event::RefreshState {
            state: RefreshState::Idle,
        };
        assert_eq!(event.name(), "refresh-state");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["state"]["status"], "idle");
    }
}
