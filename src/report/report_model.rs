use serde::{Deserialize, Serialize};

use crate::checkout::controller::AddressView;
use crate::checkout::shipping::ShippingFormView;

// ============================================================================
// Checkout run report: what one CLI checkout attempt did
// ============================================================================

/// Result of one step of the run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepReport {
    /// Step name, e.g. "address"
    pub step: String,

    /// Final request status: idle, pending, resolved, rejected
    pub request_status: String,

    /// Whether the step advanced to the next one
    pub advanced: bool,

    /// Message shown to the user, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StepReport {
    pub fn from_address_view(request_status: &str, view: &AddressView) -> Self {
        let (advanced, message) = match view {
            AddressView::Form { message, .. } => (false, message.clone()),
            AddressView::Loading => (false, None),
            AddressView::NetworkError(m) | AddressView::Failure(m) => (false, Some(m.to_string())),
            AddressView::Redirect(_) => (true, None),
        };
        Self {
            step: "address".to_string(),
            request_status: request_status.to_string(),
            advanced,
            message,
        }
    }

    pub fn from_shipping_view(request_status: &str, view: &ShippingFormView) -> Self {
        let (advanced, message) = match view {
            ShippingFormView::Form { message, .. } => (false, message.clone()),
            ShippingFormView::Loading => (false, None),
            ShippingFormView::NetworkError(m) | ShippingFormView::Failure(m) => {
                (false, Some(m.to_string()))
            }
            ShippingFormView::Redirect(_) => (true, None),
        };
        Self {
            step: "shipping".to_string(),
            request_status: request_status.to_string(),
            advanced,
            message,
        }
    }
}

/// Aggregated report for a checkout run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CheckoutRunReport {
    pub steps: Vec<StepReport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_id: Option<String>,

    /// Every path the run navigated to, in order
    pub navigation: Vec<String>,

    /// Flash messages announced during the run
    pub flash: Vec<String>,
}

impl CheckoutRunReport {
    /// Whether every attempted step advanced.
    pub fn succeeded(&self) -> bool {
        !self.steps.is_empty() && self.steps.iter().all(|s| s.advanced)
    }
}
