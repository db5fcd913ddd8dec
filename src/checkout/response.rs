use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::checkout::process::Checkout;

pub const CHECKOUT_CREATE: &str = "checkoutCreate";
pub const CHECKOUT_SHIPPING_METHOD_UPDATE: &str = "checkoutShippingMethodUpdate";

/// Field-level error reported inside a successful response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutFieldError {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

/// `{ checkout, checkoutErrors }`, shared by every checkout mutation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutMutationPayload {
    #[serde(default)]
    pub checkout: Option<Checkout>,
    #[serde(default)]
    pub checkout_errors: Vec<CheckoutFieldError>,
}

/// How a resolved response should be handled.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome {
    /// Top-level `errors`: generic failure, do not advance
    ServerErrors(Vec<String>),

    /// Non-empty `checkoutErrors`: recoverable, shown inline
    FieldErrors(Vec<CheckoutFieldError>),

    /// No errors and a checkout object: advance
    Confirmed(Checkout),

    /// Body matched none of the shapes above
    Unrecognized,
}

/// Classify the JSON body of a checkout mutation named `mutation`.
pub fn classify(body: &Value, mutation: &str) -> ResponseOutcome {
    if let Some(errors) = body.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            let messages = errors
                .iter()
                .map(|e| {
                    e.get("message")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown")
                        .to_string()
                })
                .collect();
            return ResponseOutcome::ServerErrors(messages);
        }
    }

    let Some(payload) = body.get("data").and_then(|d| d.get(mutation)) else {
        return ResponseOutcome::Unrecognized;
    };

    let payload: CheckoutMutationPayload = match serde_json::from_value(payload.clone()) {
        Ok(p) => p,
        Err(_) => return ResponseOutcome::Unrecognized,
    };

    if !payload.checkout_errors.is_empty() {
        return ResponseOutcome::FieldErrors(payload.checkout_errors);
    }

    match payload.checkout {
        Some(checkout) => ResponseOutcome::Confirmed(checkout),
        None => ResponseOutcome::Unrecognized,
    }
}
