use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::form::state::FormValues;

// ============================================================================
// Cart
// ============================================================================

/// One cart entry. Owned by the storefront; checkout only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub quantity: u32,
    pub variant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
}

/// Cart entry reduced to what the commerce API needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub quantity: u32,
    pub variant_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub amount: f64,
    pub currency: String,
}

// ============================================================================
// Server-side checkout objects
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingMethod {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
}

/// Checkout as confirmed by the commerce API. Fields we do not model are
/// kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_shipping_methods: Option<Vec<ShippingMethod>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// Values captured at submit time
// ============================================================================

/// Shipping and billing values captured when the address form was last
/// submitted. Survives a failed round trip; replaced by a resubmission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedFormValues {
    pub shipping_form_values: Option<FormValues>,
    pub billing_form_values: Option<FormValues>,
}

// ============================================================================
// CheckoutProcess: facts accumulated across steps
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutProcess {
    #[serde(default)]
    pub checkout_id: Option<String>,
    #[serde(default)]
    pub checkout_token: Option<String>,
    #[serde(default)]
    pub available_shipping_methods: Option<Vec<ShippingMethod>>,
    #[serde(default)]
    pub shipping_submitted: bool,
    #[serde(default)]
    pub shipping_form_data: Option<SubmittedFormValues>,
    #[serde(default)]
    pub shipping_method_id: Option<String>,
}

impl CheckoutProcess {
    /// Append the result of a confirmed address step.
    pub fn record_checkout_created(&mut self, checkout: &Checkout, values: &SubmittedFormValues) {
        self.checkout_id = Some(checkout.id.clone());
        self.checkout_token = checkout.token.clone();
        self.available_shipping_methods = checkout.available_shipping_methods.clone();
        self.shipping_submitted = true;
        self.shipping_form_data = Some(values.clone());
    }

    /// Append the result of a confirmed shipping step.
    pub fn record_shipping_method(&mut self, checkout: &Checkout, method_id: &str) {
        self.checkout_id = Some(checkout.id.clone());
        self.shipping_method_id = Some(method_id.to_string());
    }

    /// Previously confirmed shipping values, if the address step completed.
    pub fn confirmed_shipping_values(&self) -> Option<&FormValues> {
        if !self.shipping_submitted {
            return None;
        }
        self.shipping_form_data
            .as_ref()
            .and_then(|d| d.shipping_form_values.as_ref())
    }

    pub fn confirmed_billing_values(&self) -> Option<&FormValues> {
        if !self.shipping_submitted {
            return None;
        }
        self.shipping_form_data
            .as_ref()
            .and_then(|d| d.billing_form_values.as_ref())
    }
}
