#![allow(dead_code)]

use serde_json::{Value, json};
use storefront_checkout::{
    checkout::{
        boundary::CheckoutSession,
        controller::CheckoutSubmissionController,
        process::{CartItem, Checkout, CheckoutProcess, SubmittedFormValues},
    },
    form::state::FormValues,
};

pub fn cart_item(quantity: u32, variant_id: &str) -> CartItem {
    CartItem {
        quantity,
        variant_id: variant_id.to_string(),
        name: None,
        price: None,
    }
}

pub fn sample_cart() -> Vec<CartItem> {
    vec![cart_item(2, "A"), cart_item(1, "B")]
}

pub fn shipping_values() -> FormValues {
    [
        ("email", "jane@example.com"),
        ("firstName", "Jane"),
        ("lastName", "Doe"),
        ("streetAddress1", "1 Main St"),
        ("city", "Springfield"),
        ("postalCode", "90210"),
        ("country", "US"),
        ("phone", "555-0100"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

pub fn billing_values() -> FormValues {
    [
        ("firstName", "John"),
        ("lastName", "Roe"),
        ("streetAddress1", "9 Side Rd"),
        ("city", "Shelbyville"),
        ("postalCode", "10001"),
        ("country", "CA"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Controller with both forms filled from the fixtures above.
pub fn filled_controller() -> CheckoutSubmissionController {
    let mut controller = CheckoutSubmissionController::new(&CheckoutProcess::default());
    for (k, v) in shipping_values() {
        controller.set_shipping_value(&k, &v).unwrap();
    }
    for (k, v) in billing_values() {
        controller.set_billing_value(&k, &v).unwrap();
    }
    controller
}

pub fn created_response(id: &str) -> Value {
    json!({
        "data": {
            "checkoutCreate": {
                "checkout": {
                    "id": id,
                    "token": "tok-1",
                    "availableShippingMethods": [
                        { "id": "SM1", "name": "Standard", "price": { "amount": 5.0, "currency": "USD" } },
                        { "id": "SM2", "name": "Express" }
                    ]
                },
                "checkoutErrors": []
            }
        }
    })
}

pub fn field_errors_response(fields: &[&str]) -> Value {
    let errors: Vec<Value> = fields
        .iter()
        .map(|f| json!({ "field": f, "message": format!("{} is invalid", f), "code": "INVALID" }))
        .collect();
    json!({
        "data": {
            "checkoutCreate": {
                "checkout": null,
                "checkoutErrors": errors
            }
        }
    })
}

pub fn server_errors_response() -> Value {
    json!({ "errors": [ { "message": "Internal error" }, { "message": "Try later" } ] })
}

/// Session that counts callbacks.
#[derive(Default)]
pub struct RecordingSession {
    pub process: CheckoutProcess,
    pub created: Vec<(Checkout, SubmittedFormValues)>,
    pub shipping: Vec<(Checkout, String)>,
}

impl CheckoutSession for RecordingSession {
    fn checkout_process(&self) -> &CheckoutProcess {
        &self.process
    }

    fn checkout_created(&mut self, checkout: &Checkout, values: &SubmittedFormValues) {
        self.process.record_checkout_created(checkout, values);
        self.created.push((checkout.clone(), values.clone()));
    }

    fn shipping_updated(&mut self, checkout: &Checkout, method_id: &str) {
        self.process.record_shipping_method(checkout, method_id);
        self.shipping.push((checkout.clone(), method_id.to_string()));
    }
}
