use std::collections::BTreeMap;

use storefront_checkout::checkout::error::CheckoutError;
use storefront_checkout::form::{state::FormState, template::shipping_form_template};

#[test]
fn new_form_starts_empty_and_untouched() {
    let state = FormState::new(shipping_form_template());
    assert_eq!(state.value("email"), Some(""));
    assert!(!state.was_submitted());
    assert!(state.values().values().all(|v| v.is_empty()));
}

#[test]
fn set_value_is_tracked_and_read_back() {
    let mut state = FormState::new(shipping_form_template());
    state.set_value("city", "Springfield").unwrap();
    assert_eq!(state.value("city"), Some("Springfield"));
    assert_eq!(state.values().get("city").map(String::as_str), Some("Springfield"));
}

#[test]
fn unknown_field_is_an_error() {
    let mut state = FormState::new(shipping_form_template());
    match state.set_value("fax", "123") {
        Err(CheckoutError::UnknownField { form_id, field }) => {
            assert_eq!(form_id, "shipping-form");
            assert_eq!(field, "fax");
        }
        other => panic!("expected UnknownField, got {:?}", other),
    }
}

#[test]
fn errors_hidden_until_touched() {
    let mut state = FormState::new(shipping_form_template());
    assert!(!state.errors("email").unwrap().is_empty());
    assert!(state.visible_errors("email").unwrap().is_empty());

    state.blur("email").unwrap();
    assert_eq!(
        state.visible_errors("email").unwrap(),
        vec!["Email is required".to_string()]
    );
}

#[test]
fn errors_shown_after_submit_even_if_untouched() {
    let mut state = FormState::new(shipping_form_template());
    state.mark_submitted();
    assert!(!state.visible_errors("city").unwrap().is_empty());
    assert!(state.visible_errors("streetAddress2").unwrap().is_empty());
}

#[test]
fn errors_update_on_every_change() {
    let mut state = FormState::new(shipping_form_template());
    state.blur("email").unwrap();
    state.set_value("email", "jane@").unwrap();
    assert_eq!(state.visible_errors("email").unwrap().len(), 1);
    state.set_value("email", "jane@example.com").unwrap();
    assert!(state.visible_errors("email").unwrap().is_empty());
}

#[test]
fn initial_values_prefill_known_fields_only() {
    let mut initial = BTreeMap::new();
    initial.insert("city".to_string(), "Shelbyville".to_string());
    initial.insert("unknown".to_string(), "ignored".to_string());

    let state = FormState::with_initial(shipping_form_template(), Some(&initial));
    assert_eq!(state.value("city"), Some("Shelbyville"));
    assert_eq!(state.value("email"), Some(""));
    assert!(!state.values().contains_key("unknown"));
}

#[test]
fn invalid_fields_listed_in_template_order() {
    let mut state = FormState::new(shipping_form_template());
    state.set_value("email", "jane@example.com").unwrap();
    let names: Vec<&str> = state
        .invalid_fields()
        .iter()
        .map(|(f, _)| f.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["firstName", "lastName", "streetAddress1", "city", "postalCode", "country"]
    );
    assert!(!state.is_valid());
}
