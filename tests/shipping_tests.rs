use serde_json::json;
use storefront_checkout::{
    checkout::{
        boundary::HistoryNavigator,
        controller::{NETWORK_ERROR_MESSAGE, SERVER_ERROR_MESSAGE},
        process::ShippingMethod,
        router::ShippingStepProps,
        shipping::{
            MISSING_CHECKOUT_MESSAGE, NO_METHOD_SELECTED_MESSAGE, ShippingFormView,
            ShippingSubmissionController,
        },
    },
    request::{client::ScriptedCommerceClient, executor::RequestStatus},
};

use crate::common::{RecordingSession, server_errors_response};

mod common;

fn props() -> ShippingStepProps {
    ShippingStepProps {
        available_shipping_methods: vec![
            ShippingMethod { id: "SM1".into(), name: "Standard".into(), price: None },
            ShippingMethod { id: "SM2".into(), name: "Express".into(), price: None },
        ],
        checkout_id: Some("C1".into()),
    }
}

fn updated_response() -> serde_json::Value {
    json!({
        "data": {
            "checkoutShippingMethodUpdate": {
                "checkout": { "id": "C1" },
                "checkoutErrors": []
            }
        }
    })
}

#[test]
fn only_offered_methods_can_be_selected() {
    let mut controller = ShippingSubmissionController::new(props());
    assert!(!controller.select_method("SM9"));
    assert_eq!(controller.selected(), None);
    assert!(controller.select_method("SM2"));
    assert_eq!(controller.selected(), Some("SM2"));
}

#[test]
fn submit_without_selection_asks_for_method() {
    let mut controller = ShippingSubmissionController::new(props());
    let client = ScriptedCommerceClient::new();

    let status = controller.submit(&client).unwrap();

    assert_eq!(status, RequestStatus::Idle);
    assert_eq!(client.request_count(), 0);
    assert_eq!(
        controller.view(),
        ShippingFormView::Form {
            selected: None,
            message: Some(NO_METHOD_SELECTED_MESSAGE.to_string()),
        }
    );
}

#[test]
fn selected_method_without_checkout_reports_missing_checkout() {
    let mut props = props();
    props.checkout_id = None;
    let mut controller = ShippingSubmissionController::new(props);
    let client = ScriptedCommerceClient::new();

    controller.select_method("SM1");
    let status = controller.submit(&client).unwrap();

    assert_eq!(status, RequestStatus::Idle);
    assert_eq!(client.request_count(), 0);
    assert_eq!(
        controller.view(),
        ShippingFormView::Form {
            selected: Some("SM1".into()),
            message: Some(MISSING_CHECKOUT_MESSAGE.to_string()),
        }
    );
}

#[test]
fn confirmed_update_records_method_and_advances_to_payment() {
    let mut controller = ShippingSubmissionController::new(props());
    let client = ScriptedCommerceClient::new().respond_with(updated_response());
    let mut session = RecordingSession::default();
    let mut nav = HistoryNavigator::default();

    controller.select_method("SM1");
    controller.submit(&client).unwrap();
    let view = controller.on_response_received(&mut session, &mut nav);

    assert_eq!(view, ShippingFormView::Redirect("/checkout/payment"));
    assert_eq!(session.shipping.len(), 1);
    assert_eq!(session.shipping[0].1, "SM1");
    assert_eq!(session.process.shipping_method_id.as_deref(), Some("SM1"));
    assert_eq!(nav.history, vec!["/checkout/payment".to_string()]);

    let requests = client.requests();
    let query = &requests[0].query;
    assert!(query.contains(r#"checkoutId: "C1""#));
    assert!(query.contains(r#"shippingMethodId: "SM1""#));
}

#[test]
fn field_errors_stay_on_step_with_server_message() {
    let mut controller = ShippingSubmissionController::new(props());
    let client = ScriptedCommerceClient::new().respond_with(json!({
        "data": {
            "checkoutShippingMethodUpdate": {
                "checkout": null,
                "checkoutErrors": [{ "field": "shippingMethod", "message": "Shipping method not applicable" }]
            }
        }
    }));
    let mut session = RecordingSession::default();
    let mut nav = HistoryNavigator::default();

    controller.select_method("SM2");
    controller.submit(&client).unwrap();
    let view = controller.on_response_received(&mut session, &mut nav);

    assert_eq!(
        view,
        ShippingFormView::Form {
            selected: Some("SM2".into()),
            message: Some("Shipping method not applicable".into()),
        }
    );
    assert!(session.shipping.is_empty());
    assert!(nav.history.is_empty());
}

#[test]
fn network_failure_and_server_errors() {
    let mut controller = ShippingSubmissionController::new(props());
    let client = ScriptedCommerceClient::new()
        .fail_with("offline")
        .respond_with(server_errors_response());
    let mut session = RecordingSession::default();
    let mut nav = HistoryNavigator::default();

    controller.select_method("SM1");
    controller.submit(&client).unwrap();
    assert_eq!(
        controller.on_response_received(&mut session, &mut nav),
        ShippingFormView::NetworkError(NETWORK_ERROR_MESSAGE)
    );

    controller.submit(&client).unwrap();
    assert_eq!(
        controller.on_response_received(&mut session, &mut nav),
        ShippingFormView::Failure(SERVER_ERROR_MESSAGE)
    );
    assert!(session.shipping.is_empty());
}
