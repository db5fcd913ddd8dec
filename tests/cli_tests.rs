use std::{fs, sync::Arc};

use clap::Parser;
use serde_json::json;
use storefront_checkout::{
    cli::{
        commands::{run_order, validate_order},
        config::{Cli, Commands, OrderFile, load_config, load_order, resolve_endpoint},
    },
    report::{
        console::format_console_report,
        report_model::{CheckoutRunReport, StepReport},
    },
    request::client::{DEFAULT_ENDPOINT, ScriptedCommerceClient},
    trace::logger::TraceLogger,
};

use crate::common::{created_response, field_errors_response, sample_cart, shipping_values};

mod common;

fn order() -> OrderFile {
    OrderFile {
        cart: sample_cart(),
        shipping: shipping_values(),
        billing: Default::default(),
        billing_same_as_shipping: true,
        shipping_method: Some("SM1".into()),
    }
}

fn shipping_updated_response() -> serde_json::Value {
    json!({
        "data": {
            "checkoutShippingMethodUpdate": {
                "checkout": { "id": "C1" },
                "checkoutErrors": []
            }
        }
    })
}

// ============================================================================
// Argument parsing and config
// ============================================================================

#[test]
fn parses_checkout_subcommand_with_global_flags() {
    let cli = Cli::parse_from([
        "storefront-checkout",
        "-vv",
        "--endpoint",
        "http://shop.test/graphql/",
        "checkout",
        "--order",
        "order.yaml",
        "--format",
        "json",
    ]);

    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.endpoint.as_deref(), Some("http://shop.test/graphql/"));
    match cli.command {
        Commands::Checkout { order, format } => {
            assert_eq!(order, "order.yaml");
            assert_eq!(format, "json");
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn missing_config_file_gives_defaults() {
    let config = load_config(Some("/nonexistent/storefront-checkout.yaml"));
    assert_eq!(config.api.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(config.api.timeout_secs, None);
    assert_eq!(config.trace.path.as_deref(), Some("checkout_trace.jsonl"));
    assert_eq!(config.routes.home, "/");
}

#[test]
fn config_file_overrides_defaults_and_cli_overrides_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storefront-checkout.yaml");
    fs::write(
        &path,
        "api:\n  endpoint: http://config.test/graphql/\n  timeout_secs: 15\nroutes:\n  home: /shop\n",
    )
    .unwrap();

    let config = load_config(path.to_str());
    assert_eq!(config.api.endpoint, "http://config.test/graphql/");
    assert_eq!(config.api.timeout_secs, Some(15));
    assert_eq!(config.routes.home, "/shop");
    assert_eq!(config.trace.path.as_deref(), Some("checkout_trace.jsonl"));

    assert_eq!(resolve_endpoint(None, &config), "http://config.test/graphql/");
    assert_eq!(resolve_endpoint(Some("http://cli.test/"), &config), "http://cli.test/");
}

#[test]
fn order_file_loads_from_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("order.yaml");
    fs::write(
        &path,
        r#"
cart:
  - quantity: 2
    variantId: A
shipping:
  email: jane@example.com
  firstName: Jane
billing_same_as_shipping: true
shipping_method: SM1
"#,
    )
    .unwrap();

    let order = load_order(path.to_str().unwrap()).unwrap();
    assert_eq!(order.cart.len(), 1);
    assert_eq!(order.cart[0].variant_id, "A");
    assert_eq!(order.shipping.get("firstName").map(String::as_str), Some("Jane"));
    assert!(order.billing_same_as_shipping);
    assert_eq!(order.shipping_method.as_deref(), Some("SM1"));
}

#[test]
fn unreadable_order_file_is_a_config_error() {
    let err = load_order("/nonexistent/order.yaml").unwrap_err();
    assert!(err.to_string().contains("cannot read order file"));
}

// ============================================================================
// validate
// ============================================================================

#[test]
fn valid_order_has_no_problems() {
    assert!(validate_order(&order()).unwrap().is_empty());
}

#[test]
fn invalid_values_are_reported_per_form_and_label() {
    let mut order = order();
    order.shipping.insert("email".into(), "not-an-email".into());
    order.shipping.remove("city");
    order.billing_same_as_shipping = false;

    let problems = validate_order(&order).unwrap();

    assert!(problems.contains(&"[shipping-form] Email: Email must be a valid email address".to_string()));
    assert!(problems.contains(&"[shipping-form] City: City is required".to_string()));
    assert!(problems.iter().any(|p| p.starts_with("[billing-form] First Name:")));
}

#[test]
fn unknown_field_in_order_is_an_error() {
    let mut order = order();
    order.shipping.insert("favouriteColour".into(), "blue".into());
    assert!(validate_order(&order).is_err());
}

// ============================================================================
// checkout run
// ============================================================================

#[test]
fn run_order_completes_address_and_shipping_steps() {
    let dir = tempfile::tempdir().unwrap();
    let trace_path = dir.path().join("trace.jsonl");
    let tracer = Arc::new(TraceLogger::new(trace_path.to_str().unwrap()));
    let client = ScriptedCommerceClient::new()
        .respond_with(created_response("C1"))
        .respond_with(shipping_updated_response());

    let report = run_order(&order(), &client, tracer, "/").unwrap();

    assert!(report.succeeded());
    assert_eq!(report.steps.len(), 2);
    assert_eq!(report.checkout_id.as_deref(), Some("C1"));
    assert_eq!(report.navigation, vec!["/checkout/shipping", "/checkout/payment"]);
    assert!(report.flash.is_empty());
    assert_eq!(client.request_count(), 2);

    let trace = fs::read_to_string(&trace_path).unwrap();
    let lines: Vec<serde_json::Value> = trace
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert!(!lines.is_empty());
    assert!(lines.iter().any(|l| l["step"] == "shipping" && l["outcome"] == "confirmed"));
}

#[test]
fn run_order_stops_after_address_field_errors() {
    let client = ScriptedCommerceClient::new().respond_with(field_errors_response(&["postalCode"]));

    let report = run_order(&order(), &client, Arc::new(TraceLogger::disabled()), "/").unwrap();

    assert!(!report.succeeded());
    assert_eq!(report.steps.len(), 1);
    let step = &report.steps[0];
    assert_eq!(step.request_status, "resolved");
    assert!(step.message.as_deref().unwrap().contains("1. Postal Code"));
    assert!(report.navigation.is_empty());
    assert_eq!(client.request_count(), 1);
}

#[test]
fn run_order_reports_network_error() {
    let client = ScriptedCommerceClient::new().fail_with("connection refused");

    let report = run_order(&order(), &client, Arc::new(TraceLogger::disabled()), "/").unwrap();

    assert_eq!(report.steps[0].request_status, "rejected");
    assert!(report.steps[0].message.as_deref().unwrap().contains("network error"));
}

// ============================================================================
// Reports
// ============================================================================

#[test]
fn console_report_lists_steps_and_navigation() {
    let report = CheckoutRunReport {
        steps: vec![
            StepReport {
                step: "address".into(),
                request_status: "resolved".into(),
                advanced: true,
                message: None,
            },
            StepReport {
                step: "shipping".into(),
                request_status: "rejected".into(),
                advanced: false,
                message: Some("offline".into()),
            },
        ],
        checkout_id: Some("C1".into()),
        navigation: vec!["/checkout/shipping".into()],
        flash: vec![],
    };

    let out = format_console_report(&report);
    assert!(out.starts_with("=== Checkout ===\n"));
    assert!(out.contains("\u{2713} address   resolved"));
    assert!(out.contains("\u{2717} shipping  rejected"));
    assert!(out.contains("    offline\n"));
    assert!(out.contains("Checkout: C1"));
    assert!(out.contains("Navigated: /checkout/shipping"));
    assert!(!report.succeeded());
}

#[test]
fn json_report_omits_absent_checkout_id() {
    let report = CheckoutRunReport::default();
    let value = serde_json::to_value(&report).unwrap();
    assert!(value.get("checkout_id").is_none());
    assert_eq!(value["steps"], json!([]));
    assert!(!report.succeeded());
}
