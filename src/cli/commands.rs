use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::catalog::featured::{FeaturedProducts, FeaturedView};
use crate::checkout::boundary::{CheckoutSession, FlashQueue, HistoryNavigator, InMemorySession};
use crate::checkout::controller::CheckoutSubmissionController;
use crate::checkout::router::{FormLoadState, ShippingStepGate};
use crate::checkout::shipping::ShippingSubmissionController;
use crate::cli::config::{AppConfig, OrderFile, load_order};
use crate::form::state::FormState;
use crate::form::template::{
    FormTemplate, billing_form_template, login_form_template, shipping_form_template,
};
use crate::report::console::format_console_report;
use crate::report::report_model::{CheckoutRunReport, StepReport};
use crate::request::client::{CommerceClient, HttpCommerceClient};
use crate::trace::logger::TraceLogger;

// ============================================================================
// checkout subcommand
// ============================================================================

/// Run the order through the checkout and return whether every step advanced.
pub fn cmd_checkout(
    order_path: &str,
    format: &str,
    endpoint: &str,
    config: &AppConfig,
) -> Result<bool, Box<dyn std::error::Error>> {
    let order = load_order(order_path)?;
    let client = build_client(endpoint, config)?;
    let tracer = Arc::new(match &config.trace.path {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    });
    if tracer.is_enabled() {
        info!(path = config.trace.path.as_deref().unwrap_or_default(), "recording checkout trace");
    }

    let report = run_order(&order, &client, tracer, &config.routes.home)?;

    let output = match format {
        "json" => serde_json::to_string_pretty(&report)? + "\n",
        _ => format_console_report(&report),
    };
    print!("{}", output);

    Ok(report.succeeded())
}

/// Drive address and (optionally) shipping steps for one order against
/// `client`. Separate from `cmd_checkout` so it can run without a network.
pub fn run_order(
    order: &OrderFile,
    client: &dyn CommerceClient,
    tracer: Arc<TraceLogger>,
    home_path: &str,
) -> Result<CheckoutRunReport, Box<dyn std::error::Error>> {
    let mut session = InMemorySession::default();
    let mut navigator = HistoryNavigator::default();
    let mut flash = FlashQueue::default();
    let mut report = CheckoutRunReport::default();

    // ---- Address step ----
    let mut address = CheckoutSubmissionController::new(session.checkout_process())
        .with_tracer(Arc::clone(&tracer));
    address.set_billing_same_as_shipping(order.billing_same_as_shipping);
    fill(address.shipping_form_mut(), &order.shipping)?;
    if !order.billing_same_as_shipping {
        fill(address.billing_form_mut(), &order.billing)?;
    }

    let view = address.submit_and_handle(client, &order.cart, &mut session, &mut navigator)?;
    report.steps.push(StepReport::from_address_view(
        &address.request_status().to_string(),
        &view,
    ));

    // ---- Shipping step ----
    if let Some(method_id) = &order.shipping_method {
        if report.succeeded() {
            let mut gate = ShippingStepGate::new()
                .with_home_path(home_path)
                .with_tracer(Arc::clone(&tracer));
            let state = gate
                .enter(&order.cart, session.checkout_process(), &mut navigator, &mut flash)
                .clone();

            if let FormLoadState::Loaded(props) = state {
                let mut shipping = ShippingSubmissionController::new(props).with_tracer(Arc::clone(&tracer));
                shipping.select_method(method_id);
                shipping.submit(client)?;
                let view = shipping.on_response_received(&mut session, &mut navigator);
                report.steps.push(StepReport::from_shipping_view(
                    &shipping.request_status().to_string(),
                    &view,
                ));
            }
        }
    }

    report.checkout_id = session.process.checkout_id.clone();
    report.navigation = navigator.history;
    report.flash = flash.messages;
    Ok(report)
}

fn fill(form: &mut FormState, values: &crate::form::state::FormValues) -> Result<(), Box<dyn std::error::Error>> {
    for (name, value) in values {
        form.set_value(name, value)?;
    }
    Ok(())
}

// ============================================================================
// validate subcommand
// ============================================================================

/// Validate an order's form values. Returns whether everything passed.
pub fn cmd_validate(order_path: &str) -> Result<bool, Box<dyn std::error::Error>> {
    let order = load_order(order_path)?;
    let problems = validate_order(&order)?;

    if problems.is_empty() {
        println!("All fields valid");
        return Ok(true);
    }
    for line in &problems {
        println!("{}", line);
    }
    Ok(false)
}

/// One line per failing field: `[form-id] Label: message; message`.
pub fn validate_order(order: &OrderFile) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let mut forms = vec![(shipping_form_template(), &order.shipping)];
    if !order.billing_same_as_shipping {
        forms.push((billing_form_template(), &order.billing));
    }

    let mut problems = Vec::new();
    for (template, values) in forms {
        let mut state = FormState::new(template);
        fill(&mut state, values)?;
        for (field, errors) in state.invalid_fields() {
            problems.push(format!(
                "[{}] {}: {}",
                state.template().form_id,
                field.label,
                errors.join("; ")
            ));
        }
    }
    Ok(problems)
}

// ============================================================================
// featured subcommand
// ============================================================================

pub fn cmd_featured(endpoint: &str, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let client = build_client(endpoint, config)?;
    let mut featured = FeaturedProducts::new();

    match featured.load(&client)? {
        FeaturedView::Products(products) => {
            for p in &products {
                println!(
                    "{}  {}  {}",
                    p.name,
                    p.link(),
                    p.first_image_url().unwrap_or("-")
                );
            }
        }
        other => println!("{}", other.message().unwrap_or_default()),
    }
    Ok(())
}

// ============================================================================
// templates subcommand
// ============================================================================

pub fn cmd_templates() -> Result<(), Box<dyn std::error::Error>> {
    let templates: Vec<FormTemplate> =
        vec![shipping_form_template(), billing_form_template(), login_form_template()];
    print!("{}", serde_yaml::to_string(&templates)?);
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn build_client(endpoint: &str, config: &AppConfig) -> Result<HttpCommerceClient, Box<dyn std::error::Error>> {
    let timeout = config.api.timeout_secs.map(Duration::from_secs);
    info!(endpoint, ?timeout, "using commerce API");
    Ok(HttpCommerceClient::new(endpoint, timeout)?)
}
