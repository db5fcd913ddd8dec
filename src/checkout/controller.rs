use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, warn};

use crate::checkout::boundary::{CheckoutSession, Navigator};
use crate::checkout::error::CheckoutError;
use crate::checkout::mutation::{PreCheckoutValues, make_checkout_create_mutation, make_lines};
use crate::checkout::process::{CartItem, CheckoutProcess, SubmittedFormValues};
use crate::checkout::response::{CHECKOUT_CREATE, CheckoutFieldError, ResponseOutcome, classify};
use crate::checkout::router::CheckoutStep;
use crate::form::state::{FormState, FormValues};
use crate::form::template::{
    EMAIL_FIELD, FormTemplate, billing_form_template, shipping_form_template,
};
use crate::request::client::CommerceClient;
use crate::request::executor::{RequestExecutor, RequestStatus};
use crate::request::graphql::GraphQlRequest;
use crate::trace::{logger::TraceLogger, trace::TraceEvent};

pub const NETWORK_ERROR_MESSAGE: &str =
    "Sorry, there seems to be a network error. Please check your connection and refresh the page.";
pub const SERVER_ERROR_MESSAGE: &str = "Sorry, there is an error! Please refresh and try again";
pub const UNKNOWN_STATE_MESSAGE: &str = "Sorry, we are not sure what happened";

const FIELD_ERRORS_PREFIX: &str = "Sorry your form has errors in the following fields. ";
const FIELD_ERRORS_SUFFIX: &str = ".Please check and resubmit.";

// ============================================================================
// Form error state
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors {
    pub has_errors: bool,
    pub message: String,
}

/// Build the inline message for server-reported field errors. Errors are
/// listed in response order and named by the label of the first template
/// declaring that field; a field no template knows is listed by its server
/// message instead.
pub fn map_field_errors_to_labels(
    errors: &[CheckoutFieldError],
    templates: &[&FormTemplate],
) -> String {
    let mut message = String::from(FIELD_ERRORS_PREFIX);

    for (i, err) in errors.iter().enumerate() {
        let label = err.field.as_deref().and_then(|name| {
            templates
                .iter()
                .find_map(|t| t.field(name))
                .map(|f| f.label.as_str())
        });

        let entry = match label {
            Some(label) => label.to_string(),
            None => {
                warn!(
                    field = err.field.as_deref().unwrap_or("<none>"),
                    message = err.message.as_deref().unwrap_or(""),
                    "server reported an error for a field no form declares"
                );
                err.message
                    .clone()
                    .or_else(|| err.field.clone())
                    .unwrap_or_else(|| "Unknown field".to_string())
            }
        };
        message.push_str(&format!("{}. {}  ", i + 1, entry));
    }

    message.push_str(FIELD_ERRORS_SUFFIX);
    message
}

// ============================================================================
// Rendered outcome of the address step
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum AddressView {
    /// Address form; `message` is set when the server reported field errors
    Form {
        has_form_errors: bool,
        message: Option<String>,
    },
    Loading,
    NetworkError(&'static str),
    Failure(&'static str),
    Redirect(&'static str),
}

// ============================================================================
// CheckoutSubmissionController
// ============================================================================

/// Drives the address step: tracks shipping/billing input, submits
/// `checkoutCreate`, and decides whether to stay on the step or advance.
pub struct CheckoutSubmissionController {
    shipping: FormState,
    billing: FormState,
    billing_same_as_shipping: bool,
    submitted_form_values: SubmittedFormValues,
    form_errors: FormErrors,
    executor: RequestExecutor<Value>,
    outcome: Option<ResponseOutcome>,
    was_submitted_success: bool,
    tracer: Arc<TraceLogger>,
}

impl CheckoutSubmissionController {
    /// Start the step. Fields are pre-filled from a previously confirmed
    /// address step when the process has one.
    pub fn new(process: &CheckoutProcess) -> Self {
        Self::with_templates(process, shipping_form_template(), billing_form_template())
    }

    pub fn with_templates(
        process: &CheckoutProcess,
        shipping_template: FormTemplate,
        billing_template: FormTemplate,
    ) -> Self {
        Self {
            shipping: FormState::with_initial(shipping_template, process.confirmed_shipping_values()),
            billing: FormState::with_initial(billing_template, process.confirmed_billing_values()),
            billing_same_as_shipping: false,
            submitted_form_values: SubmittedFormValues::default(),
            form_errors: FormErrors::default(),
            executor: RequestExecutor::new(),
            outcome: None,
            was_submitted_success: false,
            tracer: Arc::new(TraceLogger::disabled()),
        }
    }

    pub fn with_tracer(mut self, tracer: Arc<TraceLogger>) -> Self {
        self.tracer = tracer;
        self
    }

    // ---- Accessors ----

    pub fn shipping_form(&self) -> &FormState {
        &self.shipping
    }

    pub fn billing_form(&self) -> &FormState {
        &self.billing
    }

    pub fn shipping_form_mut(&mut self) -> &mut FormState {
        &mut self.shipping
    }

    pub fn billing_form_mut(&mut self) -> &mut FormState {
        &mut self.billing
    }

    pub fn billing_same_as_shipping(&self) -> bool {
        self.billing_same_as_shipping
    }

    pub fn submitted_form_values(&self) -> &SubmittedFormValues {
        &self.submitted_form_values
    }

    pub fn form_errors(&self) -> &FormErrors {
        &self.form_errors
    }

    pub fn request_status(&self) -> RequestStatus {
        self.executor.status()
    }

    pub fn request_error(&self) -> Option<&CheckoutError> {
        self.executor.error()
    }

    // ---- Input events ----

    pub fn set_billing_same_as_shipping(&mut self, same: bool) {
        self.billing_same_as_shipping = same;
    }

    pub fn toggle_billing_same_as_shipping(&mut self) {
        self.billing_same_as_shipping = !self.billing_same_as_shipping;
    }

    pub fn set_shipping_value(&mut self, name: &str, value: &str) -> Result<(), CheckoutError> {
        self.shipping.set_value(name, value)
    }

    pub fn set_billing_value(&mut self, name: &str, value: &str) -> Result<(), CheckoutError> {
        self.billing.set_value(name, value)
    }

    /// Billing values as they would be submitted right now.
    pub fn billing_values(&self) -> FormValues {
        if self.billing_same_as_shipping {
            let mut values = self.shipping.values();
            values.remove(EMAIL_FIELD);
            values
        } else {
            self.billing.values()
        }
    }

    // ---- Submission ----

    /// Capture the form values, build the `checkoutCreate` request and enter
    /// Pending. Refused with `SubmissionInFlight` (and nothing captured) while
    /// an earlier submission is still pending.
    pub fn start_submission(&mut self, cart: &[CartItem]) -> Result<GraphQlRequest, CheckoutError> {
        if self.executor.status() == RequestStatus::Pending {
            warn!("submit ignored: a checkout submission is already pending");
            return Err(CheckoutError::SubmissionInFlight);
        }

        let shipping_values = self.shipping.values();
        let billing_values = self.billing_values();
        let email = shipping_values.get(EMAIL_FIELD).cloned().unwrap_or_default();

        self.submitted_form_values = SubmittedFormValues {
            shipping_form_values: Some(shipping_values.clone()),
            billing_form_values: Some(billing_values.clone()),
        };
        self.shipping.mark_submitted();
        if !self.billing_same_as_shipping {
            self.billing.mark_submitted();
        }

        let pre_checkout = PreCheckoutValues {
            email,
            lines: make_lines(cart),
            shipping_address: shipping_values,
            billing_address: billing_values,
        };
        let request = GraphQlRequest::new(make_checkout_create_mutation(&pre_checkout));

        self.form_errors = FormErrors::default();
        self.outcome = None;
        self.executor.begin()?;

        info!(lines = pre_checkout.lines.len(), "submitting checkoutCreate");
        self.tracer.log(
            &TraceEvent::now(CheckoutStep::Address, "submit")
                .with_status(self.executor.status())
                .with_detail(format!("{} line items", pre_checkout.lines.len())),
        );

        Ok(request)
    }

    /// Record what the pending call produced. Network failures become the
    /// Rejected state; they are never returned as `Err`.
    pub fn complete_submission(
        &mut self,
        outcome: Result<Value, CheckoutError>,
    ) -> Result<RequestStatus, CheckoutError> {
        if let Err(e) = &outcome {
            error!(error = %e, "checkoutCreate request failed");
        }
        self.executor.settle(outcome)?;
        self.tracer.log(
            &TraceEvent::now(CheckoutStep::Address, "settled").with_status(self.executor.status()),
        );
        Ok(self.executor.status())
    }

    /// Full submit: capture, post through `client`, settle.
    pub fn submit(
        &mut self,
        client: &dyn CommerceClient,
        cart: &[CartItem],
    ) -> Result<RequestStatus, CheckoutError> {
        let request = self.start_submission(cart)?;
        let outcome = client.post(&request);
        self.complete_submission(outcome)
    }

    /// Interpret a resolved response. Advances through `session` and
    /// `navigator` at most once per submission.
    pub fn on_response_received(
        &mut self,
        session: &mut dyn CheckoutSession,
        navigator: &mut dyn Navigator,
    ) -> AddressView {
        if self.outcome.is_some() || self.was_submitted_success {
            return self.view();
        }
        let Some(body) = self.executor.data() else {
            return self.view();
        };

        let outcome = classify(body, CHECKOUT_CREATE);
        match &outcome {
            ResponseOutcome::ServerErrors(messages) => {
                error!("\nError Details: {}", messages.join("\n"));
                self.tracer.log(
                    &TraceEvent::now(CheckoutStep::Address, "response")
                        .with_outcome("server_errors")
                        .with_detail(messages.join("; ")),
                );
            }
            ResponseOutcome::FieldErrors(errors) => {
                let message =
                    map_field_errors_to_labels(errors, &[self.shipping.template(), self.billing.template()]);
                info!(count = errors.len(), "checkoutCreate reported field errors");
                self.form_errors = FormErrors {
                    has_errors: true,
                    message,
                };
                self.tracer.log(
                    &TraceEvent::now(CheckoutStep::Address, "response")
                        .with_outcome("field_errors")
                        .with_fields(errors.iter().filter_map(|e| e.field.clone())),
                );
            }
            ResponseOutcome::Confirmed(checkout) => {
                info!(checkout_id = %checkout.id, "checkout created");
                session.checkout_created(checkout, &self.submitted_form_values);
                self.was_submitted_success = true;
                let next = CheckoutStep::Address.next().unwrap_or(CheckoutStep::Shipping);
                navigator.navigate(next.path());
                self.tracer.log(
                    &TraceEvent::now(CheckoutStep::Address, "response")
                        .with_outcome("confirmed")
                        .with_path(next.path())
                        .with_detail(&checkout.id),
                );
            }
            ResponseOutcome::Unrecognized => {
                warn!("checkoutCreate response had an unexpected shape");
                self.tracer.log(
                    &TraceEvent::now(CheckoutStep::Address, "response").with_outcome("unrecognized"),
                );
            }
        }
        self.outcome = Some(outcome);
        self.view()
    }

    /// Convenience: submit, then interpret the response.
    pub fn submit_and_handle(
        &mut self,
        client: &dyn CommerceClient,
        cart: &[CartItem],
        session: &mut dyn CheckoutSession,
        navigator: &mut dyn Navigator,
    ) -> Result<AddressView, CheckoutError> {
        self.submit(client, cart)?;
        Ok(self.on_response_received(session, navigator))
    }

    /// What the address step shows for the current state.
    pub fn view(&self) -> AddressView {
        if self.was_submitted_success {
            return AddressView::Redirect(CheckoutStep::Shipping.path());
        }

        match self.executor.status() {
            RequestStatus::Idle => AddressView::Form {
                has_form_errors: false,
                message: None,
            },
            RequestStatus::Pending => AddressView::Loading,
            RequestStatus::Rejected => AddressView::NetworkError(NETWORK_ERROR_MESSAGE),
            RequestStatus::Resolved => match &self.outcome {
                None => AddressView::Loading,
                Some(ResponseOutcome::ServerErrors(_)) => AddressView::Failure(SERVER_ERROR_MESSAGE),
                Some(ResponseOutcome::FieldErrors(_)) => AddressView::Form {
                    has_form_errors: self.form_errors.has_errors,
                    message: Some(self.form_errors.message.clone()),
                },
                Some(ResponseOutcome::Confirmed(_)) => {
                    AddressView::Redirect(CheckoutStep::Shipping.path())
                }
                Some(ResponseOutcome::Unrecognized) => AddressView::Failure(UNKNOWN_STATE_MESSAGE),
            },
        }
    }
}
