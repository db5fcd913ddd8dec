use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, warn};

use crate::checkout::boundary::{CheckoutSession, Navigator};
use crate::checkout::controller::{
    NETWORK_ERROR_MESSAGE, SERVER_ERROR_MESSAGE, UNKNOWN_STATE_MESSAGE,
};
use crate::checkout::error::CheckoutError;
use crate::checkout::mutation::make_shipping_method_update_mutation;
use crate::checkout::response::{CHECKOUT_SHIPPING_METHOD_UPDATE, ResponseOutcome, classify};
use crate::checkout::router::{CheckoutStep, ShippingStepProps};
use crate::request::client::CommerceClient;
use crate::request::executor::{RequestExecutor, RequestStatus};
use crate::request::graphql::GraphQlRequest;
use crate::trace::{logger::TraceLogger, trace::TraceEvent};

pub const NO_METHOD_SELECTED_MESSAGE: &str = "Please choose a shipping method";
pub const MISSING_CHECKOUT_MESSAGE: &str =
    "Sorry, we could not find your checkout. Please go back and submit your address again";

#[derive(Debug, Clone, PartialEq)]
pub enum ShippingFormView {
    Form {
        selected: Option<String>,
        message: Option<String>,
    },
    Loading,
    NetworkError(&'static str),
    Failure(&'static str),
    Redirect(&'static str),
}

/// Shipping-method step, rendered once the shipping gate has loaded.
pub struct ShippingSubmissionController {
    props: ShippingStepProps,
    selected: Option<String>,
    message: Option<String>,
    executor: RequestExecutor<Value>,
    outcome: Option<ResponseOutcome>,
    was_submitted_success: bool,
    tracer: Arc<TraceLogger>,
}

impl ShippingSubmissionController {
    pub fn new(props: ShippingStepProps) -> Self {
        Self {
            props,
            selected: None,
            message: None,
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

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn request_status(&self) -> RequestStatus {
        self.executor.status()
    }

    /// Choose a method; ids not offered by the address step are ignored.
    pub fn select_method(&mut self, method_id: &str) -> bool {
        let offered = self
            .props
            .available_shipping_methods
            .iter()
            .any(|m| m.id == method_id);
        if offered {
            self.selected = Some(method_id.to_string());
        } else {
            warn!(method_id, "shipping method not offered for this checkout");
        }
        offered
    }

    /// Post `checkoutShippingMethodUpdate` for the selected method.
    pub fn submit(&mut self, client: &dyn CommerceClient) -> Result<RequestStatus, CheckoutError> {
        if self.executor.status() == RequestStatus::Pending {
            return Err(CheckoutError::SubmissionInFlight);
        }
        let Some(checkout_id) = &self.props.checkout_id else {
            warn!("shipping step has no checkout id, nothing to update");
            self.message = Some(MISSING_CHECKOUT_MESSAGE.to_string());
            return Ok(self.executor.status());
        };
        let Some(method_id) = &self.selected else {
            self.message = Some(NO_METHOD_SELECTED_MESSAGE.to_string());
            return Ok(self.executor.status());
        };

        let request = GraphQlRequest::new(make_shipping_method_update_mutation(checkout_id, method_id));
        self.message = None;
        self.outcome = None;

        info!(checkout_id = %checkout_id, method_id = %method_id, "submitting shipping method");
        self.tracer.log(
            &TraceEvent::now(CheckoutStep::Shipping, "submit").with_detail(method_id),
        );

        let status = self.executor.run(|| client.post(&request))?;
        if let Some(e) = self.executor.error() {
            error!(error = %e, "shipping method request failed");
        }
        Ok(status)
    }

    pub fn on_response_received(
        &mut self,
        session: &mut dyn CheckoutSession,
        navigator: &mut dyn Navigator,
    ) -> ShippingFormView {
        if self.outcome.is_some() || self.was_submitted_success {
            return self.view();
        }
        let Some(body) = self.executor.data() else {
            return self.view();
        };

        let outcome = classify(body, CHECKOUT_SHIPPING_METHOD_UPDATE);
        match &outcome {
            ResponseOutcome::ServerErrors(messages) => {
                error!("\nError Details: {}", messages.join("\n"));
            }
            ResponseOutcome::FieldErrors(errors) => {
                let details: Vec<String> = errors
                    .iter()
                    .filter_map(|e| e.message.clone())
                    .collect();
                self.message = Some(if details.is_empty() {
                    NO_METHOD_SELECTED_MESSAGE.to_string()
                } else {
                    details.join(" ")
                });
            }
            ResponseOutcome::Confirmed(checkout) => {
                if let Some(method_id) = &self.selected {
                    session.shipping_updated(checkout, method_id);
                }
                self.was_submitted_success = true;
                let next = CheckoutStep::Shipping.next().unwrap_or(CheckoutStep::Payment);
                navigator.navigate(next.path());
            }
            ResponseOutcome::Unrecognized => {
                warn!("checkoutShippingMethodUpdate response had an unexpected shape");
            }
        }
        self.tracer.log(
            &TraceEvent::now(CheckoutStep::Shipping, "response").with_outcome(outcome_name(&outcome)),
        );
        self.outcome = Some(outcome);
        self.view()
    }

    pub fn view(&self) -> ShippingFormView {
        if self.was_submitted_success {
            return ShippingFormView::Redirect(CheckoutStep::Payment.path());
        }
        let form = || ShippingFormView::Form {
            selected: self.selected.clone(),
            message: self.message.clone(),
        };
        match self.executor.status() {
            RequestStatus::Idle => form(),
            RequestStatus::Pending => ShippingFormView::Loading,
            RequestStatus::Rejected => ShippingFormView::NetworkError(NETWORK_ERROR_MESSAGE),
            RequestStatus::Resolved => match &self.outcome {
                None => ShippingFormView::Loading,
                Some(ResponseOutcome::ServerErrors(_)) => ShippingFormView::Failure(SERVER_ERROR_MESSAGE),
                Some(ResponseOutcome::FieldErrors(_)) => form(),
                Some(ResponseOutcome::Confirmed(_)) => {
                    ShippingFormView::Redirect(CheckoutStep::Payment.path())
                }
                Some(ResponseOutcome::Unrecognized) => ShippingFormView::Failure(UNKNOWN_STATE_MESSAGE),
            },
        }
    }
}

fn outcome_name(outcome: &ResponseOutcome) -> &'static str {
    match outcome {
        ResponseOutcome::ServerErrors(_) => "server_errors",
        ResponseOutcome::FieldErrors(_) => "field_errors",
        ResponseOutcome::Confirmed(_) => "confirmed",
        ResponseOutcome::Unrecognized => "unrecognized",
    }
}
