use std::sync::Arc;

use sha1::{Digest, Sha1};
use tracing::{debug, info};

use crate::checkout::boundary::{FlashMessages, Navigator};
use crate::checkout::process::{CartItem, CheckoutProcess, ShippingMethod};
use crate::trace::{logger::TraceLogger, trace::TraceEvent};

pub const HOME_PATH: &str = "/";
pub const EMPTY_CART_MESSAGE: &str =
    "you have nothing in your cart, please consider buying something first";

// ============================================================================
// Checkout steps
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    Address,
    Shipping,
    Payment,
}

impl CheckoutStep {
    pub const ALL: [CheckoutStep; 3] = [
        CheckoutStep::Address,
        CheckoutStep::Shipping,
        CheckoutStep::Payment,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CheckoutStep::Address => "address",
            CheckoutStep::Shipping => "shipping",
            CheckoutStep::Payment => "payment",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            CheckoutStep::Address => "/checkout/address",
            CheckoutStep::Shipping => "/checkout/shipping",
            CheckoutStep::Payment => "/checkout/payment",
        }
    }

    /// Step that follows this one; `None` after payment.
    pub fn next(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::Address => Some(CheckoutStep::Shipping),
            CheckoutStep::Shipping => Some(CheckoutStep::Payment),
            CheckoutStep::Payment => None,
        }
    }

    pub fn from_path(path: &str) -> Option<CheckoutStep> {
        let trimmed = path.trim_end_matches('/');
        Self::ALL.into_iter().find(|s| s.path() == trimmed)
    }

    /// Position in the flow, for progress trackers.
    pub fn index(&self) -> usize {
        match self {
            CheckoutStep::Address => 0,
            CheckoutStep::Shipping => 1,
            CheckoutStep::Payment => 2,
        }
    }
}

// ============================================================================
// Shipping step gate
// ============================================================================

/// What the shipping form needs from the previous step.
#[derive(Debug, Clone, PartialEq)]
pub struct ShippingStepProps {
    pub available_shipping_methods: Vec<ShippingMethod>,
    pub checkout_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormLoadState {
    Loading,
    Loaded(ShippingStepProps),
    Redirect,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShippingView {
    Message(&'static str),
    Form(ShippingStepProps),
}

/// Guards entry to the shipping step: the cart must be non-empty and the
/// address step must have produced shipping methods.
pub struct ShippingStepGate {
    state: FormLoadState,
    fingerprint: Option<String>,
    home_path: String,
    tracer: Arc<TraceLogger>,
}

impl ShippingStepGate {
    pub fn new() -> Self {
        Self {
            state: FormLoadState::Loading,
            fingerprint: None,
            home_path: HOME_PATH.to_string(),
            tracer: Arc::new(TraceLogger::disabled()),
        }
    }

    pub fn with_home_path(mut self, path: &str) -> Self {
        self.home_path = path.to_string();
        self
    }

    pub fn with_tracer(mut self, tracer: Arc<TraceLogger>) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn state(&self) -> &FormLoadState {
        &self.state
    }

    /// Evaluate the precondition. Runs on first entry and again only when the
    /// cart or checkout process content changed since the last evaluation.
    pub fn enter(
        &mut self,
        cart: &[CartItem],
        process: &CheckoutProcess,
        navigator: &mut dyn Navigator,
        flash: &mut dyn FlashMessages,
    ) -> &FormLoadState {
        let fingerprint = inputs_fingerprint(cart, process);
        if self.fingerprint.as_deref() == Some(fingerprint.as_str()) {
            debug!("shipping gate inputs unchanged, keeping {:?}", self.state);
            return &self.state;
        }
        self.fingerprint = Some(fingerprint);

        match (&process.available_shipping_methods, cart.is_empty()) {
            (Some(methods), false) => {
                info!(methods = methods.len(), "shipping step loaded");
                self.state = FormLoadState::Loaded(ShippingStepProps {
                    available_shipping_methods: methods.clone(),
                    checkout_id: process.checkout_id.clone(),
                });
                self.tracer.log(
                    &TraceEvent::now(CheckoutStep::Shipping, "gate").with_outcome("loaded"),
                );
            }
            _ => {
                info!(cart_items = cart.len(), "shipping step precondition failed, redirecting");
                flash.announce(vec![EMPTY_CART_MESSAGE.to_string()]);
                navigator.navigate(&self.home_path);
                self.state = FormLoadState::Redirect;
                self.tracer.log(
                    &TraceEvent::now(CheckoutStep::Shipping, "gate")
                        .with_outcome("redirect")
                        .with_path(&self.home_path),
                );
            }
        }
        &self.state
    }

    pub fn view(&self) -> ShippingView {
        match &self.state {
            FormLoadState::Loading => ShippingView::Message("Loading form"),
            FormLoadState::Loaded(props) => ShippingView::Form(props.clone()),
            FormLoadState::Redirect => ShippingView::Message("loading"),
        }
    }
}

impl Default for ShippingStepGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Content identity of the gate's inputs.
fn inputs_fingerprint(cart: &[CartItem], process: &CheckoutProcess) -> String {
    let mut hasher = Sha1::new();
    hasher.update(serde_json::to_vec(cart).unwrap_or_default());
    hasher.update(b"|");
    hasher.update(serde_json::to_vec(process).unwrap_or_default());
    format!("{:x}", hasher.finalize())
}
