use tracing::info;

use crate::checkout::process::{Checkout, CheckoutProcess, SubmittedFormValues};

/// Moves the user to another page.
pub trait Navigator {
    fn navigate(&mut self, path: &str);
}

/// Surfaces transient notices to the user.
pub trait FlashMessages {
    fn announce(&mut self, messages: Vec<String>);
}

/// Higher-level session that owns the `CheckoutProcess`. Steps read it and
/// append their confirmed results through the callbacks.
pub trait CheckoutSession {
    fn checkout_process(&self) -> &CheckoutProcess;
    fn checkout_created(&mut self, checkout: &Checkout, values: &SubmittedFormValues);
    fn shipping_updated(&mut self, checkout: &Checkout, method_id: &str);
}

// ============================================================================
// In-memory implementations
// ============================================================================

/// Navigator that remembers every path it was sent to.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    pub history: Vec<String>,
}

impl HistoryNavigator {
    pub fn current(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&mut self, path: &str) {
        info!(path, "navigate");
        self.history.push(path.to_string());
    }
}

#[derive(Debug, Default)]
pub struct FlashQueue {
    pub messages: Vec<String>,
}

impl FlashMessages for FlashQueue {
    fn announce(&mut self, messages: Vec<String>) {
        for m in &messages {
            info!(message = %m, "flash");
        }
        self.messages.extend(messages);
    }
}

/// Session kept in memory for the length of one run.
#[derive(Debug, Default)]
pub struct InMemorySession {
    pub process: CheckoutProcess,
    pub created: Vec<Checkout>,
}

impl CheckoutSession for InMemorySession {
    fn checkout_process(&self) -> &CheckoutProcess {
        &self.process
    }

    fn checkout_created(&mut self, checkout: &Checkout, values: &SubmittedFormValues) {
        self.process.record_checkout_created(checkout, values);
        self.created.push(checkout.clone());
    }

    fn shipping_updated(&mut self, checkout: &Checkout, method_id: &str) {
        self.process.record_shipping_method(checkout, method_id);
    }
}
