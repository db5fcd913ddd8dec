use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::checkout::router::CheckoutStep;
use crate::request::executor::RequestStatus;

/// One line of the checkout audit trail.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub step: String,

    pub event: String,

    pub request_status: Option<String>,
    pub outcome: Option<String>,
    pub path: Option<String>,

    pub fields: Vec<String>,
    pub detail: Option<String>,
}

impl TraceEvent {
    pub fn now(step: CheckoutStep, event: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            step: step.name().to_string(),
            event: event.to_string(),
            request_status: None,
            outcome: None,
            path: None,
            fields: vec![],
            detail: None,
        }
    }

    pub fn with_status(mut self, status: RequestStatus) -> Self {
        self.request_status = Some(status.to_string());
        self
    }

    pub fn with_outcome(mut self, outcome: impl ToString) -> Self {
        self.outcome = Some(outcome.to_string());
        self
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
