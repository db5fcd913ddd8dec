use std::fmt;

use tracing::debug;

use crate::checkout::error::CheckoutError;

// ============================================================================
// Request lifecycle
// ============================================================================

/// Lifecycle of one outstanding call.
#[derive(Debug)]
pub enum RequestState<T> {
    Idle,
    Pending,
    Resolved(T),
    Rejected(CheckoutError),
}

/// Payload-free view of `RequestState`, for rendering decisions and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Idle,
    Pending,
    Resolved,
    Rejected,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestStatus::Idle => "idle",
            RequestStatus::Pending => "pending",
            RequestStatus::Resolved => "resolved",
            RequestStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

impl<T> RequestState<T> {
    pub fn status(&self) -> RequestStatus {
        match self {
            RequestState::Idle => RequestStatus::Idle,
            RequestState::Pending => RequestStatus::Pending,
            RequestState::Resolved(_) => RequestStatus::Resolved,
            RequestState::Rejected(_) => RequestStatus::Rejected,
        }
    }
}

#[derive(Debug)]
pub enum RequestEvent<T> {
    Start,
    Resolve(T),
    Reject(CheckoutError),
}

impl<T> RequestEvent<T> {
    fn name(&self) -> &'static str {
        match self {
            RequestEvent::Start => "start",
            RequestEvent::Resolve(_) => "resolve",
            RequestEvent::Reject(_) => "reject",
        }
    }
}

/// Pure transition function. A start while pending is refused so only one
/// call is ever in flight; resolve/reject are only legal while pending.
pub fn transition<T>(
    state: &RequestState<T>,
    event: RequestEvent<T>,
) -> Result<RequestState<T>, CheckoutError> {
    match (state.status(), event) {
        (RequestStatus::Pending, RequestEvent::Start) => Err(CheckoutError::SubmissionInFlight),
        (_, RequestEvent::Start) => Ok(RequestState::Pending),
        (RequestStatus::Pending, RequestEvent::Resolve(payload)) => Ok(RequestState::Resolved(payload)),
        (RequestStatus::Pending, RequestEvent::Reject(error)) => Ok(RequestState::Rejected(error)),
        (status, event) => Err(CheckoutError::InvalidTransition {
            from: status.to_string(),
            event: event.name().to_string(),
        }),
    }
}

// ============================================================================
// RequestExecutor: owns exactly one RequestState
// ============================================================================

pub struct RequestExecutor<T> {
    state: RequestState<T>,
}

impl<T> RequestExecutor<T> {
    pub fn new() -> Self {
        Self {
            state: RequestState::Idle,
        }
    }

    pub fn state(&self) -> &RequestState<T> {
        &self.state
    }

    pub fn status(&self) -> RequestStatus {
        self.state.status()
    }

    pub fn data(&self) -> Option<&T> {
        match &self.state {
            RequestState::Resolved(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&CheckoutError> {
        match &self.state {
            RequestState::Rejected(error) => Some(error),
            _ => None,
        }
    }

    fn apply(&mut self, event: RequestEvent<T>) -> Result<(), CheckoutError> {
        let next = transition(&self.state, event)?;
        debug!(from = %self.state.status(), to = %next.status(), "request transition");
        self.state = next;
        Ok(())
    }

    /// Enter Pending. Fails with `SubmissionInFlight` if a call is already pending.
    pub fn begin(&mut self) -> Result<(), CheckoutError> {
        self.apply(RequestEvent::Start)
    }

    /// Record the outcome of the pending call. Failures become `Rejected`
    /// state rather than an error to the caller.
    pub fn settle(&mut self, outcome: Result<T, CheckoutError>) -> Result<(), CheckoutError> {
        match outcome {
            Ok(payload) => self.apply(RequestEvent::Resolve(payload)),
            Err(error) => self.apply(RequestEvent::Reject(error)),
        }
    }

    /// Start a fresh cycle and drive `call` to completion. Only the in-flight
    /// guard surfaces as `Err`; the call's own failure lands in the state.
    pub fn run<F>(&mut self, call: F) -> Result<RequestStatus, CheckoutError>
    where
        F: FnOnce() -> Result<T, CheckoutError>,
    {
        self.begin()?;
        self.settle(call())?;
        Ok(self.status())
    }

    pub fn reset(&mut self) {
        self.state = RequestState::Idle;
    }
}

impl<T> Default for RequestExecutor<T> {
    fn default() -> Self {
        Self::new()
    }
}
