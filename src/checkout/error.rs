use std::fmt;

#[derive(Debug)]
pub enum CheckoutError {
    /// Request never produced a response (connection refused, DNS, timeout)
    Transport { endpoint: String, source: reqwest::Error },

    /// Network failure reported without an underlying reqwest error
    Network(String),

    /// Server answered with a non-2xx status
    HttpStatus { endpoint: String, status: u16 },

    /// Response body was not the JSON shape we expected
    ResponseParse { context: String, source: serde_json::Error },

    /// Request body could not be serialized
    RequestSerialize { context: String, source: serde_json::Error },

    /// Form template declared a field type we cannot render
    UnknownFieldType(String),

    /// Form state was asked about a field its template does not declare
    UnknownField { form_id: String, field: String },

    /// Customer status reducer received an action it does not know
    UnknownCustomerAction(String),

    /// Request lifecycle was asked to make a transition it does not allow
    InvalidTransition { from: String, event: String },

    /// A submission was started while another one is still pending
    SubmissionInFlight,

    /// Config or order file could not be read or parsed
    Config(String),
}

impl fmt::Display for CheckoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutError::Transport { endpoint, source } => {
                write!(f, "Request to {} failed: {}", endpoint, source)
            }
            CheckoutError::Network(msg) => {
                write!(f, "Network error: {}", msg)
            }
            CheckoutError::HttpStatus { endpoint, status } => {
                write!(f, "{} answered with HTTP {}", endpoint, status)
            }
            CheckoutError::ResponseParse { context, source } => {
                write!(f, "JSON parse error ({}): {}", context, source)
            }
            CheckoutError::RequestSerialize { context, source } => {
                write!(f, "JSON serialize error ({}): {}", context, source)
            }
            CheckoutError::UnknownFieldType(kind) => {
                write!(f, "Invalid type provided to form field: {}", kind)
            }
            CheckoutError::UnknownField { form_id, field } => {
                write!(f, "Form '{}' has no field '{}'", form_id, field)
            }
            CheckoutError::UnknownCustomerAction(action) => {
                write!(f, "Incorrect type for customer status, {}", action)
            }
            CheckoutError::InvalidTransition { from, event } => {
                write!(f, "Cannot apply {} to request in state {}", event, from)
            }
            CheckoutError::SubmissionInFlight => {
                write!(f, "A submission is already pending")
            }
            CheckoutError::Config(msg) => {
                write!(f, "Config error: {}", msg)
            }
        }
    }
}

impl std::error::Error for CheckoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CheckoutError::Transport { source, .. } => Some(source),
            CheckoutError::ResponseParse { source, .. } => Some(source),
            CheckoutError::RequestSerialize { source, .. } => Some(source),
            _ => None,
        }
    }
}
