use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::checkout::error::CheckoutError;
use crate::request::graphql::GraphQlRequest;

pub const CONTENT_TYPE: &str = "application/json;charset=UTF-8";
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/graphql/";

/// Capability to post a GraphQL document to the commerce API. Injected into
/// every controller that needs it.
pub trait CommerceClient {
    fn post(&self, request: &GraphQlRequest) -> Result<Value, CheckoutError>;
}

// ============================================================================
// HTTP backend
// ============================================================================

pub struct HttpCommerceClient {
    pub endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpCommerceClient {
    /// Build a client for `endpoint`. With no timeout a request runs until
    /// the server answers or the connection drops.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self, CheckoutError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build().map_err(|e| CheckoutError::Transport {
            endpoint: endpoint.to_string(),
            source: e,
        })?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }
}

impl Default for HttpCommerceClient {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl CommerceClient for HttpCommerceClient {
    fn post(&self, request: &GraphQlRequest) -> Result<Value, CheckoutError> {
        let body = request.to_body()?;
        debug!(endpoint = %self.endpoint, bytes = body.len(), "posting GraphQL request");

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .body(body)
            .send()
            .map_err(|e| CheckoutError::Transport {
                endpoint: self.endpoint.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %self.endpoint, status = status.as_u16(), "commerce API returned error status");
            return Err(CheckoutError::HttpStatus {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let text = response.text().map_err(|e| CheckoutError::Transport {
            endpoint: self.endpoint.clone(),
            source: e,
        })?;

        serde_json::from_str(&text).map_err(|e| CheckoutError::ResponseParse {
            context: format!("response from {}", self.endpoint),
            source: e,
        })
    }
}

// ============================================================================
// Scripted backend (for dry runs and tests without a commerce API)
// ============================================================================

/// Replays canned responses in order and records every request it saw.
#[derive(Default)]
pub struct ScriptedCommerceClient {
    responses: RefCell<VecDeque<Result<Value, String>>>,
    requests: RefCell<Vec<GraphQlRequest>>,
}

impl ScriptedCommerceClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_with(self, body: Value) -> Self {
        self.responses.borrow_mut().push_back(Ok(body));
        self
    }

    /// Queue a network-level failure.
    pub fn fail_with(self, message: &str) -> Self {
        self.responses.borrow_mut().push_back(Err(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<GraphQlRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl CommerceClient for ScriptedCommerceClient {
    fn post(&self, request: &GraphQlRequest) -> Result<Value, CheckoutError> {
        self.requests.borrow_mut().push(request.clone());
        match self.responses.borrow_mut().pop_front() {
            Some(Ok(body)) => Ok(body),
            Some(Err(message)) => Err(CheckoutError::Network(message)),
            None => Err(CheckoutError::Network("no scripted response left".to_string())),
        }
    }
}
