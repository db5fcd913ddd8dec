use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::checkout::error::CheckoutError;

/// Request body posted to the commerce API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlRequest {
    pub query: String,
}

impl GraphQlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    pub fn to_body(&self) -> Result<String, CheckoutError> {
        serde_json::to_string(self).map_err(|e| CheckoutError::RequestSerialize {
            context: "GraphQL request".to_string(),
            source: e,
        })
    }
}

/// Top-level error entry, `{ "message": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
}

/// Response envelope: either `data` or a top-level `errors` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphQlResponse<D> {
    pub data: Option<D>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

impl<D: serde::de::DeserializeOwned> GraphQlResponse<D> {
    pub fn from_value(value: Value, context: &str) -> Result<Self, CheckoutError> {
        serde_json::from_value(value).map_err(|e| CheckoutError::ResponseParse {
            context: context.to_string(),
            source: e,
        })
    }
}

/// Escape a value for embedding inside a double-quoted GraphQL string literal.
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// `"value"` with escaping applied.
pub fn quote(value: &str) -> String {
    format!("\"{}\"", escape_string(value))
}
