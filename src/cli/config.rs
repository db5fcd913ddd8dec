use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::checkout::error::CheckoutError;
use crate::checkout::process::CartItem;
use crate::form::state::FormValues;
use crate::request::client::DEFAULT_ENDPOINT;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "storefront-checkout",
    version,
    about = "Drive a storefront checkout against a GraphQL commerce API"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Commerce API GraphQL endpoint
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Path to config file (default: storefront-checkout.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit the address step (and shipping step, if the order names a method)
    Checkout {
        /// Path to an order YAML file
        #[arg(long)]
        order: String,

        /// Output format: console or json
        #[arg(long, default_value = "console")]
        format: String,
    },

    /// Run the address form validators over an order file
    Validate {
        /// Path to an order YAML file
        #[arg(long)]
        order: String,
    },

    /// Fetch and list the home-page featured products
    Featured,

    /// Print the built-in address and sign-in form templates as YAML
    Templates,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `storefront-checkout.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub trace: TraceConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout; none by default, a request runs to completion
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceConfig {
    #[serde(default = "default_trace_path")]
    pub path: Option<String>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            path: default_trace_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesConfig {
    #[serde(default = "default_home")]
    pub home: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            home: default_home(),
        }
    }
}

// Serde default helpers
fn default_endpoint() -> String { DEFAULT_ENDPOINT.to_string() }
fn default_trace_path() -> Option<String> { Some("checkout_trace.jsonl".to_string()) }
fn default_home() -> String { "/".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("storefront-checkout.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

/// CLI endpoint wins over the config file.
pub fn resolve_endpoint(cli: Option<&str>, config: &AppConfig) -> String {
    cli.map(str::to_string)
        .unwrap_or_else(|| config.api.endpoint.clone())
}

// ============================================================================
// Order file
// ============================================================================

/// One checkout attempt described in YAML: cart plus what the user typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderFile {
    pub cart: Vec<CartItem>,

    #[serde(default)]
    pub shipping: FormValues,

    #[serde(default)]
    pub billing: FormValues,

    #[serde(default)]
    pub billing_same_as_shipping: bool,

    /// Shipping method to pick once the checkout exists
    #[serde(default)]
    pub shipping_method: Option<String>,
}

pub fn load_order(path: &str) -> Result<OrderFile, CheckoutError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CheckoutError::Config(format!("cannot read order file {}: {}", path, e)))?;
    serde_yaml::from_str(&content)
        .map_err(|e| CheckoutError::Config(format!("invalid order file {}: {}", path, e)))
}
