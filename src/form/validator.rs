use serde::{Deserialize, Serialize};

// ============================================================================
// Validation rules
// ============================================================================

/// A single check applied to a field value. Each failing rule contributes one
/// human-readable message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    /// Value must not be blank
    Required,

    /// Value must have at least this many characters (blank values are left to `Required`)
    MinLength { min: usize },

    /// Value must have at most this many characters
    MaxLength { max: usize },

    /// Value must look like an email address
    Email,

    /// Value may only contain digits, spaces, dashes and a leading '+'
    Digits,

    /// Value must be one of the allowed options (select fields)
    OneOf { values: Vec<String> },
}

impl Rule {
    /// Check one value; `None` means the rule passed.
    pub fn check(&self, label: &str, value: &str) -> Option<String> {
        let trimmed = value.trim();
        match self {
            Rule::Required => {
                if trimmed.is_empty() {
                    Some(format!("{} is required", label))
                } else {
                    None
                }
            }
            Rule::MinLength { min } => {
                let len = trimmed.chars().count();
                if len > 0 && len < *min {
                    Some(format!("{} must be at least {} characters", label, min))
                } else {
                    None
                }
            }
            Rule::MaxLength { max } => {
                if trimmed.chars().count() > *max {
                    Some(format!("{} must be at most {} characters", label, max))
                } else {
                    None
                }
            }
            Rule::Email => {
                if trimmed.is_empty() || looks_like_email(trimmed) {
                    None
                } else {
                    Some(format!("{} must be a valid email address", label))
                }
            }
            Rule::Digits => {
                let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
                let ok = body
                    .chars()
                    .all(|c| c.is_ascii_digit() || c == ' ' || c == '-');
                if ok {
                    None
                } else {
                    Some(format!("{} may only contain numbers", label))
                }
            }
            Rule::OneOf { values } => {
                if trimmed.is_empty() || values.iter().any(|v| v == trimmed) {
                    None
                } else {
                    Some(format!("{} must be one of the listed options", label))
                }
            }
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

// ============================================================================
// Validator: ordered rule chain for one field
// ============================================================================

/// Ordered list of rules for a field. Pure: the same value always yields the
/// same messages, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Validator {
    /// Label used inside messages, e.g. "Email"
    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Validator {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            rules: Vec::new(),
        }
    }

    pub fn with(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn required(self) -> Self {
        self.with(Rule::Required)
    }

    /// Run every rule and collect the failure messages.
    pub fn validate(&self, value: &str) -> Vec<String> {
        self.rules
            .iter()
            .filter_map(|rule| rule.check(&self.label, value))
            .collect()
    }

    pub fn is_required(&self) -> bool {
        self.rules.contains(&Rule::Required)
    }
}
