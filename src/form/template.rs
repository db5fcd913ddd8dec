use serde::{Deserialize, Serialize};

use crate::checkout::error::CheckoutError;
use crate::form::validator::{Rule, Validator};

// ============================================================================
// Template model
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Select,
    Password,
}

impl FieldType {
    /// Parse a field type name. Anything other than `text`, `select` or
    /// `password` is a template defect, not something the user can recover from.
    pub fn parse(kind: &str) -> Result<Self, CheckoutError> {
        match kind {
            "text" => Ok(FieldType::Text),
            "select" => Ok(FieldType::Select),
            "password" => Ok(FieldType::Password),
            other => Err(CheckoutError::UnknownFieldType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default)]
    pub validator: Validator,
}

impl FormField {
    pub fn text(name: &str, label: &str, validator: Validator) -> Self {
        FormField {
            name: name.to_string(),
            field_type: FieldType::Text,
            label: label.to_string(),
            required: validator.is_required(),
            options: Vec::new(),
            validator,
        }
    }

    /// Masked text input.
    pub fn password(name: &str, label: &str, validator: Validator) -> Self {
        FormField {
            field_type: FieldType::Password,
            ..Self::text(name, label, validator)
        }
    }

    /// Select field; the validator gains a `OneOf` rule over the option values.
    pub fn select(name: &str, label: &str, options: Vec<SelectOption>, validator: Validator) -> Self {
        let values = options.iter().map(|o| o.value.clone()).collect();
        let validator = validator.with(Rule::OneOf { values });
        FormField {
            name: name.to_string(),
            field_type: FieldType::Select,
            label: label.to_string(),
            required: validator.is_required(),
            options,
            validator,
        }
    }

    pub fn validate(&self, value: &str) -> Vec<String> {
        self.validator.validate(value)
    }

    /// DOM-style id for this field inside its form, e.g. `shipping-form-email`.
    pub fn element_id(&self, form_id: &str) -> String {
        format!("{}-{}", form_id, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormTemplate {
    pub form_id: String,
    pub form_title: String,
    pub fields: Vec<FormField>,
    /// Submit button caption, when the form has its own button
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
}

impl FormTemplate {
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Parse a template from YAML, rejecting unknown field types by name.
    pub fn from_yaml(content: &str) -> Result<Self, CheckoutError> {
        let raw: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| CheckoutError::Config(format!("template YAML: {}", e)))?;

        if let Some(fields) = raw.get("fields").and_then(|f| f.as_sequence()) {
            for field in fields {
                if let Some(kind) = field.get("type").and_then(|t| t.as_str()) {
                    FieldType::parse(kind)?;
                }
            }
        }

        serde_yaml::from_value(raw)
            .map_err(|e| CheckoutError::Config(format!("template YAML: {}", e)))
    }
}

// ============================================================================
// Built-in address templates
// ============================================================================

pub const SHIPPING_FORM_ID: &str = "shipping-form";
pub const BILLING_FORM_ID: &str = "billing-form";
pub const LOGIN_FORM_ID: &str = "login-form";
pub const EMAIL_FIELD: &str = "email";
pub const PASSWORD_FIELD: &str = "password";

fn country_options() -> Vec<SelectOption> {
    [
        ("", "Select a country"),
        ("US", "United States"),
        ("CA", "Canada"),
        ("GB", "United Kingdom"),
        ("DE", "Germany"),
        ("FR", "France"),
        ("VN", "Vietnam"),
    ]
    .into_iter()
    .map(|(value, label)| SelectOption {
        value: value.to_string(),
        label: label.to_string(),
    })
    .collect()
}

fn address_fields() -> Vec<FormField> {
    vec![
        FormField::text(
            "firstName",
            "First Name",
            Validator::new("First name").required().with(Rule::MaxLength { max: 256 }),
        ),
        FormField::text(
            "lastName",
            "Last Name",
            Validator::new("Last name").required().with(Rule::MaxLength { max: 256 }),
        ),
        FormField::text(
            "streetAddress1",
            "Street Address",
            Validator::new("Street address").required().with(Rule::MaxLength { max: 256 }),
        ),
        FormField::text(
            "streetAddress2",
            "Apartment, Suite, etc.",
            Validator::new("Street address 2").with(Rule::MaxLength { max: 256 }),
        ),
        FormField::text(
            "city",
            "City",
            Validator::new("City").required().with(Rule::MaxLength { max: 256 }),
        ),
        FormField::text(
            "postalCode",
            "Postal Code",
            Validator::new("Postal code").required().with(Rule::MaxLength { max: 20 }),
        ),
        FormField::select(
            "country",
            "Country",
            country_options(),
            Validator::new("Country").required(),
        ),
        FormField::text(
            "countryArea",
            "State / Province",
            Validator::new("State / province").with(Rule::MaxLength { max: 128 }),
        ),
        FormField::text(
            "phone",
            "Phone",
            Validator::new("Phone").with(Rule::Digits).with(Rule::MinLength { min: 7 }),
        ),
    ]
}

/// Shipping address form: email first, then the address block.
pub fn shipping_form_template() -> FormTemplate {
    let mut fields = vec![FormField::text(
        EMAIL_FIELD,
        "Email",
        Validator::new("Email").required().with(Rule::Email),
    )];
    fields.extend(address_fields());

    FormTemplate {
        form_id: SHIPPING_FORM_ID.to_string(),
        form_title: "Shipping Address".to_string(),
        fields,
        button_text: None,
    }
}

/// Billing address form: the address block without email.
pub fn billing_form_template() -> FormTemplate {
    FormTemplate {
        form_id: BILLING_FORM_ID.to_string(),
        form_title: "Billing Address".to_string(),
        fields: address_fields(),
        button_text: None,
    }
}

/// Sign-in form offered next to "continue as guest" on the address page.
pub fn login_form_template() -> FormTemplate {
    FormTemplate {
        form_id: LOGIN_FORM_ID.to_string(),
        form_title: "Registered User".to_string(),
        fields: vec![
            FormField::text(
                EMAIL_FIELD,
                "Email",
                Validator::new("Email").required().with(Rule::Email),
            ),
            FormField::password(PASSWORD_FIELD, "Password", Validator::new("Password").required()),
        ],
        button_text: Some("Sign In".to_string()),
    }
}
