use tracing::info;

use crate::checkout::error::CheckoutError;
use crate::form::state::FormState;
use crate::form::template::{EMAIL_FIELD, FormTemplate, PASSWORD_FIELD, login_form_template};

/// Who is checking out, as decided on the address page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CustomerStatus {
    #[default]
    Undecided,
    Anon,
    LoggedIn { email: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerAction {
    Undecided,
    Anon,
    LoggedIn { email: String },
}

impl CustomerAction {
    /// Parse an action by name. `loggedin` needs an email; unknown names are
    /// a contract error.
    pub fn parse(kind: &str, email: Option<&str>) -> Result<Self, CheckoutError> {
        match kind {
            "undecided" => Ok(CustomerAction::Undecided),
            "anon" => Ok(CustomerAction::Anon),
            "loggedin" => Ok(CustomerAction::LoggedIn {
                email: email.unwrap_or_default().to_string(),
            }),
            other => Err(CheckoutError::UnknownCustomerAction(other.to_string())),
        }
    }
}

/// Pure reducer. The logged-in email is stored trimmed.
pub fn reduce(_state: &CustomerStatus, action: CustomerAction) -> CustomerStatus {
    match action {
        CustomerAction::Undecided => CustomerStatus::Undecided,
        CustomerAction::Anon => CustomerStatus::Anon,
        CustomerAction::LoggedIn { email } => CustomerStatus::LoggedIn {
            email: email.trim().to_string(),
        },
    }
}

/// What the address page shows for each status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressPageContent {
    /// "Continue as guest" next to the `LoginForm`
    GuestOrSignIn,
    AddressForm,
    WelcomeBack { email: String },
}

impl CustomerStatus {
    pub fn user_email(&self) -> &str {
        match self {
            CustomerStatus::LoggedIn { email } => email,
            _ => "",
        }
    }

    pub fn page_content(&self) -> AddressPageContent {
        match self {
            CustomerStatus::Undecided => AddressPageContent::GuestOrSignIn,
            CustomerStatus::Anon => AddressPageContent::AddressForm,
            CustomerStatus::LoggedIn { email } => AddressPageContent::WelcomeBack {
                email: email.clone(),
            },
        }
    }
}

// ============================================================================
// Sign-in form
// ============================================================================

/// Values collected by the sign-in form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Receives credentials from a submitted sign-in form. Authentication itself
/// belongs to the implementor.
pub trait SignInHandler {
    fn sign_in(&mut self, credentials: LoginCredentials);
}

/// The "Registered User" form shown while the customer is undecided.
pub struct LoginForm {
    state: FormState,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::with_template(login_form_template())
    }

    pub fn with_template(template: FormTemplate) -> Self {
        Self {
            state: FormState::new(template),
        }
    }

    pub fn title(&self) -> &str {
        &self.state.template().form_title
    }

    pub fn button_text(&self) -> &str {
        self.state.template().button_text.as_deref().unwrap_or("Submit")
    }

    pub fn form(&self) -> &FormState {
        &self.state
    }

    pub fn set_value(&mut self, name: &str, value: &str) -> Result<(), CheckoutError> {
        self.state.set_value(name, value)
    }

    /// Mark the form submitted and, when every field passes, hand the
    /// credentials to `handler`. Returns them when they were handed over.
    pub fn submit(&mut self, handler: &mut dyn SignInHandler) -> Option<LoginCredentials> {
        self.state.mark_submitted();
        if !self.state.is_valid() {
            return None;
        }

        let credentials = LoginCredentials {
            email: self.state.value(EMAIL_FIELD).unwrap_or_default().trim().to_string(),
            password: self.state.value(PASSWORD_FIELD).unwrap_or_default().to_string(),
        };
        info!(email = %credentials.email, "sign-in submitted");
        handler.sign_in(credentials.clone());
        Some(credentials)
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}
