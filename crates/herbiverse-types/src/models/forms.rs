//! Login and signup payloads.
//!
//! The forms serialize directly into the request bodies of
//! `POST /users/login` and `POST /users/signup`, and validate locally so
//! malformed input never reaches the network.

use serde::Serialize;
use validator::Validate;

use crate::error::ValidationError;

/// Credentials for `POST /users/login`.
#[derive(Clone, Serialize, Validate)]
pub struct LoginForm {
    /// Account email
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    /// Account password
    #[validate(length(min = 1_u64, message = "Password is required"))]
    pub password: String,
}

impl LoginForm {
    /// Create a login form.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }

    /// Validate all fields.
    pub fn check(&self) -> Result<(), ValidationError> {
        self.validate().map_err(|report| ValidationError::from_report(&report))
    }
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration details for `POST /users/signup`.
#[derive(Clone, Serialize, Validate)]
pub struct SignupForm {
    /// Display name
    #[validate(length(min = 1_u64, message = "Name is required"))]
    pub name: String,
    /// Account email
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    /// Account password
    #[validate(length(min = 1_u64, message = "Password is required"))]
    pub password: String,
}

impl SignupForm {
    /// Create a signup form.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self { name: name.into(), email: email.into(), password: password.into() }
    }

    /// Validate all fields.
    pub fn check(&self) -> Result<(), ValidationError> {
        ValidationError::require_text("name", &self.name, "Name is required")?;
        self.validate().map_err(|report| ValidationError::from_report(&report))
    }
}

impl std::fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
