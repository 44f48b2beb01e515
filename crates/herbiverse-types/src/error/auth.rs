//! Authentication failures surfaced by login and signup.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a login or signup attempt did not produce a session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AuthFailureReason {
    /// Server rejected the credentials (401/403).
    InvalidCredentials,
    /// Request could not complete; retrying may help.
    Network,
    /// Server answered with another failure status or an unusable body.
    ServerError,
    /// Form fields failed local validation; nothing was sent.
    InvalidInput,
    /// The token could not be persisted, so nothing was committed.
    Storage,
}

/// A failed login/signup, carrying a message fit for display.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("{message}")]
pub struct AuthFailure {
    /// Failure category
    pub reason: AuthFailureReason,
    /// Server-provided message, or a generic fallback
    pub message: String,
}

impl AuthFailure {
    /// Create a new failure.
    pub fn new(reason: AuthFailureReason, message: impl Into<String>) -> Self {
        Self { reason, message: message.into() }
    }

    /// Check if the user may simply try again.
    pub const fn is_retryable(&self) -> bool {
        matches!(self.reason, AuthFailureReason::Network | AuthFailureReason::ServerError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        let network = AuthFailure::new(AuthFailureReason::Network, "offline");
        let rejected = AuthFailure::new(AuthFailureReason::InvalidCredentials, "nope");

        assert!(network.is_retryable());
        assert!(!rejected.is_retryable());
    }
}
