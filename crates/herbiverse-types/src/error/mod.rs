//! Typed error definitions for Herbiverse.
//!
//! Errors here are the ones that cross the API boundary of the client crate
//! or get persisted/displayed, so all of them are:
//!
//! - **Serializable** via serde
//! - **Displayable** via the Display trait (the text is user-facing)
//! - **Matchable** via enum variants

mod auth;
mod storage;
mod validation;

pub use auth::{AuthFailure, AuthFailureReason};
pub use storage::StorageError;
pub use validation::ValidationError;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failure_serialization() {
        let err = AuthFailure::new(AuthFailureReason::InvalidCredentials, "bad creds");

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("invalid-credentials"));
        assert!(json.contains("bad creds"));

        let deserialized: AuthFailure = serde_json::from_str(&json).unwrap();
        assert_eq!(err, deserialized);
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::new("email", "Enter a valid email address");
        assert_eq!(err.to_string(), "Enter a valid email address");

        let err = StorageError::Corrupt { key: "userData".to_string(), message: "eof".to_string() };
        let msg = format!("{}", err);
        assert!(msg.contains("userData"));
    }
}
