//! Local form validation failures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A form field that failed validation before any request was sent.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    /// Name of the offending field
    pub field: String,
    /// User-facing description
    pub message: String,
}

impl ValidationError {
    /// Create a validation error for `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }

    /// Collapse a `validator` report into its first failing field.
    ///
    /// Fields are visited in name order so the result is deterministic.
    pub fn from_report(report: &validator::ValidationErrors) -> Self {
        let mut fields: Vec<(String, String)> = report
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let message = errors
                    .first()
                    .map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => format!("{} is invalid ({})", field, e.code),
                    })
                    .unwrap_or_else(|| format!("{} is invalid", field));
                (field.to_string(), message)
            })
            .collect();
        fields.sort();

        match fields.into_iter().next() {
            Some((field, message)) => Self { field, message },
            None => Self::new("form", "Form is invalid"),
        }
    }

    /// Reject empty or whitespace-only text.
    pub fn require_text(field: &str, value: &str, message: &str) -> Result<(), Self> {
        if value.trim().is_empty() {
            return Err(Self::new(field, message));
        }
        Ok(())
    }
}
