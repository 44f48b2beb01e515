//! Error types for the Herbiverse client.

use herbiverse_types::{StorageError, ValidationError};
use thiserror::Error;

/// Errors that can occur when using the Herbiverse client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Input failed local validation; no request was sent.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The operation needs a stored bearer token and there is none.
    #[error("Not logged in")]
    NotAuthenticated,

    /// Server returned 401; the token is missing, expired or invalid.
    #[error("Unauthorized: {}", message.as_deref().unwrap_or("no details"))]
    Unauthorized {
        /// Message from the server body, if any.
        message: Option<String>,
    },

    /// Server returned 409.
    #[error("Conflict: {}", message.as_deref().unwrap_or("no details"))]
    Conflict {
        /// Message from the server body, if any.
        message: Option<String>,
    },

    /// The request could not complete (DNS, connect, timeout, reset).
    #[error("Network error: {0}")]
    Network(String),

    /// Server returned another non-success status.
    #[error("Server error ({status}): {}", message.as_deref().unwrap_or("no details"))]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Message from the server body, if any.
        message: Option<String>,
    },

    /// Server returned a body that does not decode.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Session storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Client could not be configured.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl ClientError {
    /// Message the server put in the error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message }
            | Self::Conflict { message }
            | Self::ServerError { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of a failed response.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Conflict { .. } => Some(409),
            Self::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this is an authorization failure.
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Check if the request never got an answer from the server.
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Text for a banner, preferring what the server said over `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(e) => e.message.clone(),
            Self::NotAuthenticated => "Please log in to continue".to_string(),
            Self::Network(_) => "Could not reach the server. Please try again.".to_string(),
            _ => self.server_message().unwrap_or(fallback).to_string(),
        }
    }
}
