//! Session storage errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by a session storage backend.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum StorageError {
    /// Backend could not be read or written
    #[error("Session storage I/O error: {message}")]
    Io {
        /// Description of the I/O failure
        message: String,
    },

    /// A stored value exists but does not decode
    #[error("Stored value for {key} is corrupt: {message}")]
    Corrupt {
        /// Storage key holding the bad value
        key: String,
        /// Decoder message
        message: String,
    },
}

impl StorageError {
    /// Create an I/O error from a std I/O error.
    pub fn from_io_error(e: &std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }

    /// Create a corrupt-value error from a serde_json error.
    pub fn from_json_error(key: &str, e: &serde_json::Error) -> Self {
        Self::Corrupt { key: key.to_string(), message: e.to_string() }
    }
}
