//! User profile model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Server-defined user profile.
///
/// The shape belongs to the server; the client keeps the whole JSON object
/// and only offers accessors for the keys it displays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(Map<String, Value>);

impl UserProfile {
    /// Create an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a raw field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a string field, ignoring empty strings.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    /// Display name, if the server provided one.
    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    /// Email address, if the server provided one.
    pub fn email(&self) -> Option<&str> {
        self.str_field("email")
    }

    /// Avatar URL, if the server provided one.
    pub fn avatar(&self) -> Option<&str> {
        self.str_field("avatar")
    }

    /// Set a field, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Set a string field only when it is missing, null or empty.
    pub fn ensure(&mut self, key: &str, value: &str) {
        let missing = match self.0.get(key) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        };
        if missing {
            self.0.insert(key.to_string(), Value::String(value.to_string()));
        }
    }

    /// Remove a field, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Check whether the profile carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for UserProfile {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
