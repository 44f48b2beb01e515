//! Session state model.

use serde::{Deserialize, Serialize};

use super::UserProfile;

/// Client-side record of whether a user is logged in and who they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// A bearer token is held and considered valid
    pub is_authenticated: bool,
    /// Last known profile; may be absent while authenticated
    pub user: Option<UserProfile>,
    /// Startup reconciliation is still running
    pub loading: bool,
}

impl Session {
    /// State before startup reconciliation has finished.
    pub fn starting() -> Self {
        Self { is_authenticated: false, user: None, loading: true }
    }

    /// Terminal logged-out state.
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Logged-in state with an optional profile.
    pub fn authenticated(user: Option<UserProfile>) -> Self {
        Self { is_authenticated: true, user, loading: false }
    }
}
