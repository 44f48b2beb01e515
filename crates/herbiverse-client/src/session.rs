//! The session manager.
//!
//! [`SessionManager`] is the single owner of "is a user logged in, and who
//! are they". It reconciles three sources: the in-memory [`Session`], the
//! session storage (token and profile snapshot) and the server.
//!
//! WRITE-THROUGH
//! =============
//! Every mutation writes storage and publishes the new state inside one
//! commit section, so nobody reading state after an operation completes can
//! see the two disagree. Operations themselves are not serialized: two
//! concurrent logins both run and the later commit wins.
//!
//! FORCED LOGOUT
//! =============
//! The manager registers itself as the gate's unauthorized hook. A 401 on
//! any authenticated request, from any feature, drops the session.

use std::sync::{Arc, Weak};

use herbiverse_types::{
    AuthFailure, AuthFailureReason, LoginForm, Session, SignupForm, UserProfile,
};
use parking_lot::Mutex;
use reqwest::{Client, Method};
use serde_json::Value;
use tokio::sync::watch;
use url::Url;

use crate::error::ClientError;
use crate::gateway::{Access, Gateway, UnauthorizedHook};
use crate::reconcile::{reconcile, ProfileFetch, Reconciliation, StorageAction};
use crate::storage::SessionStorage;

const PROFILE_PATH: &[&str] = &["users", "profile"];
const LOGIN_FAILED: &str = "Login failed. Please try again.";
const SIGNUP_FAILED: &str = "Signup failed. Please try again.";
const NETWORK_FAILED: &str = "Could not reach the server. Please try again.";
const STORAGE_FAILED: &str = "Could not save your session on this device.";

/// Owner of the client's authentication state.
///
/// Cheap to clone; clones share one session.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    gateway: Arc<Gateway>,
    storage: Arc<dyn SessionStorage>,
    state: watch::Sender<Session>,
    commit: Mutex<()>,
}

/// Unauthorized hook pointing back at the session that owns the gate.
struct ExpireSession(Weak<SessionInner>);

impl UnauthorizedHook for ExpireSession {
    fn on_unauthorized(&self) {
        if let Some(inner) = self.0.upgrade() {
            inner.drop_session("authorization rejected by server");
        }
    }
}

impl SessionManager {
    /// Create the session and the gate it guards.
    ///
    /// State starts as loading until [`initialize`](Self::initialize) runs.
    pub fn new(http: Client, base_url: Url, storage: Arc<dyn SessionStorage>) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<SessionInner>| {
            let hook: Arc<dyn UnauthorizedHook> = Arc::new(ExpireSession(weak.clone()));
            let gateway = Arc::new(Gateway::new(http, base_url, Arc::clone(&storage), hook));
            let (state, _) = watch::channel(Session::starting());
            SessionInner { gateway, storage, state, commit: Mutex::new(()) }
        });
        Self { inner }
    }

    /// The gate shared by every API handle of this session.
    pub fn gateway(&self) -> Arc<Gateway> {
        Arc::clone(&self.inner.gateway)
    }

    /// Current state.
    pub fn session(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    /// Check whether a user is logged in.
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated
    }

    /// Current profile, if known.
    pub fn user(&self) -> Option<UserProfile> {
        self.inner.state.borrow().user.clone()
    }

    /// Check whether startup reconciliation is still running.
    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    /// Receiver that observes every committed state.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    /// Reconcile stored credentials with the server. Run once at startup.
    ///
    /// Never fails: a 401 logs the user out, any other failure keeps them
    /// logged in on the cached profile.
    pub async fn initialize(&self) {
        self.inner.state.send_modify(|s| s.loading = true);

        let token = self.inner.gateway.stored_token();
        let fetch = match token {
            Some(_) => Some(ProfileFetch::from(self.fetch_profile().await)),
            None => None,
        };
        let snapshot = match fetch {
            Some(ProfileFetch::Failed) => self.inner.stored_snapshot(),
            _ => None,
        };

        if matches!(fetch, Some(ProfileFetch::Failed)) {
            tracing::warn!("Profile fetch failed at startup; keeping stored session");
        }

        let outcome = reconcile(token.as_deref(), fetch, snapshot);
        self.inner.apply(outcome);
    }

    /// Log in with email and password.
    ///
    /// On success the token, the profile snapshot and the state are
    /// committed together and the profile is returned. On failure nothing
    /// changes.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, AuthFailure> {
        let form = LoginForm::new(email, password);
        form.check().map_err(|e| AuthFailure::new(AuthFailureReason::InvalidInput, e.message))?;

        let response: Value = self
            .inner
            .gateway
            .post(&["users", "login"], &form, Access::Anonymous)
            .await
            .map_err(|e| auth_failure(&e, LOGIN_FAILED))?;
        let grant = AuthGrant::from_response(response)
            .ok_or_else(|| AuthFailure::new(AuthFailureReason::ServerError, "Login failed"))?;

        let mut profile = self.profile_for(&grant).await;
        profile.ensure("email", email);

        self.inner.commit_login(&grant.token, &profile)?;
        tracing::info!("Logged in as {}", email);
        Ok(profile)
    }

    /// Create an account and log in.
    ///
    /// Same contract as [`login`](Self::login); the fallback profile also
    /// gets `name`.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, AuthFailure> {
        let form = SignupForm::new(name, email, password);
        form.check().map_err(|e| AuthFailure::new(AuthFailureReason::InvalidInput, e.message))?;

        let response: Value = self
            .inner
            .gateway
            .post(&["users", "signup"], &form, Access::Anonymous)
            .await
            .map_err(|e| auth_failure(&e, SIGNUP_FAILED))?;
        let grant = AuthGrant::from_response(response)
            .ok_or_else(|| AuthFailure::new(AuthFailureReason::ServerError, "Signup failed"))?;

        let mut profile = self.profile_for(&grant).await;
        profile.ensure("name", name);
        profile.ensure("email", email);

        self.inner.commit_login(&grant.token, &profile)?;
        tracing::info!("Signed up as {}", email);
        Ok(profile)
    }

    /// Log out. Never fails.
    ///
    /// The server is told when a token is stored; if that call fails it is
    /// logged and the local session is cleared anyway.
    pub async fn logout(&self) {
        if self.inner.gateway.stored_token().is_some() {
            let result = self
                .inner
                .gateway
                .send::<()>(Method::POST, &["users", "logout"], None, Access::Authenticated)
                .await;
            if let Err(e) = result {
                tracing::warn!("Logout request failed, clearing local session anyway: {}", e);
            }
        }
        self.inner.drop_session("logout");
    }

    /// Re-fetch the profile while logged in.
    ///
    /// Returns false without a request when logged out, and false with the
    /// state untouched when the fetch fails.
    pub async fn refresh_profile(&self) -> bool {
        if !self.is_authenticated() {
            return false;
        }
        match self.fetch_profile().await {
            Ok(profile) => self.inner.commit_profile(profile),
            Err(e) => {
                tracing::debug!("Profile refresh failed: {}", e);
                false
            },
        }
    }

    async fn fetch_profile(&self) -> Result<UserProfile, ClientError> {
        self.inner.gateway.get(PROFILE_PATH, Access::Authenticated).await
    }

    /// Full profile for a fresh token, or the grant's fallback.
    async fn profile_for(&self, grant: &AuthGrant) -> UserProfile {
        match self.inner.gateway.get(PROFILE_PATH, Access::Token(&grant.token)).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!("Profile fetch after login failed, using login response: {}", e);
                grant.fallback.clone()
            },
        }
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager").field("session", &*self.inner.state.borrow()).finish()
    }
}

impl SessionInner {
    fn stored_snapshot(&self) -> Option<UserProfile> {
        match self.storage.snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Ignoring unreadable profile snapshot: {}", e);
                None
            },
        }
    }

    fn apply(&self, outcome: Reconciliation) {
        let _guard = self.commit.lock();
        let written = match &outcome.storage {
            StorageAction::Keep => Ok(()),
            StorageAction::SaveSnapshot(profile) => self.storage.save_snapshot(profile),
            StorageAction::ClearSnapshot => self.storage.clear_snapshot(),
            StorageAction::ClearAll => self.storage.clear_session(),
        };
        if let Err(e) = written {
            tracing::warn!("Session storage update failed: {}", e);
        }
        tracing::info!(
            authenticated = outcome.session.is_authenticated,
            has_profile = outcome.session.user.is_some(),
            "Session initialized"
        );
        self.state.send_replace(outcome.session);
    }

    fn commit_login(&self, token: &str, profile: &UserProfile) -> Result<(), AuthFailure> {
        let _guard = self.commit.lock();
        self.storage.save_token(token).map_err(|e| {
            tracing::error!("Could not persist token: {}", e);
            AuthFailure::new(AuthFailureReason::Storage, STORAGE_FAILED)
        })?;
        if let Err(e) = self.storage.save_snapshot(profile) {
            tracing::warn!("Could not persist profile snapshot: {}", e);
        }
        self.state.send_replace(Session::authenticated(Some(profile.clone())));
        Ok(())
    }

    /// Store a refreshed profile unless the session ended meanwhile.
    fn commit_profile(&self, profile: UserProfile) -> bool {
        let _guard = self.commit.lock();
        if !self.state.borrow().is_authenticated {
            tracing::debug!("Discarding refreshed profile for an ended session");
            return false;
        }
        if let Err(e) = self.storage.save_snapshot(&profile) {
            tracing::warn!("Could not persist profile snapshot: {}", e);
        }
        self.state.send_modify(|s| s.user = Some(profile));
        true
    }

    fn drop_session(&self, reason: &str) {
        let _guard = self.commit.lock();
        if let Err(e) = self.storage.clear_session() {
            tracing::warn!("Could not clear session storage: {}", e);
        }
        let was_authenticated = self.state.borrow().is_authenticated;
        self.state.send_modify(|s| {
            s.is_authenticated = false;
            s.user = None;
        });
        if was_authenticated {
            tracing::info!("Session ended: {}", reason);
        }
    }
}

/// Token plus fallback profile from a login/signup response.
#[derive(Debug)]
struct AuthGrant {
    token: String,
    fallback: UserProfile,
}

impl AuthGrant {
    /// `None` when the response carries no usable token.
    ///
    /// The fallback profile is the `user` object when present, otherwise
    /// the response body without its token.
    fn from_response(response: Value) -> Option<Self> {
        let Value::Object(mut body) = response else {
            return None;
        };
        let token = match body.remove("token") {
            Some(Value::String(token)) if !token.is_empty() => token,
            _ => return None,
        };
        let fallback = match body.remove("user") {
            Some(Value::Object(user)) => UserProfile::from(user),
            _ => UserProfile::from(body),
        };
        Some(Self { token, fallback })
    }
}

/// Map a login/signup error to the failure shown to the user.
fn auth_failure(err: &ClientError, generic: &str) -> AuthFailure {
    let message = |fallback: &str| err.server_message().unwrap_or(fallback).to_string();
    match err {
        ClientError::Validation(e) => AuthFailure::new(AuthFailureReason::InvalidInput, &e.message),
        ClientError::Network(_) => AuthFailure::new(AuthFailureReason::Network, NETWORK_FAILED),
        ClientError::Unauthorized { .. } | ClientError::Conflict { .. } => {
            AuthFailure::new(AuthFailureReason::InvalidCredentials, message(generic))
        },
        ClientError::ServerError { status: 400 | 403 | 404, .. } => {
            AuthFailure::new(AuthFailureReason::InvalidCredentials, message(generic))
        },
        _ => AuthFailure::new(AuthFailureReason::ServerError, message(generic)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_grant_prefers_user_object() {
        let grant = AuthGrant::from_response(json!({
            "token": "T",
            "user": {"email": "a@b.com", "name": "Asha"}
        }))
        .unwrap();
        assert_eq!(grant.token, "T");
        assert_eq!(grant.fallback.name(), Some("Asha"));
    }

    #[test]
    fn test_grant_falls_back_to_body_without_token() {
        let grant = AuthGrant::from_response(json!({"token": "T", "email": "a@b.com"})).unwrap();
        assert_eq!(grant.fallback.email(), Some("a@b.com"));
        assert!(grant.fallback.get("token").is_none());
    }

    #[test]
    fn test_grant_requires_token() {
        assert!(AuthGrant::from_response(json!({"user": {}})).is_none());
        assert!(AuthGrant::from_response(json!({"token": ""})).is_none());
        assert!(AuthGrant::from_response(json!("T")).is_none());
    }

    #[test]
    fn test_auth_failure_mapping() {
        let rejected = ClientError::Unauthorized { message: Some("bad creds".to_string()) };
        assert_eq!(
            auth_failure(&rejected, LOGIN_FAILED),
            AuthFailure::new(AuthFailureReason::InvalidCredentials, "bad creds")
        );

        let crashed = ClientError::ServerError { status: 500, message: None };
        assert_eq!(
            auth_failure(&crashed, LOGIN_FAILED),
            AuthFailure::new(AuthFailureReason::ServerError, LOGIN_FAILED)
        );

        let offline = ClientError::Network("connection refused".to_string());
        assert_eq!(auth_failure(&offline, LOGIN_FAILED).reason, AuthFailureReason::Network);
    }
}
