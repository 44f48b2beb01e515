//! Startup reconciliation of stored credentials against the server.
//!
//! Memory is the authoritative copy for a running client; storage is the
//! durable fallback consulted at startup and when the server cannot be
//! reached. [`reconcile`] turns what startup found into the next session
//! state plus the storage write that keeps the two tiers in step.

use herbiverse_types::{Session, UserProfile};

use crate::error::ClientError;

/// Outcome of the startup profile fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileFetch {
    /// Server returned the authoritative profile.
    Fetched(UserProfile),
    /// Server rejected the token (401).
    Unauthorized,
    /// Anything else: network failure, timeout, 5xx, undecodable body.
    Failed,
}

impl From<Result<UserProfile, ClientError>> for ProfileFetch {
    fn from(result: Result<UserProfile, ClientError>) -> Self {
        match result {
            Ok(profile) => Self::Fetched(profile),
            Err(e) if e.is_unauthorized() => Self::Unauthorized,
            Err(_) => Self::Failed,
        }
    }
}

/// Storage write implied by a reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageAction {
    /// Leave token and snapshot as they are.
    Keep,
    /// Overwrite the snapshot with a fresh profile.
    SaveSnapshot(UserProfile),
    /// Drop a snapshot left behind without a token.
    ClearSnapshot,
    /// Drop token and snapshot.
    ClearAll,
}

/// Next session state and the storage write that goes with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// State to publish; `loading` is always false.
    pub session: Session,
    /// Storage write to apply together with the state.
    pub storage: StorageAction,
}

/// Decide the session after startup.
///
/// `fetch` is `None` when no fetch was attempted. `snapshot` is only
/// consulted on [`ProfileFetch::Failed`]: a transient failure keeps the
/// user logged in with whatever profile was cached, possibly none.
pub fn reconcile(
    stored_token: Option<&str>,
    fetch: Option<ProfileFetch>,
    snapshot: Option<UserProfile>,
) -> Reconciliation {
    if stored_token.is_none() {
        return Reconciliation { session: Session::signed_out(), storage: StorageAction::ClearSnapshot };
    }

    match fetch {
        Some(ProfileFetch::Fetched(profile)) => Reconciliation {
            session: Session::authenticated(Some(profile.clone())),
            storage: StorageAction::SaveSnapshot(profile),
        },
        Some(ProfileFetch::Unauthorized) => {
            Reconciliation { session: Session::signed_out(), storage: StorageAction::ClearAll }
        },
        Some(ProfileFetch::Failed) | None => Reconciliation {
            session: Session::authenticated(snapshot),
            storage: StorageAction::Keep,
        },
    }
}
