//! Session service.
//!
//! Owns the credential lifecycle: exchanging credentials for a token,
//! persisting the token and identity snapshot, restoring them at startup,
//! verifying the restored identity against the server, and clearing
//! everything on logout.
//!
//! # Lifecycle
//!
//! ```text
//!   restore() ──cached identity──> verify() ──ok──> identity refreshed
//!                                     │
//!                                     └─err──> logout()
//!
//!   login() ──token──> profile() ──> persist token + identity
//!   logout() ──> remove token + identity (idempotent)
//! ```
//!
//! Restore is optimistic: the cached identity is usable immediately and may be
//! stale until verification completes. It is a convenience cache, not an
//! access check; the server authorizes every request on its own.

use pennypost_proto::{Identity, NewAccount};
use thiserror::Error;

use crate::{Api, ApiError, Storage, StorageError, TOKEN_KEY, USER_KEY};

const LOGIN_FALLBACK: &str = "Login failed";
const SIGNUP_FALLBACK: &str = "Signup failed";
const VERIFY_FALLBACK: &str = "Session expired";

/// A failed session operation, reduced to a user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AuthFailure {
    /// Server-provided reason or a generic fallback.
    pub message: String,
}

impl AuthFailure {
    fn from_api(err: &ApiError, fallback: &str) -> Self {
        Self { message: err.user_message(fallback) }
    }

    fn from_storage(err: &StorageError, fallback: &str) -> Self {
        tracing::warn!(%err, "session storage failed");
        Self { message: fallback.to_string() }
    }
}

/// Process-wide session holder.
///
/// Injected wherever the current user is needed. Clones share the same
/// storage and therefore the same session.
#[derive(Clone)]
pub struct SessionService<A: Api, S: Storage> {
    api: A,
    storage: S,
}

impl<A: Api, S: Storage> SessionService<A, S> {
    /// Create a session service over `api`, persisting to `storage`.
    ///
    /// `api` should authenticate from the same storage (see
    /// [`crate::HttpApi::new`]).
    pub fn new(api: A, storage: S) -> Self {
        Self { api, storage }
    }

    /// The API adapter this session authenticates.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Cached identity from a previous run.
    ///
    /// Returns `None` unless both the token and a readable identity snapshot
    /// are persisted. A token without a readable snapshot is cleared.
    pub fn restore(&self) -> Option<Identity> {
        let token = self.read(TOKEN_KEY)?;
        let Some(snapshot) = self.read(USER_KEY).filter(|_| !token.is_empty()) else {
            tracing::warn!("discarding incomplete cached session");
            self.logout();
            return None;
        };

        match serde_json::from_str::<Identity>(&snapshot) {
            Ok(identity) => {
                tracing::info!(username = %identity.username, "restored cached session");
                Some(identity)
            },
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable identity snapshot");
                self.logout();
                None
            },
        }
    }

    /// Re-validate the persisted credential against the server.
    ///
    /// On success the fresh identity replaces the snapshot. On any failure the
    /// session is cleared via [`Self::logout`].
    ///
    /// Only the session that was persisted when verification started is
    /// touched. If the token changed meanwhile (logout, another login), the
    /// result is returned but storage is left alone.
    pub async fn verify(&self) -> Result<Identity, AuthFailure> {
        let started_with = self.read(TOKEN_KEY);
        let result = self.api.profile().await;

        if self.read(TOKEN_KEY) != started_with {
            tracing::info!("session changed during verification, leaving storage untouched");
            return result.map_err(|e| AuthFailure::from_api(&e, VERIFY_FALLBACK));
        }

        let identity = match result {
            Ok(identity) => identity,
            Err(e) => {
                tracing::info!(error = %e, "cached session rejected, logging out");
                self.logout();
                return Err(AuthFailure::from_api(&e, VERIFY_FALLBACK));
            },
        };

        if let Err(e) = self.persist_identity(&identity) {
            tracing::warn!(error = %e, "failed to refresh identity snapshot");
        }
        Ok(identity)
    }

    /// Log in and persist the resulting session.
    ///
    /// The token is stored before the profile fetch because the adapter
    /// authenticates from storage. A failed profile fetch clears it again, so
    /// no partial session survives a failed login.
    pub async fn login(&self, username: &str, password: &str) -> Result<Identity, AuthFailure> {
        let token = self
            .api
            .login(username, password)
            .await
            .map_err(|e| AuthFailure::from_api(&e, LOGIN_FALLBACK))?;

        self.storage
            .set(TOKEN_KEY, &token.access_token)
            .map_err(|e| AuthFailure::from_storage(&e, LOGIN_FALLBACK))?;

        let identity = match self.api.profile().await {
            Ok(identity) => identity,
            Err(e) => {
                self.logout();
                return Err(AuthFailure::from_api(&e, LOGIN_FALLBACK));
            },
        };

        if let Err(e) = self.persist_identity(&identity) {
            self.logout();
            return Err(AuthFailure::from_storage(&e, LOGIN_FALLBACK));
        }

        tracing::info!(username = %identity.username, "logged in");
        Ok(identity)
    }

    /// Register a new account. The caller stays logged out.
    pub async fn signup(&self, account: &NewAccount) -> Result<Identity, AuthFailure> {
        let identity = self
            .api
            .signup(account)
            .await
            .map_err(|e| AuthFailure::from_api(&e, SIGNUP_FALLBACK))?;

        tracing::info!(username = %identity.username, "account created");
        Ok(identity)
    }

    /// Clear the persisted credential and identity. Idempotent.
    pub fn logout(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, error = %e, "failed to clear session key");
            }
        }
    }

    /// Identity snapshot currently persisted. `None` when logged out.
    pub fn current(&self) -> Option<Identity> {
        self.read(TOKEN_KEY)?;
        let snapshot = self.read(USER_KEY)?;
        serde_json::from_str(&snapshot).ok()
    }

    /// True if a credential and identity are persisted.
    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    fn persist_identity(&self, identity: &Identity) -> Result<(), StorageError> {
        let snapshot = serde_json::to_string(identity)?;
        self.storage.set(USER_KEY, &snapshot)
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read session key");
                None
            },
        }
    }
}
