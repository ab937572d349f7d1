//! Account and credential payloads.

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// The authenticated user's profile record.
///
/// Returned by the profile and signup endpoints, and persisted as a JSON
/// snapshot next to the bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Server-assigned user ID.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Credit balance at the time the profile was read.
    pub credits: i64,
    /// Account creation time. `None` if the server omitted it.
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    /// Whether the account is active.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Registration fields sent to the signup endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    /// Requested login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Plaintext password, hashed server-side.
    pub password: String,
}

/// Token issued by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Opaque bearer credential.
    pub access_token: String,
    /// Token scheme, always `bearer`.
    #[serde(default)]
    pub token_type: String,
}

/// Current credit balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Available credits.
    pub credits: i64,
}
