//! Billing payloads.

use serde::{Deserialize, Serialize};

use crate::{RechargeStatus, Timestamp};

/// A credit recharge as reported by the server.
///
/// Immutable from the client's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recharge {
    /// Server-assigned recharge ID.
    pub id: i64,
    /// Owner of the recharge.
    #[serde(default)]
    pub user_id: i64,
    /// Credits added.
    pub amount: i64,
    /// Payment transaction reference.
    #[serde(default)]
    pub transaction_id: String,
    /// Settlement status, assigned by the server.
    pub status: RechargeStatus,
    /// Time the recharge was recorded.
    pub created_at: Timestamp,
}

/// Body of the recharge request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RechargeRequest {
    /// Credits to add. Must be positive.
    pub amount: u32,
}
