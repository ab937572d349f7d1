//! Server-assigned status values.
//!
//! Statuses are owned by the server; the client only displays them. Values
//! outside the known set are kept verbatim and rendered with the neutral
//! treatment instead of failing the whole collection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Display treatment for a status value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusTone {
    /// Completed successfully.
    Positive,
    /// Informational progress beyond success (e.g. delivered).
    Info,
    /// Awaiting a server-side decision.
    Warning,
    /// Failed.
    Negative,
    /// Unknown status.
    Neutral,
}

/// Delivery status of a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageStatus {
    /// Accepted by the server.
    Sent,
    /// Delivered to the recipient.
    Delivered,
    /// Delivery failed.
    Failed,
    /// Any status this client does not know about.
    Other(String),
}

impl MessageStatus {
    /// Display treatment for this status.
    pub fn tone(&self) -> StatusTone {
        match self {
            Self::Sent => StatusTone::Positive,
            Self::Delivered => StatusTone::Info,
            Self::Failed => StatusTone::Negative,
            Self::Other(_) => StatusTone::Neutral,
        }
    }

    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for MessageStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "sent" => Self::Sent,
            "delivered" => Self::Delivered,
            "failed" => Self::Failed,
            _ => Self::Other(raw),
        }
    }
}

impl From<MessageStatus> for String {
    fn from(status: MessageStatus) -> Self {
        match status {
            MessageStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settlement status of a recharge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RechargeStatus {
    /// Credits were added.
    Completed,
    /// Awaiting settlement.
    Pending,
    /// Recharge failed.
    Failed,
    /// Any status this client does not know about.
    Other(String),
}

impl RechargeStatus {
    /// Display treatment for this status.
    pub fn tone(&self) -> StatusTone {
        match self {
            Self::Completed => StatusTone::Positive,
            Self::Pending => StatusTone::Warning,
            Self::Failed => StatusTone::Negative,
            Self::Other(_) => StatusTone::Neutral,
        }
    }

    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Failed => "failed",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for RechargeStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "completed" => Self::Completed,
            "pending" => Self::Pending,
            "failed" => Self::Failed,
            _ => Self::Other(raw),
        }
    }
}

impl From<RechargeStatus> for String {
    fn from(status: RechargeStatus) -> Self {
        match status {
            RechargeStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RechargeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
