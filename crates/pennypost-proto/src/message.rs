//! Messaging payloads.

use serde::{Deserialize, Serialize};

use crate::{MessageStatus, Timestamp};

/// A message as reported by the server.
///
/// Immutable from the client's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Server-assigned message ID.
    pub id: i64,
    /// User ID of the sender.
    pub sender_id: i64,
    /// User ID of the recipient.
    pub recipient_id: i64,
    /// Message text.
    pub content: String,
    /// Delivery status, assigned by the server.
    pub status: MessageStatus,
    /// Time the message was accepted.
    pub created_at: Timestamp,
    /// Sender's username.
    #[serde(default)]
    pub sender_username: String,
    /// Recipient's username.
    #[serde(default)]
    pub recipient_username: String,
}

/// Body of the send-message request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    /// Username of the recipient.
    pub recipient_username: String,
    /// Message text.
    pub content: String,
}
