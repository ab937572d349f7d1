//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use pennypost_proto::{NewAccount, SendMessageRequest};

use crate::RequestKind;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Exchange credentials for a session.
    Login {
        /// Login name.
        username: String,
        /// Plaintext password.
        password: String,
    },

    /// Register a new account.
    Signup {
        /// Validated registration fields.
        account: NewAccount,
    },

    /// Re-validate a restored session against the server.
    VerifySession,

    /// Clear the persisted session.
    Logout,

    /// Re-read the credit balance.
    FetchBalance,

    /// Re-read the message history.
    FetchMessages,

    /// Re-read the recharge history.
    FetchRechargeHistory,

    /// Send a message (costs one credit).
    SendMessage {
        /// Recipient and content.
        request: SendMessageRequest,
    },

    /// Add credits.
    Recharge {
        /// Positive credit amount.
        amount: u32,
    },
}

impl AppAction {
    /// Network request this action performs. `None` for local actions.
    pub fn request_kind(&self) -> Option<RequestKind> {
        match self {
            Self::Login { .. } => Some(RequestKind::Login),
            Self::Signup { .. } => Some(RequestKind::Signup),
            Self::VerifySession => Some(RequestKind::VerifySession),
            Self::FetchBalance => Some(RequestKind::Balance),
            Self::FetchMessages => Some(RequestKind::Messages),
            Self::FetchRechargeHistory => Some(RequestKind::RechargeHistory),
            Self::SendMessage { .. } => Some(RequestKind::SendMessage),
            Self::Recharge { .. } => Some(RequestKind::Recharge),
            Self::Render | Self::Quit | Self::Logout => None,
        }
    }
}
