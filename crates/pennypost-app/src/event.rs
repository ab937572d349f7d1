//! Application input events.
//!
//! This module defines [`AppEvent`], the comprehensive set of inputs that drive
//! the [`crate::App`] state machine.
//!
//! Events originate from two distinct sources:
//! - User interactions (Keyboard, Resize) and system ticks.
//! - Request completions produced by the [`crate::Bridge`].

use std::fmt;

use pennypost_proto::{Identity, Message, Recharge};

/// Network request families, used to route completions and failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Credential exchange and profile fetch.
    Login,
    /// Account registration.
    Signup,
    /// Re-validation of a restored session.
    VerifySession,
    /// Balance read.
    Balance,
    /// Message history read.
    Messages,
    /// Recharge history read.
    RechargeHistory,
    /// Message send.
    SendMessage,
    /// Credit recharge.
    Recharge,
}

impl RequestKind {
    /// Message shown when the server gives no reason.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::Login => "Login failed",
            Self::Signup => "Signup failed",
            Self::VerifySession => "Session expired",
            Self::Balance => "Failed to fetch balance",
            Self::Messages => "Failed to fetch messages",
            Self::RechargeHistory => "Failed to fetch recharge history",
            Self::SendMessage => "Failed to send message",
            Self::Recharge => "Recharge failed",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::VerifySession => "verify-session",
            Self::Balance => "balance",
            Self::Messages => "messages",
            Self::RechargeHistory => "recharge-history",
            Self::SendMessage => "send-message",
            Self::Recharge => "recharge",
        };
        f.write_str(name)
    }
}

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Keyboard input.
    Key(crate::KeyInput),

    /// Periodic tick (see [`crate::TICK_INTERVAL`]).
    Tick,

    /// Terminal resize (columns, rows).
    Resize(u16, u16),

    /// A cached session was found at startup.
    SessionRestored {
        /// Identity snapshot from the previous run.
        identity: Identity,
    },

    /// The restored session was confirmed by the server.
    SessionVerified {
        /// Fresh identity.
        identity: Identity,
    },

    /// Login completed.
    LoggedIn {
        /// Authenticated identity.
        identity: Identity,
    },

    /// Account created.
    SignedUp {
        /// The new account.
        identity: Identity,
    },

    /// Balance read completed.
    BalanceLoaded {
        /// Available credits.
        credits: i64,
    },

    /// Message history read completed.
    MessagesLoaded {
        /// Full collection, replacing the previous one.
        messages: Vec<Message>,
    },

    /// Recharge history read completed.
    RechargesLoaded {
        /// Full collection, replacing the previous one.
        recharges: Vec<Recharge>,
    },

    /// Message accepted by the server.
    MessageSent {
        /// The stored message.
        message: Message,
    },

    /// Recharge accepted by the server.
    Recharged {
        /// The stored recharge.
        recharge: Recharge,
    },

    /// A request failed.
    RequestFailed {
        /// Which request.
        kind: RequestKind,
        /// User-facing reason.
        message: String,
    },

    /// A request task ended without producing a result.
    RequestAborted {
        /// Which request.
        kind: RequestKind,
    },
}
