//! Observable application state types.
//!
//! These structures serve as the "View Model" for the application: the subset
//! of session state necessary for rendering, without exposing storage or
//! transport details.

use pennypost_proto::Identity;

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Sign-in form.
    Login,
    /// Account creation form.
    Signup,
    /// Balance, messaging and billing. Only shown while authenticated.
    Dashboard,
}

/// Session as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No session.
    Anonymous,
    /// Session present.
    Authenticated {
        /// Current user.
        identity: Identity,
        /// False while a restored session awaits server confirmation.
        verified: bool,
    },
}

impl SessionState {
    /// Current user. `None` when anonymous.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { identity, .. } => Some(identity),
        }
    }

    /// True if a session is present, verified or not.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}
