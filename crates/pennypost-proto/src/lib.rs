//! Wire types for the Pennypost API.
//!
//! Every layer of the client speaks these types: the HTTP adapter decodes
//! them, the session store persists [`Identity`] snapshots, and the app state
//! machine renders [`Message`] and [`Recharge`] collections.
//!
//! # Components
//!
//! - [`Identity`]: the authenticated user's profile record
//! - [`Message`], [`MessageStatus`]: a sent message and its server status
//! - [`Recharge`], [`RechargeStatus`]: a credit top-up and its server status
//! - [`Timestamp`]: server timestamps, tolerant of naive ISO-8601 values
//! - Request bodies: [`NewAccount`], [`SendMessageRequest`],
//!   [`RechargeRequest`]

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod identity;
mod message;
mod recharge;
mod status;
mod time;

pub use identity::{AccessToken, Balance, Identity, NewAccount};
pub use message::{Message, SendMessageRequest};
pub use recharge::{Recharge, RechargeRequest};
pub use status::{MessageStatus, RechargeStatus, StatusTone};
pub use time::Timestamp;

/// Credits charged by the server for every message sent.
pub const MESSAGE_COST: i64 = 1;

/// One-click recharge amounts offered next to free-form entry.
pub const RECHARGE_PRESETS: [u32; 4] = [10, 25, 50, 100];

/// Minimum password length accepted at signup.
pub const MIN_PASSWORD_LEN: usize = 6;
