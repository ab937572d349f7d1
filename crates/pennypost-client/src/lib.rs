//! Client
//!
//! Everything between the application state machine and the remote API: the
//! HTTP adapter, the local persistent store, and the session service that
//! owns the credential lifecycle.
//!
//! # Architecture
//!
//! The session service is the single holder of the authenticated identity and
//! bearer token. Both live in a [`Storage`] implementation under fixed keys;
//! the HTTP adapter reads the token from the same store on every request, so
//! logging in or out takes effect for all later calls without extra wiring.
//!
//! # Components
//!
//! - [`Api`]: the remote operations, one method per endpoint
//! - [`HttpApi`]: reqwest-backed [`Api`] implementation
//! - [`Storage`]: synchronous key/value persistence ([`MemoryStorage`],
//!   [`RedbStorage`])
//! - [`SessionService`]: login, signup, logout, restore and verify

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod api;
mod config;
mod error;
mod session;
pub mod storage;

pub use api::{Api, HttpApi};
pub use config::{ClientConfig, DEFAULT_API_URL};
pub use error::ApiError;
pub use pennypost_proto as proto;
pub use session::{AuthFailure, SessionService};
pub use storage::{MemoryStorage, RedbStorage, Storage, StorageError, TOKEN_KEY, USER_KEY};
