//! Deterministic simulation harness for Pennypost client testing.
//!
//! In-memory implementations of the [`pennypost_client::Api`] and
//! [`pennypost_app::Driver`] traits so the production [`pennypost_app::Runtime`]
//! can be exercised end to end without a network or terminal.
//!
//! # Fake Server
//!
//! [`FakeServer`] models the remote service: accounts, bearer tokens, message
//! and recharge ledgers, and credit accounting. Faults can be queued per
//! [`Endpoint`] to exercise error paths, including a panicking request.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. [`SimDriver`] runs them on every render. Use
//! [`InvariantRegistry::standard()`] for the common App invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fake_api;
pub mod invariants;
pub mod sim_driver;

pub use fake_api::{Endpoint, FakeApi, FakeServer, Fault, SharedFakeServer, create_shared_server};
pub use invariants::{
    AmountDigitsOnly, DashboardRequiresSession, Invariant, InvariantRegistry, NotificationsBounded,
    Violation,
};
pub use sim_driver::{SimDriver, SimDriverError};

use pennypost_app::Runtime;
use pennypost_client::{MemoryStorage, SessionService};

/// Runtime wired to a fake server and in-memory storage.
pub type SimRuntime = Runtime<SimDriver, FakeApi<MemoryStorage>, MemoryStorage>;

/// Build a runtime against `server`, persisting to `storage`.
///
/// Returns the runtime plus a handle to its driver for injecting events and
/// inspecting renders.
pub fn sim_runtime(server: &SharedFakeServer, storage: MemoryStorage) -> (SimRuntime, SimDriver) {
    let api = FakeApi::new(server.clone(), storage.clone());
    let session = SessionService::new(api, storage);
    let driver = SimDriver::new().with_invariants(InvariantRegistry::standard());
    let handle = driver.clone();
    (Runtime::new(driver, session), handle)
}
