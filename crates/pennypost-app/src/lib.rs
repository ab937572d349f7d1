//! Application layer for Pennypost
//!
//! Pure state machines and a generic runtime for the client UI, enabling
//! deterministic simulation testing with the same code that runs in
//! production.
//!
//! # Components
//!
//! - [`App`]: UI state machine (screens, forms, dashboard, notifications)
//! - [`Bridge`]: executes [`AppAction`]s against the session service and API
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver
//!
//! # Flow
//!
//! ```text
//! KeyInput ──> App::handle ──> AppAction ──> Bridge (async task)
//!                 ▲                                 │
//!                 └──────────── AppEvent ◄──────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod bridge;
mod dashboard;
mod driver;
mod event;
pub mod form;
mod history;
mod input;
mod keys;
mod notification;
mod runtime;
mod state;

pub use action::AppAction;
pub use app::App;
pub use bridge::Bridge;
pub use dashboard::{Dashboard, DashboardFocus};
pub use driver::Driver;
pub use event::{AppEvent, RequestKind};
pub use history::{History, RefreshSignal};
pub use input::KeyInput;
pub use notification::{
    ERROR_TTL_TICKS, Notification, NotificationKind, Notifications, SUCCESS_TTL_TICKS,
    TICK_INTERVAL,
};
pub use runtime::Runtime;
pub use state::{Screen, SessionState};
