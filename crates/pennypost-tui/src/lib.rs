//! Terminal UI for Pennypost
//!
//! A thin shell over [`pennypost_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`pennypost_app::Runtime`]
//!
//! This crate only handles terminal rendering, command-line configuration and
//! logging setup.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod terminal;
pub mod ui;

pub use config::{Args, ConfigError, Settings};
pub use pennypost_app::{App, AppAction, AppEvent, Bridge, Driver, KeyInput, Runtime};
pub use terminal::{TerminalDriver, TerminalError};
