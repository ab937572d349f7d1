//! Command-line configuration.
//!
//! [`Args`] is parsed by clap and resolved into [`Settings`]: the API base
//! URL, the state directory holding `session.redb`, and the log file.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use clap::Parser;
use pennypost_client::{ClientConfig, DEFAULT_API_URL};
use thiserror::Error;

/// Name of the session database inside the state directory.
pub const SESSION_DB: &str = "session.redb";

/// Name of the log file inside the state directory.
pub const LOG_FILE: &str = "pennypost.log";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No platform data directory and no `--state-dir`.
    #[error("could not determine a data directory; pass --state-dir")]
    NoStateDir,

    /// The state directory could not be created.
    #[error("failed to create state directory {path}: {source}")]
    StateDir {
        /// Directory that was being created.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// The API URL is not an http(s) URL.
    #[error("invalid API URL {0:?}: expected http:// or https://")]
    ApiUrl(String),
}

/// Pennypost terminal client
#[derive(Parser, Debug, Clone)]
#[command(name = "pennypost")]
#[command(about = "Send messages and manage credits from the terminal")]
#[command(version)]
pub struct Args {
    /// Base URL of the Pennypost API
    #[arg(long, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Directory for the session database and log file
    #[arg(long)]
    pub state_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log file path (defaults to pennypost.log in the state directory)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// API endpoint configuration.
    pub client: ClientConfig,
    /// Directory for persistent state.
    pub state_dir: PathBuf,
    /// Log destination.
    pub log_file: PathBuf,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Settings {
    /// Resolve arguments, falling back to the platform data directory.
    pub fn resolve(args: Args) -> Result<Self, ConfigError> {
        Self::resolve_with(args, dirs::data_dir())
    }

    /// Resolve arguments against an explicit default data directory.
    pub fn resolve_with(args: Args, data_dir: Option<PathBuf>) -> Result<Self, ConfigError> {
        let url = args.api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ApiUrl(args.api_url));
        }

        let state_dir = match args.state_dir {
            Some(dir) => dir,
            None => data_dir.ok_or(ConfigError::NoStateDir)?.join("pennypost"),
        };
        let log_file = args.log_file.unwrap_or_else(|| state_dir.join(LOG_FILE));

        Ok(Self {
            client: ClientConfig::new(url),
            state_dir,
            log_file,
            log_level: args.log_level,
        })
    }

    /// Create the state directory if missing.
    pub fn ensure_state_dir(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.state_dir)
            .map_err(|source| ConfigError::StateDir { path: self.state_dir.clone(), source })
    }

    /// Path of the session database.
    pub fn session_db(&self) -> PathBuf {
        self.state_dir.join(SESSION_DB)
    }

    /// State directory.
    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }
}
