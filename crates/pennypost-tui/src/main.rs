//! Pennypost terminal client.
//!
//! # Usage
//!
//! ```bash
//! # Against a local API server
//! pennypost
//!
//! # Against a remote API with a custom state directory
//! pennypost --api-url https://api.example.com --state-dir ~/.pennypost
//! ```
//!
//! Logs go to a file (`--log-file`, default `pennypost.log` in the state
//! directory) because the terminal owns stdout. `RUST_LOG` overrides
//! `--log-level`.

use std::{fs, fs::OpenOptions, sync::Mutex};

use clap::Parser;
use pennypost_client::{HttpApi, RedbStorage, SessionService};
use pennypost_tui::{Args, Runtime, Settings, TerminalDriver};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let settings = Settings::resolve(args)?;
    settings.ensure_state_dir()?;

    if let Some(parent) = settings.log_file.parent() {
        fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new().create(true).append(true).open(&settings.log_file)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(log_file)).with_ansi(false))
        .with(filter)
        .init();

    tracing::info!(api = %settings.client.base_url, "Pennypost starting");
    tracing::debug!(state_dir = %settings.state_dir().display(), "state directory");

    let storage = RedbStorage::open(settings.session_db())?;
    let api = HttpApi::new(settings.client.clone(), storage.clone());
    let session = SessionService::new(api, storage);

    let driver = TerminalDriver::new()?;
    Runtime::new(driver, session).run().await?;

    tracing::info!("Pennypost exiting");
    Ok(())
}
