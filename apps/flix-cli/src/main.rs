//! # Flix Rental Operator Shell
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Load DeskConfig (path from argv[1], else platform config dir)       │
//! │  2. Initialize tracing (RUST_LOG, else the configured filter)           │
//! │  3. Load the catalog file and build the RentalDesk                      │
//! │  4. Read commands from stdin until `quit` or EOF                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logs go to stderr; stdout carries the shell.

mod shell;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use flix_system::{DeskConfig, RentalDesk};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let loaded = DeskConfig::load(config_path);

    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => DeskConfig::default(),
    };
    init_tracing(config.log_filter());
    if let Err(e) = loaded {
        warn!("Failed to load desk config: {}. Using defaults.", e);
    }

    info!(catalog = ?config.catalog_path(), capacity = config.capacity(), "Starting Flix Rental");

    let mut desk = match RentalDesk::from_config(&config) {
        Ok(desk) => desk,
        Err(e) => {
            error!(error = %e, "Could not open the rental desk");
            eprintln!("flix: {e}");
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = shell::run(&mut desk, stdin.lock(), stdout.lock()) {
        error!(error = %e, "Shell I/O failed");
        return ExitCode::FAILURE;
    }

    info!("Flix Rental stopped");
    ExitCode::SUCCESS
}

/// Initializes the tracing subscriber on stderr.
///
/// `RUST_LOG` wins over `default_filter`.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
