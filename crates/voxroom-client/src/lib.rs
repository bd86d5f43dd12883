//! Voice-chat client library: configuration, the application model behind
//! the connect and chat screens, and the terminal front-end.

pub mod app;
pub mod chat;
pub mod config;
pub mod connect;
pub mod panel;
pub mod transcript;
pub mod tui;
pub mod upload;

pub use app::{App, AppEvent, Screen};
pub use config::{load_config, Config, ConfigError};

use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber, appending to `logging.file`.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_tracing(logging: &config::LoggingConfig) -> std::io::Result<()> {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&logging.file)?;
    let writer = Mutex::new(file);

    if logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .init();
    }
    Ok(())
}
