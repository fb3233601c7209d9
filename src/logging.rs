//! Logging initialization.
//!
//! Configures the `tracing` subscriber with level filtering via the
//! `KDASH_LOG` environment variable, falling back to the configured
//! `[logging] log_level`.
//!
//! # Usage
//!
//! ```bash
//! # Configured level
//! kdash tui
//!
//! # Debug level
//! KDASH_LOG=debug kdash tui
//!
//! # Module-specific filtering
//! KDASH_LOG=kitchen_dashboard::runtime=debug,warn kdash tui
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{xdg, LogLevel};

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "KDASH_LOG";

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    Stderr,
    /// Appended to this file; ANSI colours are disabled.
    File(PathBuf),
}

impl LogDestination {
    /// The terminal dashboard owns the screen, so it always logs to a file.
    pub fn for_tui(configured: Option<PathBuf>) -> Self {
        LogDestination::File(configured.unwrap_or_else(xdg::default_log_path))
    }

    /// Other commands log to the configured file, or stderr.
    pub fn for_command(configured: Option<PathBuf>) -> Self {
        configured.map_or(LogDestination::Stderr, LogDestination::File)
    }
}

/// Builds the filter: `KDASH_LOG` when set and valid, otherwise `level`.
pub fn filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

/// Initialize the tracing subscriber.
///
/// Fails only when the log file cannot be opened. A second call is a
/// no-op: the first subscriber stays installed.
pub fn init(level: LogLevel, destination: &LogDestination) -> std::io::Result<()> {
    let builder = fmt().with_env_filter(filter(level)).with_target(false);

    let installed = match destination {
        LogDestination::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogDestination::File(path) => {
            let file = open_log_file(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}

fn open_log_file(path: &Path) -> std::io::Result<std::fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
