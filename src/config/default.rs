//! Default configuration template and file creation utilities.
//!
//! Provides a commented TOML template that matches `Config::default()` and
//! writes it to the XDG config path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::error::ConfigError;
use crate::config::xdg;

// ---------------------------------------------------------------------------
// Default TOML template
// ---------------------------------------------------------------------------

/// TOML template with all default values.
///
/// Every value here must match `Config::default()` from `schema.rs`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Kitchen Dashboard Configuration
#
# This file was generated by `kdash config init`.
# All values shown below are the built-in defaults.
#
# Location: $XDG_CONFIG_HOME/kitchen-dashboard/config.toml

# ==============================================================================
# Backend
# ==============================================================================

[server]

# Base URL of the dashboard backend. The /api/... paths are appended to it.
# Overridden by --server on the command line.
base_url = "http://localhost:5050"

# Timeout for a single backend request.
# Examples: "5s", "10s", "1m"
timeout = "10s"

# ==============================================================================
# Dashboard
# ==============================================================================

[dashboard]

# Profile whose widget settings are loaded at startup.
# Overridden by --profile on the command line.
profile = "default"

# Redraw interval of the terminal dashboard.
# Examples: "100ms", "250ms", "1s"
tick_rate = "250ms"

# ==============================================================================
# Logging
# ==============================================================================

[logging]

# Logging verbosity. The KDASH_LOG environment variable takes precedence.
# Options: "error", "warn", "info", "debug", "trace"
log_level = "info"

# Path to the log file. Tilde (~) is expanded.
# Empty means $XDG_RUNTIME_DIR/kitchen-dashboard.log for `kdash tui`
# and stderr for every other command.
log_file = ""
"#;

// ---------------------------------------------------------------------------
// File creation
// ---------------------------------------------------------------------------

/// Creates (or force-overwrites) the default config file.
///
/// - If the file exists and `force` is `false`, returns `ConfigError::AlreadyExists`.
/// - If the file exists and `force` is `true`, backs it up to `.toml.backup` first.
/// - Returns the path where the config was written.
pub fn create_default_config(force: bool) -> Result<PathBuf, ConfigError> {
    let path = xdg::config_path();

    if path.exists() {
        if !force {
            return Err(ConfigError::AlreadyExists { path });
        }
        let backup_path = path.with_extension("toml.backup");
        fs::rename(&path, &backup_path).map_err(|e| ConfigError::WriteError {
            path: backup_path.clone(),
            source: e,
        })?;
        tracing::info!("Backed up existing config to {}", backup_path.display());
    }

    write_default_config(&path)?;
    tracing::info!("Wrote default configuration to {}", path.display());
    Ok(path)
}

/// Writes the default template to `path`, creating parent dirs and setting 0600 permissions.
fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let write_error = |source| ConfigError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    xdg::ensure_config_dir().map_err(write_error)?;
    fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(write_error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(write_error)?;
    }

    Ok(())
}
