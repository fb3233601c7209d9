//! Where kdash keeps its files.
//!
//! `XDG_CONFIG_HOME` and `XDG_RUNTIME_DIR` win on every platform when set to
//! a non-empty value. Otherwise config lives under `~/.config` (or the
//! Application Support folder on macOS) and the default log goes to the
//! temp directory.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "kitchen-dashboard";

const CONFIG_FILE: &str = "config.toml";

/// Value of `var` as a path, treating an empty value as unset.
fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(target_os = "macos")]
fn platform_config_dir() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(not(target_os = "macos"))]
fn platform_config_dir() -> PathBuf {
    home_dir().join(".config")
}

#[cfg(target_os = "macos")]
fn platform_runtime_dir() -> PathBuf {
    env_path("TMPDIR").unwrap_or_else(|| PathBuf::from("/tmp"))
}

#[cfg(not(target_os = "macos"))]
fn platform_runtime_dir() -> PathBuf {
    PathBuf::from("/tmp")
}

/// Directory holding `config.toml`.
pub fn config_dir() -> PathBuf {
    env_path("XDG_CONFIG_HOME")
        .unwrap_or_else(platform_config_dir)
        .join(APP_NAME)
}

pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

/// Directory for transient files such as the TUI log.
pub fn runtime_dir() -> PathBuf {
    env_path("XDG_RUNTIME_DIR").unwrap_or_else(platform_runtime_dir)
}

/// Log file used by the terminal dashboard when none is configured.
pub fn default_log_path() -> PathBuf {
    runtime_dir().join(format!("{APP_NAME}.log"))
}

/// Resolves `~` and `~/...` against the home directory. Other paths pass
/// through untouched.
pub fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix('~') {
        Some("") => home_dir(),
        Some(rest) if rest.starts_with('/') => home_dir().join(&rest[1..]),
        _ => PathBuf::from(path),
    }
}

/// `mkdir -p` followed by `chmod 700` on unix.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}

pub fn ensure_config_dir() -> std::io::Result<PathBuf> {
    let dir = config_dir();
    ensure_dir(&dir)?;
    Ok(dir)
}
