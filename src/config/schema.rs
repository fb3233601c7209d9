//! TOML configuration schema for kitchen-dashboard.
//!
//! Every section is `#[serde(default)]`, so a missing file, an empty file and
//! a file naming only a few keys all produce a complete [`Config`]. Duration
//! fields are stored as human-readable strings (`"10s"`, `"250ms"`) and
//! parsed by the `humantime` crate through the accessor methods.
//!
//! ```toml
//! [server]
//! [dashboard]
//! [logging]
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::config::xdg;
use crate::profile::ProfileName;

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Backend connection.
    pub server: ServerConfig,
    /// Terminal dashboard behaviour.
    pub dashboard: DashboardConfig,
    /// Log verbosity and destination.
    pub logging: LoggingConfig,
}

impl Config {
    /// Checks every value that `serde` cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.timeout()?;
        self.server.checked_base_url()?;
        self.dashboard.tick_rate()?;
        self.dashboard.profile()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// Backend the dashboard talks to.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL; the `/api/...` paths are appended to it.
    pub base_url: String,
    /// Per-request timeout, e.g. `"10s"`.
    pub timeout: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5050".to_string(),
            timeout: "10s".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        parse_duration("server.timeout", &self.timeout)
    }

    fn checked_base_url(&self) -> Result<&str, ConfigError> {
        let url = self.base_url.trim();
        if url.starts_with("http://") || url.starts_with("https://") {
            Ok(url)
        } else {
            Err(ConfigError::InvalidValue {
                field: "server.base_url",
                message: format!("'{}' is not an http(s) URL", self.base_url),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Terminal dashboard settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Profile loaded at startup.
    pub profile: String,
    /// Redraw interval of the terminal front end.
    pub tick_rate: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            profile: ProfileName::DEFAULT.to_string(),
            tick_rate: "250ms".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn tick_rate(&self) -> Result<Duration, ConfigError> {
        parse_duration("dashboard.tick_rate", &self.tick_rate)
    }

    pub fn profile(&self) -> Result<ProfileName, ConfigError> {
        self.profile
            .parse()
            .map_err(|e: crate::profile::EmptyProfileName| ConfigError::InvalidValue {
                field: "dashboard.profile",
                message: e.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging verbosity.
    pub log_level: LogLevel,
    /// Path to the log file. Empty means the default location for the
    /// command being run.
    pub log_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_file: String::new(),
        }
    }
}

impl LoggingConfig {
    /// Configured log file with `~` expanded, if any.
    pub fn log_file(&self) -> Option<PathBuf> {
        let trimmed = self.log_file.trim();
        (!trimmed.is_empty()).then(|| xdg::expand_tilde(trimmed))
    }
}

/// Log verbosity levels (kebab-case in TOML).
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn parse_duration(field: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|source| ConfigError::InvalidDuration {
        field,
        value: value.to_string(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_config_all_fields() {
        let toml_str = r#"
[server]
base_url = "https://kitchen.local:8443"
timeout = "3s"

[dashboard]
profile = "office"
tick_rate = "100ms"

[logging]
log_level = "debug"
log_file = "/var/log/kdash.log"
"#;
        let config: Config = toml::from_str(toml_str).expect("valid TOML should parse");
        assert_eq!(config.server.base_url, "https://kitchen.local:8443");
        assert_eq!(config.server.timeout().expect("timeout"), Duration::from_secs(3));
        assert_eq!(config.dashboard.profile().expect("profile").as_str(), "office");
        assert_eq!(
            config.dashboard.tick_rate().expect("tick rate"),
            Duration::from_millis(100)
        );
        assert_eq!(config.logging.log_level, LogLevel::Debug);
        assert_eq!(
            config.logging.log_file(),
            Some(PathBuf::from("/var/log/kdash.log"))
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_empty_string_uses_all_defaults() {
        let config: Config = toml::from_str("").expect("empty string should parse");
        assert_eq!(config, Config::default());
        assert_eq!(config.server.timeout().expect("timeout"), Duration::from_secs(10));
        assert_eq!(config.logging.log_file(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_partial_section_fills_remaining_defaults() {
        let config: Config =
            toml::from_str("[server]\ntimeout = \"30s\"\n").expect("partial config");
        assert_eq!(config.server.base_url, "http://localhost:5050");
        assert_eq!(config.server.timeout, "30s");
        assert_eq!(config.dashboard, DashboardConfig::default());
    }

    #[test]
    fn parse_unknown_fields_are_ignored() {
        let config: Config =
            toml::from_str("[server]\ncolour = \"blue\"\n").expect("unknown keys are ignored");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let result: Result<Config, _> = toml::from_str("[logging]\nlog_level = \"loud\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_bad_duration() {
        let mut config = Config::default();
        config.dashboard.tick_rate = "fast".to_string();
        match config.validate() {
            Err(ConfigError::InvalidDuration { field, value, .. }) => {
                assert_eq!(field, "dashboard.tick_rate");
                assert_eq!(value, "fast");
            }
            other => panic!("expected InvalidDuration, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_blank_profile_and_bad_url() {
        let mut config = Config::default();
        config.dashboard.profile = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "dashboard.profile", .. })
        ));

        let mut config = Config::default();
        config.server.base_url = "localhost:5050".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "server.base_url", .. })
        ));
    }

    #[test]
    fn log_level_directive_strings() {
        assert_eq!(LogLevel::Warn.as_str(), "warn");
        assert_eq!(LogLevel::Trace.as_str(), "trace");
    }
}
