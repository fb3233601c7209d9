//! Non-interactive subcommands and option resolution for `kdash`.
//!
//! Command-line flags override the config file, which overrides built-in
//! defaults. The settings commands talk to the backend through the same
//! [`DashboardApi`] the terminal dashboard uses.

use std::path::{Path, PathBuf};
use std::time::Duration;

use dashboard_api::{ApiError, DashboardApi, SettingsMapping};
use thiserror::Error;

use crate::config::{Config, ConfigError, LogLevel};
use crate::profile::ProfileName;

/// Errors surfaced by the `settings` subcommands.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to read settings file: {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode settings: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Flags shared by the commands that reach the backend.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub server: Option<String>,
}

/// Effective options after applying flags over the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub profile: ProfileName,
    pub base_url: String,
    pub timeout: Duration,
    pub tick_rate: Duration,
    pub log_level: LogLevel,
    pub log_file: Option<PathBuf>,
}

impl RunOptions {
    /// Resolves options, validating every value that ends up used.
    pub fn resolve(config: &Config, overrides: &Overrides) -> Result<Self, ConfigError> {
        let mut config = config.clone();
        if let Some(profile) = &overrides.profile {
            config.dashboard.profile = profile.clone();
        }
        if let Some(server) = &overrides.server {
            config.server.base_url = server.clone();
        }
        config.validate()?;

        Ok(Self {
            profile: config.dashboard.profile()?,
            base_url: config.server.base_url.trim().to_string(),
            timeout: config.server.timeout()?,
            tick_rate: config.dashboard.tick_rate()?,
            log_level: config.logging.log_level,
            log_file: config.logging.log_file(),
        })
    }
}

/// Fetches the profile's mapping and renders it as pretty JSON.
pub async fn show_settings(
    api: &dyn DashboardApi,
    profile: &ProfileName,
) -> Result<String, CommandError> {
    let settings = api.widget_settings(profile.as_str()).await?;
    tracing::info!(%profile, widgets = settings.len(), "fetched widget settings");
    serde_json::to_string_pretty(&settings).map_err(CommandError::Encode)
}

/// Reads a mapping from a JSON file.
pub fn read_settings_file(path: &Path) -> Result<SettingsMapping, CommandError> {
    let content = std::fs::read_to_string(path).map_err(|source| CommandError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CommandError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Saves the mapping in `path` for `profile`, returning the number of widgets.
pub async fn push_settings(
    api: &dyn DashboardApi,
    profile: &ProfileName,
    path: &Path,
) -> Result<usize, CommandError> {
    let settings = read_settings_file(path)?;
    api.save_widget_settings(profile.as_str(), &settings).await?;
    tracing::info!(%profile, widgets = settings.len(), "saved widget settings");
    Ok(settings.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dashboard_api::{
        CalendarFeed, OneDriveImage, Photo, PhotoWidgetSettings, SavePhotoSettingsRequest,
        Weather, WidgetSettings,
    };
    use std::sync::Mutex;

    #[derive(Default)]
    struct SettingsStore {
        saved: Mutex<Option<(String, SettingsMapping)>>,
    }

    #[async_trait]
    impl DashboardApi for SettingsStore {
        async fn calendar(&self) -> Result<CalendarFeed, ApiError> {
            unreachable!("settings commands never fetch feeds")
        }

        async fn weather(&self) -> Result<Weather, ApiError> {
            unreachable!("settings commands never fetch feeds")
        }

        async fn photos(&self) -> Result<Vec<Photo>, ApiError> {
            unreachable!("settings commands never fetch feeds")
        }

        async fn widget_settings(&self, profile: &str) -> Result<SettingsMapping, ApiError> {
            if profile == "missing" {
                return Err(ApiError::Status(404));
            }
            let mut mapping = SettingsMapping::new();
            mapping.insert(
                "clock".to_string(),
                WidgetSettings {
                    width: 200,
                    ..WidgetSettings::default()
                },
            );
            Ok(mapping)
        }

        async fn save_widget_settings(
            &self,
            profile: &str,
            settings: &SettingsMapping,
        ) -> Result<(), ApiError> {
            *self.saved.lock().expect("saved lock") = Some((profile.to_string(), settings.clone()));
            Ok(())
        }

        async fn onedrive_image(&self) -> Result<OneDriveImage, ApiError> {
            unreachable!("settings commands never fetch feeds")
        }

        async fn photo_widget_settings(
            &self,
            _profile: &str,
        ) -> Result<PhotoWidgetSettings, ApiError> {
            unreachable!("settings commands never touch photo settings")
        }

        async fn save_photo_widget_settings(
            &self,
            _settings: &SavePhotoSettingsRequest,
        ) -> Result<(), ApiError> {
            unreachable!("settings commands never touch photo settings")
        }
    }

    #[test]
    fn test_flags_override_config() {
        let overrides = Overrides {
            profile: Some("office".to_string()),
            server: Some("http://10.0.0.2:5050".to_string()),
        };
        let options = RunOptions::resolve(&Config::default(), &overrides).expect("resolve");
        assert_eq!(options.profile.as_str(), "office");
        assert_eq!(options.base_url, "http://10.0.0.2:5050");
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.tick_rate, Duration::from_millis(250));
        assert_eq!(options.log_file, None);
    }

    #[test]
    fn test_blank_profile_flag_is_rejected() {
        let overrides = Overrides {
            profile: Some("   ".to_string()),
            server: None,
        };
        let err = RunOptions::resolve(&Config::default(), &overrides).expect_err("blank");
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[tokio::test]
    async fn test_show_settings_prints_camel_case_json() {
        let api = SettingsStore::default();
        let json = show_settings(&api, &ProfileName::default())
            .await
            .expect("show");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
        assert_eq!(value["clock"]["width"], 200);
        assert_eq!(value["clock"]["enabled"], true);
    }

    #[tokio::test]
    async fn test_show_settings_propagates_backend_status() {
        let api = SettingsStore::default();
        let profile = ProfileName::new("missing").expect("name");
        let err = show_settings(&api, &profile).await.expect_err("404");
        assert!(matches!(err, CommandError::Api(ApiError::Status(404))));
    }

    #[tokio::test]
    async fn test_push_settings_saves_file_contents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("office.json");
        std::fs::write(
            &path,
            r#"{"weather": {"enabled": false, "width": 320, "height": 160}}"#,
        )
        .expect("write");

        let api = SettingsStore::default();
        let profile = ProfileName::new("office").expect("name");
        let count = push_settings(&api, &profile, &path).await.expect("push");
        assert_eq!(count, 1);

        let saved = api.saved.lock().expect("saved lock").clone().expect("saved");
        assert_eq!(saved.0, "office");
        assert!(!saved.1["weather"].enabled);
    }

    #[tokio::test]
    async fn test_push_rejects_invalid_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").expect("write");

        let api = SettingsStore::default();
        let err = push_settings(&api, &ProfileName::default(), &path)
            .await
            .expect_err("invalid");
        assert!(matches!(err, CommandError::InvalidJson { .. }));
        assert!(api.saved.lock().expect("saved lock").is_none());
    }
}
