//! HTTP client for the dashboard backend.
//!
//! [`DashboardApi`] is the seam the dashboard runtime talks to;
//! [`DashboardClient`] implements it over `reqwest`. Every call maps
//! non-success statuses and `{"error": ...}` bodies to [`ApiError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::types::{
    CalendarFeed, CalendarPayload, ErrorBody, OneDriveImage, Photo, PhotoWidgetSettings,
    SavePhotoSettingsRequest, SaveSettingsRequest, SettingsMapping, Weather,
};

/// Calendar events endpoint.
pub const CALENDAR_PATH: &str = "/api/calendar";

/// Current weather endpoint.
pub const WEATHER_PATH: &str = "/api/weather";

/// Photo gallery endpoint.
pub const PHOTOS_PATH: &str = "/api/photos";

/// Per-profile widget settings endpoint (GET and POST).
pub const WIDGET_SETTINGS_PATH: &str = "/api/widgets/settings";

/// Rotating OneDrive image endpoint.
pub const ONEDRIVE_IMAGE_PATH: &str = "/api/onedrive-image";

/// Photo widget settings endpoint (GET and POST).
pub const PHOTO_SETTINGS_PATH: &str = "/api/photo-widget-settings";

/// Operations the dashboard needs from its backend.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// `GET /api/calendar`
    async fn calendar(&self) -> Result<CalendarFeed, ApiError>;

    /// `GET /api/weather`
    async fn weather(&self) -> Result<Weather, ApiError>;

    /// `GET /api/photos`
    async fn photos(&self) -> Result<Vec<Photo>, ApiError>;

    /// `GET /api/widgets/settings?profile=<profile>`
    async fn widget_settings(&self, profile: &str) -> Result<SettingsMapping, ApiError>;

    /// `POST /api/widgets/settings` with the full mapping.
    async fn save_widget_settings(
        &self,
        profile: &str,
        settings: &SettingsMapping,
    ) -> Result<(), ApiError>;

    /// `GET /api/onedrive-image`
    async fn onedrive_image(&self) -> Result<OneDriveImage, ApiError>;

    /// `GET /api/photo-widget-settings?profile=<profile>`
    async fn photo_widget_settings(&self, profile: &str) -> Result<PhotoWidgetSettings, ApiError>;

    /// `POST /api/photo-widget-settings`
    async fn save_photo_widget_settings(
        &self,
        settings: &SavePhotoSettingsRequest,
    ) -> Result<(), ApiError>;
}

/// `reqwest`-backed implementation of [`DashboardApi`].
#[derive(Debug, Clone)]
pub struct DashboardClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DashboardClient {
    /// Creates a client for the backend at `base_url` (e.g. `http://localhost:5050`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] if the URL does not parse or is
    /// not `http`/`https`, and [`ApiError::Network`] if the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut parsed =
            Url::parse(base_url).map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        // Without the trailing slash `join` would replace the last path segment.
        if !parsed.path().ends_with('/') {
            let path = format!("{}/", parsed.path());
            parsed.set_path(&path);
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    /// Base URL requests are resolved against, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "GET");
        let response = self.http.get(url).query(query).send().await?;
        let body = read_body(response).await?;
        decode(&body)
    }

    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "POST");
        let response = self.http.post(url).json(body).send().await?;
        read_body(response).await.map(|_| ())
    }
}

#[async_trait]
impl DashboardApi for DashboardClient {
    async fn calendar(&self) -> Result<CalendarFeed, ApiError> {
        self.get_json::<CalendarPayload>(CALENDAR_PATH, &[])
            .await
            .map(CalendarFeed::from)
    }

    async fn weather(&self) -> Result<Weather, ApiError> {
        self.get_json(WEATHER_PATH, &[]).await
    }

    async fn photos(&self) -> Result<Vec<Photo>, ApiError> {
        self.get_json(PHOTOS_PATH, &[]).await
    }

    async fn widget_settings(&self, profile: &str) -> Result<SettingsMapping, ApiError> {
        self.get_json(WIDGET_SETTINGS_PATH, &[("profile", profile)])
            .await
    }

    async fn save_widget_settings(
        &self,
        profile: &str,
        settings: &SettingsMapping,
    ) -> Result<(), ApiError> {
        self.post_json(
            WIDGET_SETTINGS_PATH,
            &SaveSettingsRequest { profile, settings },
        )
        .await
    }

    async fn onedrive_image(&self) -> Result<OneDriveImage, ApiError> {
        self.get_json(ONEDRIVE_IMAGE_PATH, &[]).await
    }

    async fn photo_widget_settings(&self, profile: &str) -> Result<PhotoWidgetSettings, ApiError> {
        self.get_json(PHOTO_SETTINGS_PATH, &[("profile", profile)])
            .await
    }

    async fn save_photo_widget_settings(
        &self,
        settings: &SavePhotoSettingsRequest,
    ) -> Result<(), ApiError> {
        self.post_json(PHOTO_SETTINGS_PATH, settings).await
    }
}

/// Reads the response body, mapping error statuses.
///
/// An `{"error": ...}` body on a failed response is surfaced as
/// [`ApiError::Backend`]; anything else becomes [`ApiError::Status`].
async fn read_body(response: reqwest::Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        return Ok(body);
    }
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody { error }) => Err(ApiError::Backend(error)),
        Err(_) => Err(ApiError::Status(status.as_u16())),
    }
}

/// Decodes a success body, treating `{"error": "..."}` as a backend failure.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    if let Ok(ErrorBody { error }) = serde_json::from_str::<ErrorBody>(body) {
        return Err(ApiError::Backend(error));
    }
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}
