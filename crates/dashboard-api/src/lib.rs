//! # dashboard-api
//!
//! Typed async client for the kitchen dashboard backend.
//!
//! The backend serves widget feeds (calendar, weather, photos, a rotating
//! OneDrive image) and stores per-profile widget settings. This crate
//! models those JSON bodies and exposes them through the [`DashboardApi`]
//! trait, implemented over HTTP by [`DashboardClient`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use dashboard_api::{DashboardApi, DashboardClient};
//! use std::time::Duration;
//!
//! let client = DashboardClient::new("http://localhost:5050", Duration::from_secs(10))?;
//! let settings = client.widget_settings("default").await?;
//! for (id, s) in &settings {
//!     println!("{id}: {}x{} enabled={}", s.width, s.height, s.enabled);
//! }
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::{DashboardApi, DashboardClient};
pub use error::ApiError;
pub use types::{
    CalendarEvent, CalendarFeed, EventStart, OneDriveImage, Photo, PhotoWidgetSettings,
    SavePhotoSettingsRequest, SettingsMapping, Weather, WidgetId, WidgetSettings,
};
