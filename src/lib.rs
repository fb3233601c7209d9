//! Kitchen Dashboard library
//!
//! A profile-aware widget dashboard for the kitchen display. Widgets (clock,
//! weather, calendar, photo list and a rotating OneDrive photo) are laid out
//! from per-profile settings stored by the backend.
//!
//! The core is a pure reducer: [`dashboard::Dashboard::update`] takes a
//! [`dashboard::Msg`] and returns the next state plus the
//! [`dashboard::Effect`]s to perform. [`runtime::Runtime`] performs them
//! against a [`dashboard_api::DashboardApi`] and feeds the results back as
//! messages. [`render::render_tree`] projects the state into what the
//! terminal front end in [`tui`] draws.

pub mod commands;
pub mod config;
pub mod container;
pub mod dashboard;
pub mod logging;
pub mod profile;
pub mod remote;
pub mod render;
pub mod runtime;
pub mod settings;
pub mod shell;
pub mod timer;
pub mod tui;
pub mod widgets;

pub use dashboard_api;
