//! Terminal front end for the kitchen dashboard.
//!
//! Built on ratatui and crossterm. The front end translates key presses into
//! dashboard messages and draws the [`RenderTree`](crate::render::RenderTree)
//! produced for every frame.

pub mod app;
pub mod event;
pub mod ui;

#[cfg(test)]
mod test_utils;

pub use app::App;
