#![warn(missing_docs, clippy::unwrap_used)]
#![doc = include_str!("../README.md")]

/// Custom error type.
pub mod error;

/// Event/input handling.
pub mod event;

/// Web utility functions.
pub mod utils;

/// Logging to the browser console.
pub mod logging;

/// Timers and the clock.
pub mod timer;

/// Drawing surface of the rain animation.
pub mod surface;

/// Falling glyph animation.
pub mod rain;

/// Views and the transitions between them.
pub mod view;

/// Color conversions.
pub mod color;

/// Site content.
pub mod content;

/// Configuration.
pub mod config;

/// User interface.
pub mod ui;

/// Backend.
pub mod backend;

/// Rendering.
mod render;

// Re-export ratatui crate.
pub use ratatui;

// Re-export web_sys crate.
pub use web_sys;

pub use backend::{
    canvas::{SiteBackend, SiteBackendOptions},
    scheduler::BrowserScheduler,
    surface::{CanvasSurface, CanvasSurfaceOptions},
};
pub use config::SiteConfig;
pub use error::Error;
pub use rain::{RainConfig, RainDriver};
pub use render::WebRenderer;
pub use timer::{ManualScheduler, Scheduler};
pub use ui::{Action, App};
pub use view::{View, ViewCoordinator};
