//! ## Browser backends
//!
//! Everything that talks to the browser lives here:
//!
//! - [`SiteBackend`](canvas::SiteBackend): a Ratatui backend drawing the site
//!   onto a transparent canvas, with its own keyboard, mouse and resize
//!   listeners.
//! - [`CanvasSurface`](surface::CanvasSurface): the canvas behind it, used as
//!   the [`Surface`](crate::surface::Surface) of the background animation.
//! - [`BrowserScheduler`](scheduler::BrowserScheduler): a
//!   [`Scheduler`](crate::timer::Scheduler) on top of `setInterval` and
//!   `setTimeout`.
//! - [`EventCallback`](event_callback::EventCallback): DOM listeners that
//!   detach themselves when dropped.

/// Canvas backend.
pub mod canvas;

/// Canvas surface for the background animation.
pub mod surface;

/// Browser timers.
pub mod scheduler;

/// Event listeners.
pub mod event_callback;

/// Backend utilities.
pub(crate) mod utils;
