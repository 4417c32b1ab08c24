//! Event callback management with automatic cleanup.
//!
//! This module provides utilities for managing web event listeners with proper
//! lifecycle management and coordinate translation for mouse events.

use std::fmt::Formatter;
use web_sys::{
    wasm_bindgen::{convert::FromWasmAbi, prelude::Closure, JsCast},
    Element, EventTarget,
};

use crate::{
    error::Error,
    event::{MouseButton, MouseEvent, MouseEventKind},
};

/// Manages web event listeners with automatic cleanup.
///
/// When this struct is dropped, all registered event listeners are removed
/// from the target, so nothing fires into freed state.
pub struct EventCallback<T: 'static> {
    /// The event types this callback is registered for.
    event_types: &'static [&'static str],
    /// The target the listeners are attached to.
    target: EventTarget,
    /// The closure that handles the events.
    #[allow(dead_code)]
    closure: Closure<dyn FnMut(T)>,
}

impl<T: 'static> EventCallback<T> {
    /// Creates a new [`EventCallback`] and attaches listeners to the target.
    pub fn new<F>(
        target: impl Into<EventTarget>,
        event_types: &'static [&'static str],
        callback: F,
    ) -> Result<Self, Error>
    where
        F: FnMut(T) + 'static,
        T: JsCast + FromWasmAbi,
    {
        let target = target.into();
        let closure = Closure::<dyn FnMut(T)>::new(callback);

        for event_type in event_types {
            target.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;
        }

        Ok(Self {
            event_types,
            target,
            closure,
        })
    }
}

impl<T: 'static> Drop for EventCallback<T> {
    fn drop(&mut self) {
        for event_type in self.event_types {
            let _ = self.target.remove_event_listener_with_callback(
                event_type,
                self.closure.as_ref().unchecked_ref(),
            );
        }
    }
}

impl<T: 'static> std::fmt::Debug for EventCallback<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventCallback")
            .field("event_types", &self.event_types)
            .finish()
    }
}

/// The event types for keyboard events.
pub(super) const KEY_EVENT_TYPES: &[&str] = &["keydown"];

/// The event types for mouse events.
pub(super) const MOUSE_EVENT_TYPES: &[&str] =
    &["mousemove", "mousedown", "mouseup", "click", "mouseleave"];

/// The event types that change the viewport size.
pub(super) const RESIZE_EVENT_TYPES: &[&str] = &["resize"];

/// How pixels inside an element map to grid cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct GridGeometry {
    /// Grid width in cells.
    pub columns: u16,
    /// Grid height in cells.
    pub rows: u16,
    /// Pixel offset of the grid from the element edge.
    pub offset: f64,
    /// Cell dimensions in pixels (width, height).
    pub cell: (f64, f64),
}

impl GridGeometry {
    /// Returns the cell under a point relative to the element's top left
    /// corner, clamped to the grid.
    pub fn cell_at(&self, x: f64, y: f64) -> (u16, u16) {
        let (cell_width, cell_height) = self.cell;
        // Avoid division by zero
        if cell_width <= 0.0 || cell_height <= 0.0 {
            return (0, 0);
        }
        let col = ((x - self.offset).max(0.0) / cell_width) as u16;
        let row = ((y - self.offset).max(0.0) / cell_height) as u16;
        (
            col.min(self.columns.saturating_sub(1)),
            row.min(self.rows.saturating_sub(1)),
        )
    }
}

/// Creates a [`MouseEvent`] in grid coordinates from a DOM event.
pub(super) fn create_mouse_event(
    event: &web_sys::MouseEvent,
    element: &Element,
    geometry: &GridGeometry,
) -> MouseEvent {
    let rect = element.get_bounding_client_rect();
    let (col, row) = geometry.cell_at(
        event.client_x() as f64 - rect.left(),
        event.client_y() as f64 - rect.top(),
    );
    let button = MouseButton::from(event.button());

    MouseEvent {
        kind: MouseEventKind::from_event_type(&event.type_(), button),
        col,
        row,
        ctrl: event.ctrl_key(),
        alt: event.alt_key(),
        shift: event.shift_key(),
    }
}
