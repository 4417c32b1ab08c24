use log::error;
use ratatui::{Frame, Terminal};
use std::{cell::RefCell, rc::Rc};
use web_sys::wasm_bindgen::prelude::*;

use crate::{
    backend::canvas::SiteBackend,
    error::Error,
    event::{KeyEvent, MouseEvent},
    utils::window,
};

/// Trait for rendering on the web.
///
/// It provides all the necessary methods to render the terminal on the web
/// and also interact with the browser such as handling key events.
pub trait WebRenderer {
    /// Renders the terminal on the web.
    ///
    /// This method takes a closure that will be called on every update
    /// that the browser makes during [`requestAnimationFrame`] calls.
    /// The loop keeps going for the lifetime of the page.
    ///
    /// [`requestAnimationFrame`]: https://developer.mozilla.org/en-US/docs/Web/API/Window/requestAnimationFrame
    fn draw_web<F>(self, render_callback: F) -> Result<(), Error>
    where
        F: FnMut(&mut Frame) + 'static;

    /// Handles key events.
    ///
    /// This method takes a closure that will be called on every `keydown`
    /// event. Returning `true` consumes the key and prevents the browser's
    /// default action for it.
    fn on_key_event<F>(&mut self, callback: F) -> Result<(), Error>
    where
        F: FnMut(KeyEvent) -> bool + 'static;

    /// Handles mouse events.
    ///
    /// This method takes a closure that will be called on every mouse event
    /// over the terminal, with the position translated into grid cells.
    fn on_mouse_event<F>(&mut self, callback: F) -> Result<(), Error>
    where
        F: FnMut(MouseEvent) + 'static;

    /// Requests an animation frame.
    fn request_animation_frame(f: &Closure<dyn FnMut()>) -> Result<(), Error> {
        window()?.request_animation_frame(f.as_ref().unchecked_ref())?;
        Ok(())
    }
}

/// Implement [`WebRenderer`] for Ratatui's [`Terminal`].
///
/// This implementation creates a loop that calls the [`Terminal::draw`] method.
impl WebRenderer for Terminal<SiteBackend> {
    fn draw_web<F>(mut self, mut render_callback: F) -> Result<(), Error>
    where
        F: FnMut(&mut Frame) + 'static,
    {
        let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        *callback.borrow_mut() = Some(Closure::wrap(Box::new({
            let cb = callback.clone();
            move || {
                if let Err(e) = self.draw(|frame| render_callback(frame)) {
                    error!("Unable to draw the frame: {e}");
                }
                if let Some(next) = cb.borrow().as_ref() {
                    if let Err(e) = Self::request_animation_frame(next) {
                        error!("Unable to request the next frame: {e}");
                    }
                }
            }
        }) as Box<dyn FnMut()>));
        if let Some(first) = callback.borrow().as_ref() {
            Self::request_animation_frame(first)?;
        }
        Ok(())
    }

    fn on_key_event<F>(&mut self, callback: F) -> Result<(), Error>
    where
        F: FnMut(KeyEvent) -> bool + 'static,
    {
        self.backend_mut().on_key_event(callback)
    }

    fn on_mouse_event<F>(&mut self, callback: F) -> Result<(), Error>
    where
        F: FnMut(MouseEvent) + 'static,
    {
        self.backend_mut().on_mouse_event(callback)
    }
}
