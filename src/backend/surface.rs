use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::{
    backend::utils::*,
    error::Error,
    surface::{Dimensions, Rgba, Surface},
};

/// Options for the [`CanvasSurface`].
#[derive(Debug, Default)]
pub struct CanvasSurfaceOptions {
    /// The element ID.
    grid_id: Option<String>,
    /// Override the viewport size.
    size: Option<(u32, u32)>,
}

impl CanvasSurfaceOptions {
    /// Constructs a new [`CanvasSurfaceOptions`].
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the element id of the canvas' parent element.
    pub fn grid_id(mut self, id: &str) -> Self {
        self.grid_id = Some(id.to_string());
        self
    }

    /// Sets the size of the canvas, in pixels.
    pub fn size(mut self, size: (u32, u32)) -> Self {
        self.size = Some(size);
        self
    }
}

/// A [`Surface`] backed by a canvas pinned behind the page.
#[derive(Debug)]
pub struct CanvasSurface {
    /// Canvas element.
    inner: HtmlCanvasElement,
    /// Rendering context.
    context: CanvasRenderingContext2d,
    /// Fill style currently set on the context.
    fill_style: Option<Rgba>,
}

impl CanvasSurface {
    /// Creates the canvas and appends it to the parent element.
    pub fn new(options: CanvasSurfaceOptions) -> Result<Self, Error> {
        let parent = get_element_by_id_or_body(options.grid_id.as_ref())?;
        let (width, height) = match options.size {
            Some(size) => size,
            None => {
                let viewport = crate::utils::viewport_size()?;
                (viewport.width as u32, viewport.height as u32)
            }
        };
        let inner = create_canvas_in_element(&parent, width, height, 0)?;
        inner.set_attribute("aria-hidden", "true")?;
        let context = get_context_2d(&inner)?;
        Ok(Self {
            inner,
            context,
            fill_style: None,
        })
    }

    fn set_fill_style(&mut self, color: Rgba) {
        if self.fill_style != Some(color) {
            self.context.set_fill_style_str(&color.to_string());
            self.fill_style = Some(color);
        }
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, dimensions: Dimensions) -> Result<(), Error> {
        let width = dimensions.width.max(0.0) as u32;
        let height = dimensions.height.max(0.0) as u32;
        self.inner.set_width(width);
        self.inner.set_height(height);
        self.inner
            .set_attribute("style", &pinned_style(width, height, 0))?;
        // Resizing resets the whole context state.
        self.fill_style = None;
        Ok(())
    }

    fn set_font_size(&mut self, size: f64) -> Result<(), Error> {
        self.context.set_font(&format!("{size}px monospace"));
        Ok(())
    }

    fn fill_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgba,
    ) -> Result<(), Error> {
        self.set_fill_style(color);
        self.context.fill_rect(x, y, width, height);
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: Rgba) -> Result<(), Error> {
        self.set_fill_style(color);
        self.context.fill_text(text, x, y)?;
        Ok(())
    }
}

impl Drop for CanvasSurface {
    fn drop(&mut self) {
        self.inner.remove();
    }
}
