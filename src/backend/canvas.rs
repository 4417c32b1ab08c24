use bitvec::{bitvec, prelude::BitVec};
use ratatui::{backend::ClearType, layout::Rect};
use std::{
    cell::Cell as StdCell,
    io::{Error as IoError, Result as IoResult},
    rc::Rc,
};

use crate::{
    backend::{
        event_callback::{
            create_mouse_event, EventCallback, GridGeometry, KEY_EVENT_TYPES, MOUSE_EVENT_TYPES,
            RESIZE_EVENT_TYPES,
        },
        utils::*,
    },
    color::to_css,
    error::Error,
    event::{KeyEvent, MouseEvent},
    utils::{document, viewport_size, window},
};
use ratatui::{
    backend::WindowSize,
    buffer::Cell,
    layout::{Position, Size},
    prelude::Backend,
    style::Color,
};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Width of a single cell.
///
/// This will be used for multiplying the cell's x position to get the actual pixel
/// position on the canvas.
pub const CELL_WIDTH: f64 = 10.0;

/// Height of a single cell.
///
/// This will be used for multiplying the cell's y position to get the actual pixel
/// position on the canvas.
pub const CELL_HEIGHT: f64 = 19.0;

/// Space left between the canvas edge and the grid, in pixels.
const PADDING: f64 = 5.0;

/// Returns the grid size that fits a canvas of the given pixel size.
pub fn grid_size(width: u32, height: u32) -> (u16, u16) {
    let fit = |pixels: u32, cell: f64| {
        ((f64::from(pixels) - 2.0 * PADDING).max(0.0) / cell).floor() as u16
    };
    (fit(width, CELL_WIDTH), fit(height, CELL_HEIGHT))
}

/// Options for the [`SiteBackend`].
#[derive(Debug)]
pub struct SiteBackendOptions {
    /// The element ID.
    grid_id: Option<String>,
    /// Override the viewport size. Disables tracking of window resizes.
    size: Option<(u32, u32)>,
    /// Opacity of cell backgrounds, so the page behind stays visible.
    background_alpha: f64,
}

impl Default for SiteBackendOptions {
    fn default() -> Self {
        Self {
            grid_id: None,
            size: None,
            background_alpha: 0.8,
        }
    }
}

impl SiteBackendOptions {
    /// Constructs a new [`SiteBackendOptions`].
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

    /// Sets the opacity of cell backgrounds.
    ///
    /// # Panics
    ///
    /// Panics if `alpha` is not within `[0, 1]`.
    pub fn background_alpha(mut self, alpha: f64) -> Self {
        if !(0.0..=1.0).contains(&alpha) {
            panic!("Background alpha must be within [0, 1]");
        }
        self.background_alpha = alpha;
        self
    }
}

/// Canvas renderer.
#[derive(Debug)]
struct Canvas {
    /// Canvas element.
    inner: HtmlCanvasElement,
    /// Rendering context.
    context: CanvasRenderingContext2d,
}

impl Canvas {
    /// Constructs a new [`Canvas`].
    fn new(parent: web_sys::Element, width: u32, height: u32) -> Result<Self, Error> {
        let inner = create_canvas_in_element(&parent, width, height, 1)?;
        let context = get_context_2d(&inner)?;
        let canvas = Self { inner, context };
        canvas.reset_context();
        Ok(canvas)
    }

    /// Resizes the canvas, which also resets its context.
    fn resize(&self, width: u32, height: u32) -> Result<(), Error> {
        self.inner.set_width(width);
        self.inner.set_height(height);
        self.inner
            .set_attribute("style", &pinned_style(width, height, 1))?;
        self.reset_context();
        Ok(())
    }

    fn reset_context(&self) {
        self.context.set_font("16px monospace");
        self.context.set_text_baseline("top");
    }
}

/// Canvas backend for the site.
///
/// This backend renders the buffer onto a transparent canvas pinned above the
/// background animation. Cells with a [`Color::Reset`] background are left
/// transparent.
#[derive(Debug)]
pub struct SiteBackend {
    /// Whether the canvas has been initialized.
    initialized: bool,
    /// Opacity of cell backgrounds.
    background_alpha: f64,
    /// Current buffer.
    buffer: Vec<Vec<Cell>>,
    /// Previous buffer.
    prev_buffer: Vec<Vec<Cell>>,
    /// Changed buffer cells
    changed_cells: BitVec,
    /// Canvas.
    canvas: Canvas,
    /// Pixel size of the canvas.
    pixel_size: (u32, u32),
    /// Pixel size reported by the last window resize, not applied yet.
    pending_size: Rc<StdCell<Option<(u32, u32)>>>,
    /// Grid geometry shared with the mouse listener.
    geometry: Rc<StdCell<GridGeometry>>,
    /// Window resize listener.
    #[allow(dead_code)]
    resize_callback: Option<EventCallback<web_sys::Event>>,
    /// Keyboard listener.
    #[allow(dead_code)]
    key_callback: Option<EventCallback<web_sys::KeyboardEvent>>,
    /// Mouse listener.
    #[allow(dead_code)]
    mouse_callback: Option<EventCallback<web_sys::MouseEvent>>,
}

impl SiteBackend {
    /// Constructs a new [`SiteBackend`] covering the viewport.
    pub fn new() -> Result<Self, Error> {
        Self::new_with_options(SiteBackendOptions::default())
    }

    /// Constructs a new [`SiteBackend`] with the given options.
    pub fn new_with_options(options: SiteBackendOptions) -> Result<Self, Error> {
        // Parent element of canvas (uses <body> unless specified)
        let parent = get_element_by_id_or_body(options.grid_id.as_ref())?;

        let (width, height) = match options.size {
            Some(size) => size,
            None => {
                let viewport = viewport_size()?;
                (viewport.width as u32, viewport.height as u32)
            }
        };
        let canvas = Canvas::new(parent, width, height)?;

        let pending_size = Rc::new(StdCell::new(None));
        let resize_callback = match options.size {
            Some(_) => None,
            None => {
                let pending_size = pending_size.clone();
                Some(EventCallback::new(
                    window()?,
                    RESIZE_EVENT_TYPES,
                    move |_: web_sys::Event| {
                        if let Ok(viewport) = viewport_size() {
                            pending_size
                                .set(Some((viewport.width as u32, viewport.height as u32)));
                        }
                    },
                )?)
            }
        };

        let (columns, rows) = grid_size(width, height);
        let buffer = sized_buffer(columns, rows);
        Ok(Self {
            initialized: false,
            background_alpha: options.background_alpha,
            prev_buffer: buffer.clone(),
            changed_cells: bitvec![0; usize::from(columns) * usize::from(rows)],
            buffer,
            canvas,
            pixel_size: (width, height),
            pending_size,
            geometry: Rc::new(StdCell::new(GridGeometry {
                columns,
                rows,
                offset: PADDING,
                cell: (CELL_WIDTH, CELL_HEIGHT),
            })),
            resize_callback,
            key_callback: None,
            mouse_callback: None,
        })
    }

    /// Calls `callback` on every `keydown` event of the document.
    ///
    /// When `callback` returns `true` the key is consumed and the browser's
    /// default action, such as moving focus on `Tab`, is prevented.
    /// Replaces any previously registered keyboard callback.
    pub fn on_key_event<F>(&mut self, mut callback: F) -> Result<(), Error>
    where
        F: FnMut(KeyEvent) -> bool + 'static,
    {
        self.key_callback = Some(EventCallback::new(
            document()?,
            KEY_EVENT_TYPES,
            move |event: web_sys::KeyboardEvent| {
                if callback(KeyEvent::from(event.clone())) {
                    event.prevent_default();
                }
            },
        )?);
        Ok(())
    }

    /// Calls `callback` on every mouse event over the canvas, in grid
    /// coordinates.
    ///
    /// Replaces any previously registered mouse callback.
    pub fn on_mouse_event<F>(&mut self, mut callback: F) -> Result<(), Error>
    where
        F: FnMut(MouseEvent) + 'static,
    {
        let element: web_sys::Element = self.canvas.inner.clone().into();
        let geometry = self.geometry.clone();
        self.mouse_callback = Some(EventCallback::new(
            element.clone(),
            MOUSE_EVENT_TYPES,
            move |event: web_sys::MouseEvent| {
                callback(create_mouse_event(&event, &element, &geometry.get()));
            },
        )?);
        Ok(())
    }

    /// Returns the grid size in cells.
    fn grid(&self) -> (u16, u16) {
        let (width, height) = self.pending_size.get().unwrap_or(self.pixel_size);
        grid_size(width, height)
    }

    /// Applies the last window resize, if any.
    fn apply_pending_resize(&mut self) -> Result<(), Error> {
        let Some((width, height)) = self.pending_size.take() else {
            return Ok(());
        };
        if (width, height) == self.pixel_size {
            return Ok(());
        }
        self.canvas.resize(width, height)?;
        self.pixel_size = (width, height);

        let (columns, rows) = grid_size(width, height);
        self.buffer = sized_buffer(columns, rows);
        self.prev_buffer = self.buffer.clone();
        self.changed_cells = bitvec![0; usize::from(columns) * usize::from(rows)];
        self.geometry.set(GridGeometry {
            columns,
            rows,
            ..self.geometry.get()
        });
        // The resized canvas is blank, everything has to be drawn again.
        self.initialized = false;
        Ok(())
    }

    // Compare the current buffer to the previous buffer and updates the canvas
    // accordingly.
    //
    // If `force_redraw` is `true`, the entire canvas will be cleared and redrawn.
    fn update_grid(&mut self, force_redraw: bool) -> Result<(), Error> {
        if force_redraw {
            self.canvas.context.clear_rect(
                0.0,
                0.0,
                f64::from(self.pixel_size.0),
                f64::from(self.pixel_size.1),
            );
        }
        self.canvas.context.translate(PADDING, PADDING)?;

        self.resolve_changed_cells(force_redraw);
        self.draw_background();
        self.draw_symbols()?;

        self.canvas.context.translate(-PADDING, -PADDING)?;
        Ok(())
    }

    /// Updates the representation of the changed cells.
    fn resolve_changed_cells(&mut self, force_redraw: bool) {
        let mut index = 0;
        for (y, line) in self.buffer.iter().enumerate() {
            for (x, cell) in line.iter().enumerate() {
                let changed = force_redraw
                    || self
                        .prev_buffer
                        .get(y)
                        .and_then(|line| line.get(x))
                        .is_none_or(|prev_cell| cell != prev_cell);
                self.changed_cells.set(index, changed);
                index += 1;
            }
        }
    }

    /// Clears the changed cells and paints their backgrounds.
    ///
    /// Adjacent changed cells with the same background are handled as a single
    /// rectangle.
    fn draw_background(&mut self) {
        let context = &self.canvas.context;
        let alpha = self.background_alpha;
        let draw_region = |(rect, color): (Rect, Color)| {
            let (x, y, width, height) = (
                f64::from(rect.x) * CELL_WIDTH,
                f64::from(rect.y) * CELL_HEIGHT,
                f64::from(rect.width) * CELL_WIDTH,
                f64::from(rect.height) * CELL_HEIGHT,
            );
            context.clear_rect(x, y, width, height);
            if color != Color::Reset {
                context.set_global_alpha(alpha);
                context.set_fill_style_str(&to_css(color, Color::Black));
                context.fill_rect(x, y, width, height);
                context.set_global_alpha(1.0);
            }
        };

        let mut index = 0;
        for (y, line) in self.buffer.iter().enumerate() {
            let mut row_renderer = RowColorOptimizer::new();
            for (x, cell) in line.iter().enumerate() {
                let region = if self.changed_cells[index] {
                    row_renderer.process_color((x, y), cell.bg)
                } else {
                    row_renderer.flush()
                };
                if let Some(region) = region {
                    draw_region(region);
                }
                index += 1;
            }
            if let Some(region) = row_renderer.flush() {
                draw_region(region);
            }
        }
    }

    /// Draws the symbols of the changed cells.
    ///
    /// The fill style is only changed when the foreground color changes, to
    /// keep the number of calls across the WebAssembly boundary low.
    fn draw_symbols(&mut self) -> Result<(), Error> {
        let mut index = 0;
        let mut last_color = None;
        for (y, line) in self.buffer.iter().enumerate() {
            for (x, cell) in line.iter().enumerate() {
                if !self.changed_cells[index] || cell.symbol() == " " {
                    index += 1;
                    continue;
                }
                if last_color != Some(cell.fg) {
                    self.canvas
                        .context
                        .set_fill_style_str(&to_css(cell.fg, Color::White));
                    last_color = Some(cell.fg);
                }
                self.canvas.context.fill_text(
                    cell.symbol(),
                    x as f64 * CELL_WIDTH,
                    y as f64 * CELL_HEIGHT,
                )?;
                index += 1;
            }
        }
        Ok(())
    }
}

/// Returns a blank buffer of the given size.
fn sized_buffer(columns: u16, rows: u16) -> Vec<Vec<Cell>> {
    vec![vec![Cell::default(); usize::from(columns)]; usize::from(rows)]
}

impl Backend for SiteBackend {
    type Error = IoError;

    // Populates the buffer with the given content.
    fn draw<'a, I>(&mut self, content: I) -> IoResult<()>
    where
        I: Iterator<Item = (u16, u16, &'a Cell)>,
    {
        self.apply_pending_resize()?;
        for (x, y, cell) in content {
            if let Some(slot) = self
                .buffer
                .get_mut(usize::from(y))
                .and_then(|line| line.get_mut(usize::from(x)))
            {
                *slot = cell.clone();
            }
        }
        Ok(())
    }

    /// Flush the content to the screen.
    ///
    /// This function is called after the [`SiteBackend::draw`] function to
    /// actually render the content to the screen.
    fn flush(&mut self) -> IoResult<()> {
        if !self.initialized {
            self.update_grid(true)?;
            self.prev_buffer = self.buffer.clone();
            self.initialized = true;
            return Ok(());
        }

        if self.buffer != self.prev_buffer {
            self.update_grid(false)?;
        }

        self.prev_buffer = self.buffer.clone();

        Ok(())
    }

    fn hide_cursor(&mut self) -> IoResult<()> {
        Ok(())
    }

    fn show_cursor(&mut self) -> IoResult<()> {
        Ok(())
    }

    fn get_cursor(&mut self) -> IoResult<(u16, u16)> {
        Ok((0, 0))
    }

    fn set_cursor(&mut self, _x: u16, _y: u16) -> IoResult<()> {
        Ok(())
    }

    fn clear(&mut self) -> IoResult<()> {
        self.apply_pending_resize()?;
        let (columns, rows) = grid_size(self.pixel_size.0, self.pixel_size.1);
        self.buffer = sized_buffer(columns, rows);
        Ok(())
    }

    fn size(&self) -> IoResult<Size> {
        let (columns, rows) = self.grid();
        Ok(Size::new(columns, rows))
    }

    fn window_size(&mut self) -> IoResult<WindowSize> {
        let (columns, rows) = self.grid();
        let (width, height) = self.pending_size.get().unwrap_or(self.pixel_size);
        Ok(WindowSize {
            columns_rows: Size::new(columns, rows),
            pixels: Size::new(
                width.min(u32::from(u16::MAX)) as u16,
                height.min(u32::from(u16::MAX)) as u16,
            ),
        })
    }

    fn get_cursor_position(&mut self) -> IoResult<Position> {
        Ok(Position::ORIGIN)
    }

    fn set_cursor_position<P: Into<Position>>(&mut self, _position: P) -> IoResult<()> {
        Ok(())
    }

    fn clear_region(&mut self, clear_type: ClearType) -> Result<(), Self::Error> {
        match clear_type {
            ClearType::All => self.clear(),
            _ => Err(IoError::other("unimplemented")),
        }
    }
}

/// Batches adjacent cells with the same color into a single rectangle.
///
/// This reduces the number of draw calls to the canvas API, which are
/// expensive from WebAssembly.
struct RowColorOptimizer {
    /// The currently accumulating region and its color
    pending_region: Option<(Rect, Color)>,
}

impl RowColorOptimizer {
    /// Creates a new empty optimizer with no pending region.
    fn new() -> Self {
        Self {
            pending_region: None,
        }
    }

    /// Processes a cell with the given position and color.
    fn process_color(&mut self, pos: (usize, usize), color: Color) -> Option<(Rect, Color)> {
        if let Some((active_rect, active_color)) = self.pending_region.as_mut() {
            if active_color == &color {
                active_rect.width += 1;
            } else {
                let region = *active_rect;
                let region_color = *active_color;
                *active_rect = Rect::new(pos.0 as _, pos.1 as _, 1, 1);
                *active_color = color;
                return Some((region, region_color));
            }
        } else {
            let rect = Rect::new(pos.0 as _, pos.1 as _, 1, 1);
            self.pending_region = Some((rect, color));
        }

        None
    }

    /// Finalizes and returns the current pending region, if any.
    fn flush(&mut self) -> Option<(Rect, Color)> {
        self.pending_region.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_size() {
        assert_eq!(grid_size(810, 466), (80, 24));
        assert_eq!(grid_size(809, 465), (79, 23));
        assert_eq!(grid_size(0, 0), (0, 0));
        assert_eq!(grid_size(5, 5), (0, 0));
    }

    #[test]
    fn test_row_color_optimizer_batches_runs() {
        let mut row = RowColorOptimizer::new();
        assert_eq!(row.process_color((0, 2), Color::Black), None);
        assert_eq!(row.process_color((1, 2), Color::Black), None);
        assert_eq!(
            row.process_color((2, 2), Color::Reset),
            Some((Rect::new(0, 2, 2, 1), Color::Black))
        );
        assert_eq!(row.flush(), Some((Rect::new(2, 2, 1, 1), Color::Reset)));
        assert_eq!(row.flush(), None);
    }
}
