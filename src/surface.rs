use std::fmt;

use serde::Deserialize;

use crate::error::Error;

/// Size of a drawing surface, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Dimensions {
    /// Constructs new [`Dimensions`].
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either side has no drawable area.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// An RGBA color with a floating point alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Rgba {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha, from `0.0` (transparent) to `1.0` (opaque).
    pub a: f64,
}

impl Rgba {
    /// Constructs a new [`Rgba`].
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Constructs an opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }
}

/// Formats the color as a CSS `rgba()` value.
impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// A 2D drawing target for the background animation.
pub trait Surface {
    /// Resizes the drawing area.
    ///
    /// Resizing may reset any drawing state, including the font.
    fn resize(&mut self, dimensions: Dimensions) -> Result<(), Error>;

    /// Sets the monospace font size used by [`Surface::fill_text`].
    fn set_font_size(&mut self, size: f64) -> Result<(), Error>;

    /// Fills a rectangle, blending with what is already drawn.
    fn fill_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgba,
    ) -> Result<(), Error>;

    /// Draws `text` with its baseline at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f64, y: f64, color: Rgba) -> Result<(), Error>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// A single recorded drawing call.
    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawCall {
        Resize(Dimensions),
        Font(f64),
        Rect { x: f64, y: f64, width: f64, height: f64 },
        Text { text: String, x: f64, y: f64 },
    }

    /// Records every call made to it.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub calls: Vec<DrawCall>,
        /// Glyph draws at these x positions fail.
        pub failing_columns: Vec<f64>,
    }

    impl RecordingSurface {
        pub fn texts(&self) -> impl Iterator<Item = (&str, f64, f64)> {
            self.calls.iter().filter_map(|call| match call {
                DrawCall::Text { text, x, y } => Some((text.as_str(), *x, *y)),
                _ => None,
            })
        }

        pub fn rects(&self) -> usize {
            self.calls
                .iter()
                .filter(|call| matches!(call, DrawCall::Rect { .. }))
                .count()
        }
    }

    impl Surface for RecordingSurface {
        fn resize(&mut self, dimensions: Dimensions) -> Result<(), Error> {
            self.calls.push(DrawCall::Resize(dimensions));
            Ok(())
        }

        fn set_font_size(&mut self, size: f64) -> Result<(), Error> {
            self.calls.push(DrawCall::Font(size));
            Ok(())
        }

        fn fill_rect(
            &mut self,
            x: f64,
            y: f64,
            width: f64,
            height: f64,
            _color: Rgba,
        ) -> Result<(), Error> {
            self.calls.push(DrawCall::Rect {
                x,
                y,
                width,
                height,
            });
            Ok(())
        }

        fn fill_text(&mut self, text: &str, x: f64, y: f64, _color: Rgba) -> Result<(), Error> {
            if self.failing_columns.contains(&x) {
                return Err(Error::Js(format!("cannot draw at {x}")));
            }
            self.calls.push(DrawCall::Text {
                text: text.to_string(),
                x,
                y,
            });
            Ok(())
        }
    }

    /// Lets a test keep inspecting a surface that a driver owns.
    impl<S: Surface> Surface for std::rc::Rc<std::cell::RefCell<S>> {
        fn resize(&mut self, dimensions: Dimensions) -> Result<(), Error> {
            self.borrow_mut().resize(dimensions)
        }

        fn set_font_size(&mut self, size: f64) -> Result<(), Error> {
            self.borrow_mut().set_font_size(size)
        }

        fn fill_rect(
            &mut self,
            x: f64,
            y: f64,
            width: f64,
            height: f64,
            color: Rgba,
        ) -> Result<(), Error> {
            self.borrow_mut().fill_rect(x, y, width, height, color)
        }

        fn fill_text(&mut self, text: &str, x: f64, y: f64, color: Rgba) -> Result<(), Error> {
            self.borrow_mut().fill_text(text, x, y, color)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_css() {
        assert_eq!(
            Rgba::new(18, 18, 18, 0.1).to_string(),
            "rgba(18, 18, 18, 0.1)"
        );
        assert_eq!(Rgba::opaque(255, 255, 255).to_string(), "rgba(255, 255, 255, 1)");
    }

    #[test]
    fn test_empty_dimensions() {
        assert!(Dimensions::new(0.0, 100.0).is_empty());
        assert!(Dimensions::new(100.0, -1.0).is_empty());
        assert!(Dimensions::new(f64::NAN, 100.0).is_empty());
        assert!(!Dimensions::new(1.0, 1.0).is_empty());
    }
}
