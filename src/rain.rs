//! Falling-glyph background animation.
//!
//! The animation is split into [`RainState`], which owns the per-column fall
//! positions and knows how to paint one frame onto a [`Surface`], and
//! [`RainDriver`], which ties a state and a surface to a periodic timer.

use std::{
    cell::{Ref, RefCell},
    fmt,
    rc::{Rc, Weak},
    time::Duration,
};

use compact_str::{CompactString, ToCompactString};
use log::{debug, trace, warn};
use rand::{rngs::SmallRng, Rng};
use serde::Deserialize;

use crate::{
    error::Error,
    surface::{Dimensions, Rgba, Surface},
    timer::{Scheduler, TimerId},
};

/// Row every column starts from after attach or resize.
pub const START_ROW: u32 = 1;

/// Reduced cell size for narrow viewports.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct NarrowViewport {
    /// Widest viewport, in pixels, that still counts as narrow.
    pub max_width: f64,
    /// Cell size to use on narrow viewports.
    pub cell_size: f64,
}

/// Options for the rain animation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RainConfig {
    /// Edge of a glyph cell in pixels. Also used as the font size.
    pub cell_size: f64,
    /// Narrow viewport override for [`RainConfig::cell_size`].
    pub narrow: Option<NarrowViewport>,
    /// Period between two frames, in milliseconds.
    pub tick_ms: u64,
    /// Glyphs to pick from. Every `char` is one glyph.
    pub alphabet: String,
    /// Chance that a column which left the surface starts over on a given tick.
    pub reset_chance: f64,
    /// Color painted over the whole surface every tick to fade older glyphs.
    pub trail: Rgba,
    /// Glyph color.
    pub glyph: Rgba,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            cell_size: 16.0,
            narrow: None,
            tick_ms: 100,
            alphabet: "アイウエオカキクケコサシスセソ0123456789".to_string(),
            reset_chance: 0.025,
            trail: Rgba::new(18, 18, 18, 0.1),
            glyph: Rgba::opaque(255, 255, 255),
        }
    }
}

impl RainConfig {
    /// Returns the tick period.
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Returns the cell size to use for a surface `width` pixels wide.
    pub fn cell_size_for(&self, width: f64) -> f64 {
        match self.narrow {
            Some(narrow) if width <= narrow.max_width => narrow.cell_size,
            _ => self.cell_size,
        }
    }

    /// Splits the alphabet into glyphs.
    pub fn glyphs(&self) -> Vec<CompactString> {
        self.alphabet
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_compact_string())
            .collect()
    }

    /// Checks that the options describe a drawable animation.
    pub fn validate(&self) -> Result<(), Error> {
        let positive = |value: f64| value.is_finite() && value > 0.0;
        if !positive(self.cell_size) {
            return Err(Error::InvalidConfig(format!(
                "rain.cell_size must be positive, got {}",
                self.cell_size
            )));
        }
        if let Some(narrow) = self.narrow {
            if !positive(narrow.cell_size) {
                return Err(Error::InvalidConfig(format!(
                    "rain.narrow.cell_size must be positive, got {}",
                    narrow.cell_size
                )));
            }
        }
        if self.tick_ms == 0 {
            return Err(Error::InvalidConfig("rain.tick_ms must not be 0".into()));
        }
        if self.glyphs().is_empty() {
            return Err(Error::InvalidConfig("rain.alphabet must not be empty".into()));
        }
        if !(0.0..=1.0).contains(&self.reset_chance) {
            return Err(Error::InvalidConfig(format!(
                "rain.reset_chance must be within [0, 1], got {}",
                self.reset_chance
            )));
        }
        for (name, color) in [("trail", self.trail), ("glyph", self.glyph)] {
            if !(0.0..=1.0).contains(&color.a) {
                return Err(Error::InvalidConfig(format!(
                    "rain.{name}.a must be within [0, 1], got {}",
                    color.a
                )));
            }
        }
        Ok(())
    }
}

/// Number of whole cells that fit in `width`.
///
/// Empty, negative or non-finite widths fit no cells.
pub fn column_count(width: f64, cell_size: f64) -> usize {
    if width.is_finite() && width > 0.0 && cell_size.is_finite() && cell_size > 0.0 {
        (width / cell_size).floor() as usize
    } else {
        0
    }
}

/// What happened during a single tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Glyphs drawn.
    pub drawn: usize,
    /// Columns skipped because no glyph could be picked or drawn.
    pub skipped: usize,
    /// Columns that started over from the top.
    pub restarted: usize,
}

/// Fall positions of every column.
#[derive(Debug, Clone, PartialEq)]
pub struct RainState {
    dimensions: Dimensions,
    cell_size: f64,
    drops: Vec<u32>,
}

impl RainState {
    /// Constructs a new [`RainState`] for a surface of the given size.
    pub fn new(config: &RainConfig, dimensions: Dimensions) -> Self {
        let mut state = Self {
            dimensions,
            cell_size: config.cell_size,
            drops: Vec::new(),
        };
        state.resize(config, dimensions);
        state
    }

    /// Recomputes the cell size and the columns, restarting every column.
    pub fn resize(&mut self, config: &RainConfig, dimensions: Dimensions) {
        self.dimensions = dimensions;
        self.cell_size = config.cell_size_for(dimensions.width);
        let columns = column_count(dimensions.width, self.cell_size);
        self.drops.clear();
        self.drops.resize(columns, START_ROW);
    }

    /// Returns the number of columns.
    pub fn columns(&self) -> usize {
        self.drops.len()
    }

    /// Returns the next row of every column.
    pub fn drops(&self) -> &[u32] {
        &self.drops
    }

    /// Returns the cell size in pixels.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Returns the surface size this state was computed for.
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Paints one frame and advances every column by a row.
    ///
    /// A column whose glyph cannot be picked or drawn is left untouched for
    /// this tick.
    pub fn step<S, R>(
        &mut self,
        surface: &mut S,
        config: &RainConfig,
        glyphs: &[CompactString],
        rng: &mut R,
    ) -> TickReport
    where
        S: Surface + ?Sized,
        R: Rng + ?Sized,
    {
        let mut report = TickReport::default();
        let Dimensions { width, height } = self.dimensions;
        if let Err(e) = surface.fill_rect(0.0, 0.0, width, height, config.trail) {
            warn!("Unable to paint the rain trail: {e}");
        }

        let reset_chance = if (0.0..=1.0).contains(&config.reset_chance) {
            config.reset_chance
        } else {
            0.0
        };
        for (column, drop) in self.drops.iter_mut().enumerate() {
            if glyphs.is_empty() {
                report.skipped += 1;
                continue;
            }
            let glyph = &glyphs[rng.random_range(0..glyphs.len())];
            let x = column as f64 * self.cell_size;
            let y = f64::from(*drop) * self.cell_size;
            if let Err(e) = surface.fill_text(glyph, x, y, config.glyph) {
                trace!("Skipping rain column {column}: {e}");
                report.skipped += 1;
                continue;
            }
            report.drawn += 1;

            if y > height && rng.random_bool(reset_chance) {
                *drop = 0;
                report.restarted += 1;
            } else {
                *drop = drop.saturating_add(1);
            }
        }
        report
    }
}

/// Everything the timer callback needs.
struct Rain<S> {
    state: RainState,
    config: RainConfig,
    glyphs: Vec<CompactString>,
    surface: S,
    rng: SmallRng,
}

impl<S: Surface> Rain<S> {
    fn tick(&mut self) -> TickReport {
        let report = self
            .state
            .step(&mut self.surface, &self.config, &self.glyphs, &mut self.rng);
        if report.skipped > 0 {
            warn!("Rain tick skipped {} columns", report.skipped);
        }
        report
    }

    fn resize(&mut self, dimensions: Dimensions) {
        self.state.resize(&self.config, dimensions);
        // Resizing a canvas resets its context, so the font goes with it.
        if let Err(e) = self.surface.resize(dimensions) {
            warn!("Unable to resize the rain surface: {e}");
        }
        if let Err(e) = self.surface.set_font_size(self.state.cell_size()) {
            warn!("Unable to set the rain font: {e}");
        }
        debug!(
            "Rain resized to {}x{}: {} columns of {}px",
            dimensions.width,
            dimensions.height,
            self.state.columns(),
            self.state.cell_size()
        );
    }
}

/// Drives the rain animation on a [`Scheduler`].
///
/// The driver owns the surface and a periodic timer. Dropping the driver
/// detaches it.
pub struct RainDriver<S: Surface + 'static> {
    scheduler: Rc<dyn Scheduler>,
    rain: Option<Rc<RefCell<Rain<S>>>>,
    timer: Option<TimerId>,
}

impl<S: Surface + 'static> RainDriver<S> {
    /// Attaches the animation to `surface` and starts ticking.
    ///
    /// Without a surface the driver is inert: it schedules nothing and every
    /// operation does nothing.
    pub fn attach(
        scheduler: Rc<dyn Scheduler>,
        surface: Option<S>,
        dimensions: Dimensions,
        config: RainConfig,
        rng: SmallRng,
    ) -> Self {
        let Some(surface) = surface else {
            debug!("No rain surface available, the background stays blank");
            return Self {
                scheduler,
                rain: None,
                timer: None,
            };
        };

        let mut rain = Rain {
            state: RainState::new(&config, dimensions),
            glyphs: config.glyphs(),
            config,
            surface,
            rng,
        };
        rain.resize(dimensions);
        let period = rain.config.tick();
        let rain = Rc::new(RefCell::new(rain));

        let weak: Weak<RefCell<Rain<S>>> = Rc::downgrade(&rain);
        let timer = match scheduler.set_interval(
            period,
            Box::new(move || {
                if let Some(rain) = weak.upgrade() {
                    rain.borrow_mut().tick();
                }
            }),
        ) {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("Unable to start the rain timer: {e}");
                None
            }
        };

        Self {
            scheduler,
            rain: Some(rain),
            timer,
        }
    }

    /// Paints one frame immediately.
    ///
    /// Returns `None` when the driver has no surface.
    pub fn tick(&mut self) -> Option<TickReport> {
        self.rain.as_ref().map(|rain| rain.borrow_mut().tick())
    }

    /// Adapts the animation to a new surface size.
    pub fn resize(&mut self, dimensions: Dimensions) {
        if let Some(rain) = &self.rain {
            rain.borrow_mut().resize(dimensions);
        }
    }

    /// Stops the timer and releases the surface.
    pub fn detach(&mut self) {
        if let Some(timer) = self.timer.take() {
            self.scheduler.cancel(timer);
        }
        if self.rain.take().is_some() {
            debug!("Rain detached");
        }
    }

    /// Returns `true` while the driver holds a surface.
    pub fn is_attached(&self) -> bool {
        self.rain.is_some()
    }

    /// Returns the animation state, if attached.
    pub fn state(&self) -> Option<Ref<'_, RainState>> {
        self.rain
            .as_ref()
            .map(|rain| Ref::map(rain.borrow(), |rain| &rain.state))
    }
}

impl<S: Surface + 'static> Drop for RainDriver<S> {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<S: Surface + 'static> fmt::Debug for RainDriver<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RainDriver")
            .field("attached", &self.is_attached())
            .field("timer", &self.timer)
            .finish()
    }
}
