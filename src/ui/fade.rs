//! Cross-fade of the page area.

use std::time::Duration;

use ratatui::{buffer::Buffer, layout::Rect, style::Color};

use crate::color::{blend, to_rgb};

/// Color the page fades towards. Matches the page background.
pub const BACKDROP: (u8, u8, u8) = (18, 18, 18);

/// Foreground used for cells without an explicit color.
const DEFAULT_FOREGROUND: (u8, u8, u8) = (255, 255, 255);

/// Follows the transition flag of the view coordinator and turns it into an
/// opacity for the page area.
///
/// While transitioning the page fades out over `duration`; once the new view
/// is displayed it fades back in over the same duration. A change in direction
/// starts from the current opacity.
#[derive(Debug, Clone)]
pub struct FadeTracker {
    duration: Duration,
    transitioning: bool,
    changed_at: Duration,
    start: f64,
}

impl FadeTracker {
    /// Constructs a fully visible tracker.
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            transitioning: false,
            changed_at: Duration::ZERO,
            start: 1.0,
        }
    }

    /// Records the transition flag at `now` and returns the opacity in `[0, 1]`.
    pub fn update(&mut self, transitioning: bool, now: Duration) -> f64 {
        if transitioning != self.transitioning {
            self.start = self.opacity_at(now);
            self.transitioning = transitioning;
            self.changed_at = now;
        }
        self.opacity_at(now)
    }

    fn opacity_at(&self, now: Duration) -> f64 {
        let target = if self.transitioning { 0.0 } else { 1.0 };
        if self.duration.is_zero() {
            return target;
        }
        let progress = (now.saturating_sub(self.changed_at).as_secs_f64()
            / self.duration.as_secs_f64())
        .min(1.0);
        self.start + (target - self.start) * progress
    }
}

/// Blends every cell of `area` towards [`BACKDROP`].
///
/// At zero opacity the cells are reset, leaving the area transparent.
pub fn apply(buf: &mut Buffer, area: Rect, opacity: f64) {
    if opacity >= 1.0 {
        return;
    }
    let area = area.intersection(buf.area);
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            let Some(cell) = buf.cell_mut((x, y)) else {
                continue;
            };
            if opacity <= 0.0 {
                cell.reset();
                continue;
            }
            let fg = to_rgb(cell.fg).unwrap_or(DEFAULT_FOREGROUND);
            cell.fg = blend(fg, BACKDROP, opacity);
            if let Some(bg) = to_rgb(cell.bg) {
                cell.bg = blend(bg, BACKDROP, opacity);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Style;

    const DELAY: Duration = Duration::from_millis(500);

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_stable_is_opaque() {
        let mut fade = FadeTracker::new(DELAY);
        assert_eq!(fade.update(false, ms(0)), 1.0);
        assert_eq!(fade.update(false, ms(10_000)), 1.0);
    }

    #[test]
    fn test_fade_out_then_in() {
        let mut fade = FadeTracker::new(DELAY);
        fade.update(false, ms(0));
        assert_eq!(fade.update(true, ms(1_000)), 1.0);
        assert!((fade.update(true, ms(1_250)) - 0.5).abs() < 1e-9);
        assert_eq!(fade.update(true, ms(1_500)), 0.0);
        assert_eq!(fade.update(true, ms(2_000)), 0.0);

        assert_eq!(fade.update(false, ms(2_000)), 0.0);
        assert!((fade.update(false, ms(2_125)) - 0.25).abs() < 1e-9);
        assert_eq!(fade.update(false, ms(2_500)), 1.0);
    }

    #[test]
    fn test_reversal_starts_from_current_opacity() {
        let mut fade = FadeTracker::new(DELAY);
        fade.update(true, ms(0));
        assert!((fade.update(false, ms(250)) - 0.5).abs() < 1e-9);
        assert!((fade.update(false, ms(500)) - 0.75).abs() < 1e-9);
        assert_eq!(fade.update(false, ms(750)), 1.0);
    }

    #[test]
    fn test_zero_duration_jumps() {
        let mut fade = FadeTracker::new(Duration::ZERO);
        assert_eq!(fade.update(true, ms(5)), 0.0);
        assert_eq!(fade.update(false, ms(5)), 1.0);
    }

    #[test]
    fn test_apply_blends_and_clears() {
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        buf.set_string(0, 0, "ab", Style::new().fg(Color::Rgb(218, 218, 218)).bg(Color::Black));

        let mut faded = buf.clone();
        apply(&mut faded, area, 0.5);
        assert_eq!(faded[(0, 0)].fg, Color::Rgb(118, 118, 118));
        assert_eq!(faded[(0, 0)].bg, Color::Rgb(9, 9, 9));
        assert_eq!(faded[(1, 0)].symbol(), "b");

        let mut untouched = buf.clone();
        apply(&mut untouched, area, 1.0);
        assert_eq!(untouched, buf);

        apply(&mut buf, area, 0.0);
        assert_eq!(buf, Buffer::empty(area));
    }

    #[test]
    fn test_apply_outside_buffer_is_clipped() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 2, 2));
        buf.set_string(0, 0, "xy", Style::new());
        apply(&mut buf, Rect::new(1, 1, 10, 10), 0.0);
        assert_eq!(buf[(0, 0)].symbol(), "x");
        assert_eq!(buf[(1, 1)].symbol(), " ");
    }
}
