use ratatui::style::Color;

/// RGB values of the 16 base terminal colors.
const ANSI: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (205, 49, 49),
    (13, 188, 121),
    (229, 229, 16),
    (36, 114, 200),
    (188, 63, 188),
    (17, 168, 205),
    (229, 229, 229),
    (102, 102, 102),
    (241, 76, 76),
    (35, 209, 139),
    (245, 245, 67),
    (59, 142, 234),
    (214, 112, 214),
    (41, 184, 219),
    (255, 255, 255),
];

/// Converts a color to RGB.
///
/// Returns `None` for [`Color::Reset`], whose value depends on where it is
/// used.
pub fn to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    let index = match color {
        Color::Reset => return None,
        Color::Rgb(r, g, b) => return Some((r, g, b)),
        Color::Indexed(index) => return Some(indexed_to_rgb(index)),
        Color::Black => 0,
        Color::Red => 1,
        Color::Green => 2,
        Color::Yellow => 3,
        Color::Blue => 4,
        Color::Magenta => 5,
        Color::Cyan => 6,
        Color::Gray => 7,
        Color::DarkGray => 8,
        Color::LightRed => 9,
        Color::LightGreen => 10,
        Color::LightYellow => 11,
        Color::LightBlue => 12,
        Color::LightMagenta => 13,
        Color::LightCyan => 14,
        Color::White => 15,
    };
    Some(ANSI[index])
}

/// Converts a 256-color palette index to RGB.
fn indexed_to_rgb(index: u8) -> (u8, u8, u8) {
    match index {
        0..=15 => ANSI[index as usize],
        16..=231 => {
            let level = |value: u8| if value == 0 { 0 } else { 55 + value * 40 };
            let index = index - 16;
            (level(index / 36), level((index / 6) % 6), level(index % 6))
        }
        232..=255 => {
            let gray = 8 + (index - 232) * 10;
            (gray, gray, gray)
        }
    }
}

/// Returns the CSS value of `color`, using `fallback` for [`Color::Reset`].
pub fn to_css(color: Color, fallback: Color) -> String {
    let (r, g, b) = to_rgb(color)
        .or_else(|| to_rgb(fallback))
        .unwrap_or((255, 255, 255));
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Mixes `color` with `backdrop`, keeping `opacity` of `color`.
pub fn blend(color: (u8, u8, u8), backdrop: (u8, u8, u8), opacity: f64) -> Color {
    let opacity = opacity.clamp(0.0, 1.0);
    let mix = |front: u8, back: u8| {
        (f64::from(front) * opacity + f64::from(back) * (1.0 - opacity)).round() as u8
    };
    Color::Rgb(
        mix(color.0, backdrop.0),
        mix(color.1, backdrop.1),
        mix(color.2, backdrop.2),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_and_indexed_colors() {
        assert_eq!(to_rgb(Color::Reset), None);
        assert_eq!(to_rgb(Color::White), Some((255, 255, 255)));
        assert_eq!(to_rgb(Color::Indexed(9)), to_rgb(Color::LightRed));
        assert_eq!(to_rgb(Color::Indexed(16)), Some((0, 0, 0)));
        assert_eq!(to_rgb(Color::Indexed(231)), Some((255, 255, 255)));
        assert_eq!(to_rgb(Color::Indexed(232)), Some((8, 8, 8)));
        assert_eq!(to_rgb(Color::Indexed(255)), Some((238, 238, 238)));
    }

    #[test]
    fn test_css() {
        assert_eq!(to_css(Color::Rgb(18, 18, 18), Color::White), "#121212");
        assert_eq!(to_css(Color::Reset, Color::Black), "#000000");
    }

    #[test]
    fn test_blend() {
        let white = (255, 255, 255);
        let black = (0, 0, 0);
        assert_eq!(blend(white, black, 1.0), Color::Rgb(255, 255, 255));
        assert_eq!(blend(white, black, 0.0), Color::Rgb(0, 0, 0));
        assert_eq!(blend(white, black, 0.5), Color::Rgb(128, 128, 128));
        assert_eq!(blend(white, black, 7.0), Color::Rgb(255, 255, 255));
    }
}
