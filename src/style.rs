//! Style resolution for the raster backend.
//!
//! Chart settings are expressed the way users think about them: colors as
//! strings, font sizes and line widths in points, marker size as an area in
//! points squared. This module turns them into concrete `RGBColor`s and pixel
//! measures at a fixed 100 dpi.

use plotters::style::RGBColor;

/// Raster resolution in pixels per inch.
pub const DPI: f64 = 100.0;

/// Base figure size in inches (width is scaled by the aspect ratio).
pub const FIGURE_WIDTH_IN: f64 = 8.0;
pub const FIGURE_HEIGHT_IN: f64 = 6.0;

/// Convert a length in typographic points to pixels.
pub fn points_to_px(points: f64) -> f64 {
    points * DPI / 72.0
}

/// Convert a point length to a stroke width usable by the backend (never zero).
pub fn stroke_px(points: f64) -> u32 {
    points_to_px(points).round().max(1.0) as u32
}

/// Radius in pixels of a marker whose area is `size` square points.
pub fn marker_radius_px(size: f64) -> f64 {
    points_to_px(size.max(0.0).sqrt() / 2.0)
}

/// Output canvas size for an aspect ratio.
pub fn figure_size_px(aspect_ratio: f64) -> (u32, u32) {
    let width = (FIGURE_WIDTH_IN * aspect_ratio * DPI).round() as u32;
    let height = (FIGURE_HEIGHT_IN * DPI).round() as u32;
    (width, height)
}

/// Color names accepted in settings, besides hex codes and `grayNN`.
const NAMED_COLORS: &[(&str, RGBColor)] = &[
    ("black", RGBColor(0, 0, 0)),
    ("white", RGBColor(255, 255, 255)),
    ("lightblue", RGBColor(173, 216, 230)),
    ("blue", RGBColor(0, 0, 255)),
    ("red", RGBColor(255, 0, 0)),
    ("green", RGBColor(0, 128, 0)),
    ("orange", RGBColor(255, 165, 0)),
    ("gray", RGBColor(128, 128, 128)),
    ("grey", RGBColor(128, 128, 128)),
];

/// Resolve a color setting: `#RRGGBB`, `#RGB`, a name, or `gray0`..`gray100`.
pub fn parse_color(input: &str) -> Option<RGBColor> {
    let name = input.trim().to_ascii_lowercase();
    if let Some(hex) = name.strip_prefix('#') {
        return parse_hex_color(hex);
    }
    if let Some(&(_, rgb)) = NAMED_COLORS.iter().find(|(n, _)| *n == name) {
        return Some(rgb);
    }

    let level = name
        .strip_prefix("gray")
        .or_else(|| name.strip_prefix("grey"))?
        .parse::<u8>()
        .ok()
        .filter(|n| *n <= 100)?;
    let v = (f64::from(level) * 2.55).round() as u8;
    Some(RGBColor(v, v, v))
}

/// Hex digits without the leading `#`; each digit of the short form is doubled.
fn parse_hex_color(hex: &str) -> Option<RGBColor> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize, width: usize| -> Option<u8> {
        let v = u8::from_str_radix(&hex[i * width..(i + 1) * width], 16).ok()?;
        Some(if width == 1 { v * 17 } else { v })
    };
    let width = match hex.len() {
        6 => 2,
        3 => 1,
        _ => return None,
    };
    Some(RGBColor(channel(0, width)?, channel(1, width)?, channel(2, width)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_color("#ADD8E6"), Some(RGBColor(173, 216, 230)));
        assert_eq!(parse_color("#fff"), Some(RGBColor(255, 255, 255)));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
        assert_eq!(parse_color("#a1B2c3"), Some(RGBColor(0xa1, 0xb2, 0xc3)));
    }

    #[test]
    fn test_parse_named_color() {
        assert_eq!(parse_color("black"), Some(RGBColor(0, 0, 0)));
        assert_eq!(parse_color(" LightBlue "), Some(RGBColor(173, 216, 230)));
        assert_eq!(parse_color("chartreuse-ish"), None);
    }

    #[test]
    fn test_parse_gray_scale() {
        assert_eq!(parse_color("gray0"), Some(RGBColor(0, 0, 0)));
        assert_eq!(parse_color("grey100"), Some(RGBColor(255, 255, 255)));
        assert_eq!(parse_color("gray101"), None);
    }

    #[test]
    fn test_unit_conversions() {
        assert_eq!(stroke_px(1.0), 1);
        assert_eq!(stroke_px(0.1), 1);
        assert_eq!(stroke_px(3.6), 5);
        assert!((points_to_px(72.0) - 100.0).abs() < 1e-9);
        // 50 pt^2 marker: sqrt(50)/2 pt ~ 3.54 pt ~ 4.91 px
        assert!((marker_radius_px(50.0) - 4.910).abs() < 1e-3);
    }

    #[test]
    fn test_figure_size() {
        assert_eq!(figure_size_px(1.0), (800, 600));
        assert_eq!(figure_size_px(0.5), (400, 600));
        assert_eq!(figure_size_px(2.0), (1600, 600));
    }
}
