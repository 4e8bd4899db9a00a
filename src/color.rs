//! Color resolution
//!
//! Turns the loosely typed color values a plot model carries (hex strings,
//! named colors, single-letter codes, gray levels, cycle references and
//! RGB(A) float tuples) into concrete `RGBColor`s and their hex form.

use plotters::style::RGBColor;
use serde::Deserialize;

/// A color as supplied by the plot model
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Named(String),
    Rgb([f64; 3]),
    Rgba([f64; 4]),
}

/// Default property cycle, referenced as `C0`..`C9`
const CYCLE: [RGBColor; 10] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

impl ColorValue {
    /// Resolve to an RGB color; `None` when the value is not understood
    pub fn resolve(&self) -> Option<RGBColor> {
        match self {
            ColorValue::Named(s) => parse_color(s),
            ColorValue::Rgb([r, g, b]) | ColorValue::Rgba([r, g, b, _]) => {
                Some(RGBColor(unit_to_u8(*r)?, unit_to_u8(*g)?, unit_to_u8(*b)?))
            }
        }
    }

    /// Alpha channel carried by the value itself, if any
    pub fn alpha(&self) -> Option<f64> {
        match self {
            ColorValue::Rgba([_, _, _, a]) => Some(*a),
            _ => None,
        }
    }
}

fn unit_to_u8(v: f64) -> Option<u8> {
    if !(0.0..=1.0).contains(&v) {
        return None;
    }
    Some((v * 255.0).round() as u8)
}

/// Parse a color string into RGBColor
pub fn parse_color(color_str: &str) -> Option<RGBColor> {
    let color_str = color_str.trim();

    if color_str.starts_with('#') {
        return parse_hex_color(color_str);
    }

    // Gray level given as a float string, "0" = black .. "1" = white
    if let Ok(level) = color_str.parse::<f64>() {
        let v = unit_to_u8(level)?;
        return Some(RGBColor(v, v, v));
    }

    match color_str {
        "b" => return Some(RGBColor(0, 0, 255)),
        "g" => return Some(RGBColor(0, 128, 0)),
        "r" => return Some(RGBColor(255, 0, 0)),
        "c" => return Some(RGBColor(0, 191, 191)),
        "m" => return Some(RGBColor(191, 0, 191)),
        "y" => return Some(RGBColor(191, 191, 0)),
        "k" => return Some(RGBColor(0, 0, 0)),
        "w" => return Some(RGBColor(255, 255, 255)),
        _ => {}
    }

    if let Some(Ok(i)) = color_str.strip_prefix('C').map(str::parse::<usize>) {
        return Some(CYCLE[i % CYCLE.len()]);
    }

    match color_str.to_lowercase().as_str() {
        "white" => Some(RGBColor(255, 255, 255)),
        "black" => Some(RGBColor(0, 0, 0)),
        "red" => Some(RGBColor(255, 0, 0)),
        "green" => Some(RGBColor(0, 128, 0)),
        "blue" => Some(RGBColor(0, 0, 255)),
        "yellow" => Some(RGBColor(255, 255, 0)),
        "cyan" => Some(RGBColor(0, 255, 255)),
        "magenta" => Some(RGBColor(255, 0, 255)),
        "orange" => Some(RGBColor(255, 165, 0)),
        "purple" => Some(RGBColor(128, 0, 128)),
        "pink" => Some(RGBColor(255, 192, 203)),
        "brown" => Some(RGBColor(165, 42, 42)),
        "gray" | "grey" => Some(RGBColor(128, 128, 128)),
        "darkgray" | "darkgrey" => Some(RGBColor(169, 169, 169)),
        "lightgray" | "lightgrey" => Some(RGBColor(211, 211, 211)),
        _ => None,
    }
}

/// Parse hex color (#RRGGBB, #RRGGBBAA or #RGB); alpha digits are ignored
fn parse_hex_color(hex: &str) -> Option<RGBColor> {
    let hex = hex.trim_start_matches('#');
    // Slicing below is by byte; only ASCII hex digits keep that on char boundaries
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 | 8 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(RGBColor(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(RGBColor(r, g, b))
        }
        _ => None,
    }
}

/// Lowercase `#rrggbb` form
pub fn to_hex(color: RGBColor) -> String {
    format!("#{:02x}{:02x}{:02x}", color.0, color.1, color.2)
}

/// Resolve an optional model color to hex.
///
/// `Err(fallback)` when the value is absent or cannot be resolved; callers
/// report only the second case.
pub fn hex_or(value: Option<&ColorValue>, fallback: &str) -> Result<String, String> {
    match value.map(|v| v.resolve()) {
        Some(Some(c)) => Ok(to_hex(c)),
        _ => Err(fallback.to_string()),
    }
}
