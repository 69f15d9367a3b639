//! Color parsing for QR rendering.
//!
//! Accepts `#rgb` / `#rrggbb` hex, a small set of CSS color names, and
//! `transparent` (alpha zero).

use thiserror::Error;

/// RGBA color, 8 bits per channel.
pub type Rgba = [u8; 4];

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid color '{0}'")]
pub struct InvalidColor(pub String);

const NAMED_COLORS: &[(&str, Rgba)] = &[
    ("black", [0, 0, 0, 255]),
    ("white", [255, 255, 255, 255]),
    ("red", [255, 0, 0, 255]),
    ("green", [0, 128, 0, 255]),
    ("blue", [0, 0, 255, 255]),
    ("yellow", [255, 255, 0, 255]),
    ("orange", [255, 165, 0, 255]),
    ("purple", [128, 0, 128, 255]),
    ("gray", [128, 128, 128, 255]),
    ("grey", [128, 128, 128, 255]),
];

/// Parses a color value into RGBA.
///
/// # Errors
///
/// Returns [`InvalidColor`] for unknown names or malformed hex strings.
pub fn parse_color(value: &str) -> Result<Rgba, InvalidColor> {
    let value = value.trim();
    let lower = value.to_lowercase();

    if lower == "transparent" {
        return Ok([0, 0, 0, 0]);
    }

    if let Some(&(_, rgba)) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
        return Ok(rgba);
    }

    if let Some(hex) = lower.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| InvalidColor(value.to_string()));
    }

    Err(InvalidColor(value.to_string()))
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    match hex.len() {
        3 => {
            let mut out = [0u8, 0, 0, 255];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                out[i] = v * 16 + v;
            }
            Some(out)
        }
        6 => {
            let mut out = [0u8, 0, 0, 255];
            for i in 0..3 {
                out[i] = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
            }
            Some(out)
        }
        _ => None,
    }
}

/// Returns whether a value would parse as a color. Used for DTO validation.
pub fn is_valid_color(value: &str) -> bool {
    parse_color(value).is_ok()
}
