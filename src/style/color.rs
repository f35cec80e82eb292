//! Color values for preset styles
//!
//! Preset styles specify colors as CSS-style strings: hex (`#rgb`, `#rgba`,
//! `#rrggbb`, `#rrggbbaa`), functional (`rgb(...)`, `rgba(...)`) or a named
//! color. This module provides the `Rgba` value type and its parser.
//!
//! # Examples
//!
//! ```
//! use textrender::style::Rgba;
//!
//! let fill = Rgba::parse("#FFD93D").unwrap();
//! let shadow = Rgba::parse("rgba(59, 59, 59, 1)").unwrap();
//! let stroke = Rgba::parse("red").unwrap();
//! assert_eq!(stroke, Rgba::RED);
//! ```

use std::fmt;

/// RGBA color representation
///
/// - R, G, B: 0-255 (stored as u8)
/// - A: 0.0-1.0 (stored as f32, where 0.0 is fully transparent, 1.0 is fully opaque)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
    /// Alpha component (0.0-1.0)
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0.0,
    };

    /// Opaque black
    pub const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 1.0,
    };

    /// Opaque white
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
        a: 1.0,
    };

    /// Opaque red
    pub const RED: Self = Self {
        r: 255,
        g: 0,
        b: 0,
        a: 1.0,
    };

    /// Creates a new RGBA color
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque RGB color (alpha = 1.0)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Returns true if the color is fully transparent
    pub fn is_transparent(self) -> bool {
        self.a == 0.0
    }

    /// Returns a new color with the given alpha value
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            r: self.r,
            g: self.g,
            b: self.b,
            a: alpha.clamp(0.0, 1.0),
        }
    }

    /// Alpha as a 0-255 byte, for rasterizer paints
    pub fn alpha_u8(self) -> u8 {
        (self.a * 255.0).round().clamp(0.0, 255.0) as u8
    }

    /// Parses a color from a CSS-style string
    ///
    /// Accepts hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`), `rgb(r, g, b)`,
    /// `rgba(r, g, b, a)` and named colors.
    ///
    /// # Errors
    ///
    /// Returns `ColorParseError` describing the offending input.
    pub fn parse(s: &str) -> std::result::Result<Self, ColorParseError> {
        let s = s.trim();

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(s, hex);
        }

        let lower = s.to_ascii_lowercase();
        if lower.starts_with("rgba(") || lower.starts_with("rgb(") {
            return parse_rgb_function(s, &lower);
        }

        named_color(&lower).ok_or_else(|| ColorParseError::InvalidFormat(s.to_string()))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 1.0 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Errors from color string parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// The string matches no supported color syntax
    InvalidFormat(String),
    /// Hex digits missing or malformed
    InvalidHex(String),
    /// A numeric component could not be parsed
    InvalidComponent(String),
    /// A component is outside its allowed range
    OutOfRange(String),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorParseError::InvalidFormat(s) => write!(f, "Invalid color format: {}", s),
            ColorParseError::InvalidHex(s) => write!(f, "Invalid hex color: {}", s),
            ColorParseError::InvalidComponent(s) => write!(f, "Invalid color component: {}", s),
            ColorParseError::OutOfRange(s) => write!(f, "Color component out of range: {}", s),
        }
    }
}

impl std::error::Error for ColorParseError {}

fn parse_hex(original: &str, hex: &str) -> std::result::Result<Rgba, ColorParseError> {
    // The byte-indexed slicing below is only valid on ASCII hex digits;
    // anything else (including multi-byte UTF-8) is rejected here.
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorParseError::InvalidHex(original.to_string()));
    }

    let digit = |range: std::ops::Range<usize>| -> std::result::Result<u8, ColorParseError> {
        u8::from_str_radix(&hex[range], 16).map_err(|_| ColorParseError::InvalidHex(original.to_string()))
    };
    let short_digit = |idx: usize| -> std::result::Result<u8, ColorParseError> {
        let d = u8::from_str_radix(&hex[idx..idx + 1], 16)
            .map_err(|_| ColorParseError::InvalidHex(original.to_string()))?;
        Ok(d * 17) // expand "f" to "ff"
    };

    match hex.len() {
        3 => Ok(Rgba::rgb(short_digit(0)?, short_digit(1)?, short_digit(2)?)),
        4 => Ok(Rgba::new(
            short_digit(0)?,
            short_digit(1)?,
            short_digit(2)?,
            short_digit(3)? as f32 / 255.0,
        )),
        6 => Ok(Rgba::rgb(digit(0..2)?, digit(2..4)?, digit(4..6)?)),
        8 => Ok(Rgba::new(
            digit(0..2)?,
            digit(2..4)?,
            digit(4..6)?,
            digit(6..8)? as f32 / 255.0,
        )),
        _ => Err(ColorParseError::InvalidHex(original.to_string())),
    }
}

fn parse_rgb_function(original: &str, lower: &str) -> std::result::Result<Rgba, ColorParseError> {
    let has_alpha = lower.starts_with("rgba(");
    let open = lower.find('(').ok_or_else(|| ColorParseError::InvalidFormat(original.to_string()))?;
    let close = lower
        .rfind(')')
        .ok_or_else(|| ColorParseError::InvalidFormat(original.to_string()))?;
    if close <= open {
        return Err(ColorParseError::InvalidFormat(original.to_string()));
    }

    let parts: Vec<&str> = original[open + 1..close].split(',').map(str::trim).collect();
    let expected = if has_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return Err(ColorParseError::InvalidFormat(original.to_string()));
    }

    let channel = |part: &str| -> std::result::Result<u8, ColorParseError> {
        let value: f32 = part
            .parse()
            .map_err(|_| ColorParseError::InvalidComponent(part.to_string()))?;
        if !(0.0..=255.0).contains(&value) {
            return Err(ColorParseError::OutOfRange(part.to_string()));
        }
        Ok(value.round() as u8)
    };

    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;

    let a = if has_alpha {
        let value: f32 = parts[3]
            .parse()
            .map_err(|_| ColorParseError::InvalidComponent(parts[3].to_string()))?;
        if !(0.0..=1.0).contains(&value) {
            return Err(ColorParseError::OutOfRange(parts[3].to_string()));
        }
        value
    } else {
        1.0
    };

    Ok(Rgba::new(r, g, b, a))
}

/// CSS basic named colors, plus `transparent`
///
/// The catalog only uses a handful of these, but the basic set is cheap to
/// carry and matches what preset authors expect to work.
fn named_color(name: &str) -> Option<Rgba> {
    let color = match name {
        "black" => Rgba::rgb(0, 0, 0),
        "silver" => Rgba::rgb(192, 192, 192),
        "gray" | "grey" => Rgba::rgb(128, 128, 128),
        "white" => Rgba::rgb(255, 255, 255),
        "maroon" => Rgba::rgb(128, 0, 0),
        "red" => Rgba::rgb(255, 0, 0),
        "purple" => Rgba::rgb(128, 0, 128),
        "fuchsia" | "magenta" => Rgba::rgb(255, 0, 255),
        "green" => Rgba::rgb(0, 128, 0),
        "lime" => Rgba::rgb(0, 255, 0),
        "olive" => Rgba::rgb(128, 128, 0),
        "yellow" => Rgba::rgb(255, 255, 0),
        "navy" => Rgba::rgb(0, 0, 128),
        "blue" => Rgba::rgb(0, 0, 255),
        "teal" => Rgba::rgb(0, 128, 128),
        "aqua" | "cyan" => Rgba::rgb(0, 255, 255),
        "orange" => Rgba::rgb(255, 165, 0),
        "transparent" => Rgba::TRANSPARENT,
        _ => return None,
    };
    Some(color)
}
