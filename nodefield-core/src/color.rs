//! Colors used by the field renderers
//!
//! Colors are plain 8-bit RGB triples with an optional alpha. Configuration
//! carries them as hex strings (`#4B4B9E`), surfaces consume them as CSS
//! color strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Palette constants shared by both field variants
pub mod palette {
    use super::Rgb;

    /// Brand indigo (#4B4B9E), used for high pressure, glow and flow dots
    pub const PRIMARY: Rgb = Rgb::new(75, 75, 158);

    /// Slate (#64748B), the low pressure node color
    pub const SECONDARY: Rgb = Rgb::new(100, 116, 139);

    /// Light slate (#94A3B8), used for rings and idle connections
    pub const SLATE: Rgb = Rgb::new(148, 163, 184);

    /// Outline of valve hexagons
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
}

/// Error returned when a hex color string cannot be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid hex color: {0:?}")]
pub struct ParseColorError(pub String);

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a six digit hex color, with or without the leading `#`
    pub fn from_hex(hex: &str) -> Result<Self, ParseColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ParseColorError(hex.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ParseColorError(hex.to_string()))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Parse a hex color, falling back to black when it is malformed
    pub fn from_hex_lossy(hex: &str) -> Self {
        Self::from_hex(hex).unwrap_or_else(|err| {
            tracing::warn!(%err, "falling back to black");
            Self::BLACK
        })
    }

    /// Linear interpolation per channel, rounded to the nearest integer
    ///
    /// `factor` 0.0 yields `self`, 1.0 yields `other`.
    pub fn lerp(self, other: Rgb, factor: f64) -> Rgb {
        let mix = |a: u8, b: u8| {
            let value = a as f64 + (b as f64 - a as f64) * factor;
            value.round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Attach an alpha channel
    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba { rgb: self, alpha }
    }

    /// `#rrggbb` form
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Ok(Self::from_hex_lossy(&hex))
    }
}

/// A color with an alpha channel in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f64,
}

impl Rgba {
    /// Fully transparent: nothing would show up on the surface
    pub fn is_transparent(&self) -> bool {
        self.alpha <= 0.0
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.rgb.r, self.rgb.g, self.rgb.b, self.alpha
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(Rgb::from_hex("#4B4B9E").unwrap(), palette::PRIMARY);
        assert_eq!(Rgb::from_hex("64748b").unwrap(), palette::SECONDARY);
    }

    #[test]
    fn rejects_short_or_invalid_hex() {
        assert!(Rgb::from_hex("#fff").is_err());
        assert!(Rgb::from_hex("#zzzzzz").is_err());
        assert!(Rgb::from_hex("").is_err());
    }

    #[test]
    fn lossy_parse_degrades_to_black() {
        assert_eq!(Rgb::from_hex_lossy("not a color"), Rgb::BLACK);
    }

    #[test]
    fn lerp_endpoints_match_inputs() {
        let low = palette::SECONDARY;
        let high = palette::PRIMARY;
        assert_eq!(low.lerp(high, 0.0), low);
        assert_eq!(low.lerp(high, 1.0), high);
    }

    #[test]
    fn lerp_rounds_midpoint() {
        let mixed = Rgb::new(0, 0, 0).lerp(Rgb::new(255, 100, 1), 0.5);
        assert_eq!(mixed, Rgb::new(128, 50, 1));
    }

    #[test]
    fn css_formatting() {
        assert_eq!(palette::SLATE.to_string(), "rgb(148, 163, 184)");
        assert_eq!(
            palette::PRIMARY.with_alpha(0.5).to_string(),
            "rgba(75, 75, 158, 0.5)"
        );
        assert_eq!(palette::PRIMARY.to_hex(), "#4b4b9e");
    }

    #[test]
    fn deserializes_from_hex_string() {
        let color: Rgb = serde_json::from_str("\"#94a3b8\"").unwrap();
        assert_eq!(color, palette::SLATE);
    }
}
