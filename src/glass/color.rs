use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("expected #RRGGBB color, got {value:?}")]
    InvalidHex { value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self::new(0xFF, 0xFF, 0xFF);
    pub const BLACK: Self = Self::new(0x00, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Channels scaled to `0.0..=1.0` for cairo.
    pub fn unit(self) -> (f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        )
    }
}

/// Decodes `#RRGGBB` by reading the three fixed-width hex pairs.
pub fn hex_to_rgb(value: &str) -> Result<Rgb, ColorError> {
    let invalid = || ColorError::InvalidHex {
        value: value.to_string(),
    };
    let digits = value.strip_prefix('#').ok_or_else(invalid)?;
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(invalid());
    }

    let pair = |index: usize| u8::from_str_radix(&digits[index..index + 2], 16);
    match (pair(0), pair(2), pair(4)) {
        (Ok(r), Ok(g), Ok(b)) => Ok(Rgb::new(r, g, b)),
        _ => Err(invalid()),
    }
}

pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// A validated `#rrggbb` color as stored in settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor(Rgb);

impl HexColor {
    pub const fn from_rgb(rgb: Rgb) -> Self {
        Self(rgb)
    }

    pub const fn rgb(self) -> Rgb {
        self.0
    }
}

impl FromStr for HexColor {
    type Err = ColorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        hex_to_rgb(value.trim()).map(Self)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&rgb_to_hex(self.0.r, self.0.g, self.0.b))
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_to_rgb_decodes_each_pair() {
        assert_eq!(hex_to_rgb("#ff8000").unwrap(), Rgb::new(255, 128, 0));
        assert_eq!(hex_to_rgb("#0A0b0C").unwrap(), Rgb::new(10, 11, 12));
    }

    #[test]
    fn hex_round_trip_preserves_channels() {
        for (r, g, b) in [(0, 0, 0), (255, 255, 255), (1, 128, 254), (17, 34, 51)] {
            let hex = rgb_to_hex(r, g, b);
            assert_eq!(hex_to_rgb(&hex).unwrap().rgb(), (r, g, b));
        }
    }

    #[test]
    fn hex_to_rgb_rejects_malformed_values() {
        for value in ["ffffff", "#fff", "#ggffff", "#ffffff00", "#ééé", ""] {
            assert!(hex_to_rgb(value).is_err(), "{value} should be rejected");
        }
    }

    #[test]
    fn hex_color_serializes_as_lowercase_string() {
        let color: HexColor = "#AABBCC".parse().unwrap();
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"#aabbcc\"");

        let parsed: HexColor = serde_json::from_str("\"#123456\"").unwrap();
        assert_eq!(parsed.rgb(), Rgb::new(0x12, 0x34, 0x56));
        assert!(serde_json::from_str::<HexColor>("\"red\"").is_err());
    }
}
