use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

/// RGBA color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ByteColor4 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ByteColor4 {
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Formats the color as `rrggbbaa` in lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl From<[f32; 4]> for ByteColor4 {
    fn from(value: [f32; 4]) -> Self {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(channel(value[0]), channel(value[1]), channel(value[2]), channel(value[3]))
    }
}

impl fmt::Display for ByteColor4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseColorError {
    #[error("Expected 8 hex digits but got '{0}'")]
    InvalidLength(String),
    #[error("Invalid hex digit: {0}")]
    InvalidDigit(#[from] ParseIntError),
}

impl FromStr for ByteColor4 {
    type Err = ParseColorError;

    /// Parses `rrggbbaa`. A leading `#` is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 8 || !hex.is_ascii() {
            return Err(ParseColorError::InvalidLength(s.to_owned()));
        }
        let channel = |index: usize| u8::from_str_radix(&hex[index * 2..index * 2 + 2], 16);
        Ok(Self::new(channel(0)?, channel(1)?, channel(2)?, channel(3)?))
    }
}
