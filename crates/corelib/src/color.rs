//! RGB color stored in linear space.
//!
//! Hex values and CSS-style strings are interpreted as sRGB and converted on
//! the way in, so `Color::from_hex(0x8b4513).to_hex() == 0x8b4513`.

use std::{fmt, str::FromStr};

use crate::CoreError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

pub const BLACK: Color = Color::linear(0.0, 0.0, 0.0);
pub const WHITE: Color = Color::linear(1.0, 1.0, 1.0);

impl Color {
    /// Build from linear components.
    pub const fn linear(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed sRGB value `0xRRGGBB`.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
        Self {
            r: channel(16),
            g: channel(8),
            b: channel(0),
        }
    }

    /// Packed sRGB value `0xRRGGBB`.
    pub fn to_hex(&self) -> u32 {
        let channel = |c: f32| (linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    #[inline]
    pub fn scaled(&self, k: f32) -> Self {
        Self::linear(self.r * k, self.g * k, self.b * k)
    }
}

impl Default for Color {
    fn default() -> Self {
        WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

impl FromStr for Color {
    type Err = CoreError;

    /// Accepts `#rrggbb`, `#rgb`, `0xrrggbb`, `rrggbb` and a handful of CSS names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let lower = raw.to_ascii_lowercase();
        if let Some(hex) = named(&lower) {
            return Ok(Self::from_hex(hex));
        }

        let digits = lower
            .strip_prefix('#')
            .or_else(|| lower.strip_prefix("0x"))
            .unwrap_or(&lower);

        let invalid = || CoreError::InvalidColor(raw.to_string());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match digits.len() {
            6 => u32::from_str_radix(digits, 16)
                .map(Self::from_hex)
                .map_err(|_| invalid()),
            3 => {
                // #rgb -> #rrggbb
                let expanded: String = digits.chars().flat_map(|c| [c, c]).collect();
                u32::from_str_radix(&expanded, 16)
                    .map(Self::from_hex)
                    .map_err(|_| invalid())
            }
            _ => Err(invalid()),
        }
    }
}

fn named(name: &str) -> Option<u32> {
    let hex = match name {
        "black" => 0x000000,
        "white" => 0xffffff,
        "red" => 0xff0000,
        "green" => 0x008000,
        "blue" => 0x0000ff,
        "brown" => 0xa52a2a,
        "tan" => 0xd2b48c,
        "navy" => 0x000080,
        "gray" | "grey" => 0x808080,
        _ => return None,
    };
    Some(hex)
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}
