// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RGB color type with hex parsing.
//!
//! Conversions to and from HSV live in [`crate::convert`]; this type only
//! owns the channel values and their textual forms.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// RGB color with 8-bit channels (0-255).
///
/// # Examples
///
/// ```
/// use lifx_bridge::types::RgbColor;
///
/// let color = RgbColor::from_hex("#123456").unwrap();
/// assert_eq!(color.red(), 0x12);
/// assert_eq!(color.green(), 0x34);
/// assert_eq!(color.blue(), 0x56);
///
/// // Short form expands each digit
/// assert_eq!(RgbColor::from_hex("f80").unwrap(), RgbColor::new(255, 136, 0));
///
/// assert_eq!(color.to_hex(), "123456");
/// assert_eq!(color.to_hex_with_hash(), "#123456");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Returns `true` if `hex` is a 3- or 6-digit hex color, optionally
    /// prefixed with `#`.
    #[must_use]
    pub fn is_hex(hex: &str) -> bool {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        matches!(digits.len(), 3 | 6) && digits.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Parses an RGB color from a hex string.
    ///
    /// Accepts `#RRGGBB`, `RRGGBB`, `#RGB` and `RGB`, case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidHexColor` if the string does not match
    /// one of those forms. The input is never coerced.
    pub fn from_hex(hex: &str) -> Result<Self, ValueError> {
        if !Self::is_hex(hex) {
            return Err(ValueError::InvalidHexColor(hex.to_string()));
        }
        let digits: Vec<u8> = hex
            .strip_prefix('#')
            .unwrap_or(hex)
            .bytes()
            .filter_map(hex_value)
            .collect();

        match digits.as_slice() {
            [r, g, b] => Ok(Self::new(r * 17, g * 17, b * 17)),
            [r1, r2, g1, g2, b1, b2] => Ok(Self::new(
                r1 * 16 + r2,
                g1 * 16 + g2,
                b1 * 16 + b2,
            )),
            _ => Err(ValueError::InvalidHexColor(hex.to_string())),
        }
    }

    /// Returns the red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Returns the channels as floating point values.
    #[must_use]
    pub fn to_f64(&self) -> (f64, f64, f64) {
        (
            f64::from(self.red),
            f64::from(self.green),
            f64::from(self.blue),
        )
    }

    /// Returns the color as six uppercase hex digits without a prefix.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }

    /// Returns the color as a hex string with the hash prefix.
    #[must_use]
    pub fn to_hex_with_hash(&self) -> String {
        format!("#{}", self.to_hex())
    }

    /// Returns the channels as an array, in RGB order.
    #[must_use]
    pub const fn to_array(&self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_with_hash())
    }
}

impl FromStr for RgbColor {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<(u8, u8, u8)> for RgbColor {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

fn hex_value(byte: u8) -> Option<u8> {
    char::from(byte)
        .to_digit(16)
        .and_then(|d| u8::try_from(d).ok())
}
