// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color types for light state.
//!
//! This module provides the HSV color and color temperature types stored in
//! [`LightState`](crate::state::LightState). Both clamp on construction so a
//! stored value is always inside its valid range.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Color temperature in Kelvin (2000-10000).
///
/// Mired (also called mirek) is the reciprocal unit:
/// `kelvin = 1_000_000 / mired`.
///
/// # Examples
///
/// ```
/// use lifx_bridge::types::Kelvin;
///
/// let warm = Kelvin::clamped(3000.0);
/// assert_eq!(warm.value(), 3000);
///
/// // Same temperature expressed in mired
/// assert_eq!(Kelvin::from_mired(1_000_000.0 / 3000.0).value(), 3000);
///
/// // Out of range values are clamped
/// assert_eq!(Kelvin::clamped(50_000.0).value(), Kelvin::MAX);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kelvin(u16);

impl Kelvin {
    /// Warmest supported temperature.
    pub const MIN: u16 = 2000;

    /// Coolest supported temperature.
    pub const MAX: u16 = 10000;

    /// Lowest accepted mired value (10000 K).
    pub const MIN_MIRED: f64 = 100.0;

    /// Highest accepted mired value (2000 K).
    pub const MAX_MIRED: f64 = 500.0;

    /// Neutral white used when a device never reported a temperature.
    pub const NEUTRAL: Self = Self(3500);

    /// Creates a temperature from a Kelvin value, clamping and rounding it.
    ///
    /// Non-finite input maps to the warm end of the range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn clamped(kelvin: f64) -> Self {
        let value = clamp_f64(kelvin, f64::from(Self::MIN), f64::from(Self::MAX));
        Self(value.round() as u16)
    }

    /// Creates a temperature from a mired value.
    ///
    /// The mired value is clamped to 100-500 before conversion.
    #[must_use]
    pub fn from_mired(mired: f64) -> Self {
        let mired = clamp_f64(mired, Self::MIN_MIRED, Self::MAX_MIRED);
        Self::clamped(1_000_000.0 / mired)
    }

    /// Returns the temperature in Kelvin.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }

    /// Returns the temperature in mired, floored.
    #[must_use]
    pub fn to_mired(&self) -> u16 {
        #[allow(clippy::cast_possible_truncation)]
        let mired = (1_000_000 / u32::from(self.0)) as u16;
        mired
    }
}

impl Default for Kelvin {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for Kelvin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}K", self.0)
    }
}

/// HSV color (Hue, Saturation, Value) where value is the light brightness.
///
/// Hue is kept in `[0, 360)`; 360 wraps to 0. Saturation and brightness are
/// percentages.
///
/// # Examples
///
/// ```
/// use lifx_bridge::types::HsvColor;
///
/// let color = HsvColor::clamped(210.0, 79.0, 34.0);
/// assert_eq!(color.hue(), 210);
/// assert_eq!(color.saturation(), 79);
/// assert_eq!(color.brightness(), 34);
///
/// // Saturation above 100 is clamped
/// assert_eq!(HsvColor::clamped(0.0, 150.0, 10.0).saturation(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HsvColor {
    hue: u16,
    saturation: u8,
    brightness: u8,
}

impl HsvColor {
    /// Hue wraps at this value.
    pub const HUE_RANGE: u16 = 360;

    /// Maximum saturation value.
    pub const MAX_SATURATION: u8 = 100;

    /// Maximum brightness value.
    pub const MAX_BRIGHTNESS: u8 = 100;

    /// Creates a color from floating point components, clamping and rounding.
    #[must_use]
    pub fn clamped(hue: f64, saturation: f64, brightness: f64) -> Self {
        Self {
            hue: clamp_hue(hue),
            saturation: clamp_percent(saturation),
            brightness: clamp_percent(brightness),
        }
    }

    /// Returns the hue in degrees.
    #[must_use]
    pub const fn hue(&self) -> u16 {
        self.hue
    }

    /// Returns the saturation percentage.
    #[must_use]
    pub const fn saturation(&self) -> u8 {
        self.saturation
    }

    /// Returns the brightness percentage.
    #[must_use]
    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Returns the components as floating point values.
    #[must_use]
    pub fn to_f64(&self) -> (f64, f64, f64) {
        (
            f64::from(self.hue),
            f64::from(self.saturation),
            f64::from(self.brightness),
        )
    }
}

impl fmt::Display for HsvColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.hue, self.saturation, self.brightness)
    }
}

/// Clamps `value` into `[min, max]`; NaN maps to `min`.
pub(crate) fn clamp_f64(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}

/// Clamps and rounds a percentage into `0..=100`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn clamp_percent(value: f64) -> u8 {
    clamp_f64(value, 0.0, 100.0).round() as u8
}

/// Clamps a hue into `[0, 360]`, rounds it, and wraps 360 to 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn clamp_hue(value: f64) -> u16 {
    let hue = clamp_f64(value, 0.0, f64::from(HsvColor::HUE_RANGE)).round() as u16;
    hue % HsvColor::HUE_RANGE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kelvin_clamps_to_range() {
        assert_eq!(Kelvin::clamped(1000.0).value(), Kelvin::MIN);
        assert_eq!(Kelvin::clamped(12_000.0).value(), Kelvin::MAX);
        assert_eq!(Kelvin::clamped(f64::NAN).value(), Kelvin::MIN);
        assert_eq!(Kelvin::clamped(4000.4).value(), 4000);
    }

    #[test]
    fn kelvin_from_mired_matches_reciprocal() {
        assert_eq!(Kelvin::from_mired(1_000_000.0 / 3000.0).value(), 3000);
        assert_eq!(Kelvin::from_mired(250.0).value(), 4000);
    }

    #[test]
    fn kelvin_from_mired_clamps_mired_first() {
        // 50 mired would be 20000 K; clamped to 100 mired first
        assert_eq!(Kelvin::from_mired(50.0).value(), 10000);
        assert_eq!(Kelvin::from_mired(900.0).value(), 2000);
    }

    #[test]
    fn kelvin_to_mired_floors() {
        assert_eq!(Kelvin::clamped(3000.0).to_mired(), 333);
        assert_eq!(Kelvin::clamped(4000.0).to_mired(), 250);
    }

    #[test]
    fn kelvin_display() {
        assert_eq!(Kelvin::clamped(2700.0).to_string(), "2700K");
    }

    #[test]
    fn hsv_clamps_components() {
        let color = HsvColor::clamped(-20.0, 150.0, 101.0);
        assert_eq!(color.hue(), 0);
        assert_eq!(color.saturation(), 100);
        assert_eq!(color.brightness(), 100);
    }

    #[test]
    fn hsv_hue_wraps_at_360() {
        assert_eq!(HsvColor::clamped(360.0, 0.0, 0.0).hue(), 0);
        assert_eq!(HsvColor::clamped(359.6, 0.0, 0.0).hue(), 0);
        assert_eq!(HsvColor::clamped(359.4, 0.0, 0.0).hue(), 359);
    }

    #[test]
    fn hsv_nan_maps_to_minimum() {
        let color = HsvColor::clamped(f64::NAN, f64::NAN, f64::NAN);
        assert_eq!(color, HsvColor::default());
    }

    #[test]
    fn hsv_display() {
        assert_eq!(HsvColor::clamped(210.0, 79.0, 34.0).to_string(), "210,79,34");
    }
}
