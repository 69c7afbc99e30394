// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color model conversions.
//!
//! Pure functions between hex, RGB, HSV and color temperature. Color space
//! math goes through [`palette`]. The functions hold no state and never
//! fail: any non-finite input produces [`FALLBACK_RGB`] (dark gray) instead
//! of a panic or an error, so a bad reading can never break reconciliation.
//!
//! Conversions work on `f64` triples. Callers pick the rounding policy:
//! [`round_rgb`] for derived values that are stored, [`floor_rgb`] for
//! values that are only displayed.
//!
//! # Examples
//!
//! ```
//! use lifx_bridge::convert;
//!
//! let rgb = convert::hex_to_rgb("#123456").unwrap();
//! let [h, s, v] = convert::rgb_to_hsv(rgb.to_f64().into());
//! assert_eq!((h.round(), s.round(), v.round()), (210.0, 79.0, 34.0));
//! ```

mod keyword;

pub use keyword::nearest_keyword;

use palette::{FromColor, Hsv, Srgb, encoding};

use crate::error::ValueError;
use crate::types::RgbColor;

type SrgbHsv = Hsv<encoding::Srgb, f64>;

/// Color returned when a conversion receives non-finite input.
pub const FALLBACK_RGB: RgbColor = RgbColor::new(0x40, 0x40, 0x40);

/// Converts HSV (hue in degrees, saturation and value in percent) to RGB
/// channels in `0.0..=255.0`.
///
/// Hue is taken modulo 360; saturation and value are clamped to `0..=100`.
#[must_use]
pub fn hsv_to_rgb(hsv: [f64; 3]) -> [f64; 3] {
    if !all_finite(&hsv) {
        return fallback_rgb();
    }
    let [hue, saturation, value] = hsv;
    let hsv = SrgbHsv::new(
        hue.rem_euclid(360.0),
        saturation.clamp(0.0, 100.0) / 100.0,
        value.clamp(0.0, 100.0) / 100.0,
    );
    let (red, green, blue) = Srgb::<f64>::from_color(hsv).into_components();
    [red, green, blue].map(|c| (c * 255.0).clamp(0.0, 255.0))
}

/// Converts RGB channels to HSV (hue in `[0, 360)`, saturation and value in
/// percent).
///
/// Channels are clamped to `0..=255` first.
#[must_use]
pub fn rgb_to_hsv(rgb: [f64; 3]) -> [f64; 3] {
    let rgb = if all_finite(&rgb) { rgb } else { fallback_rgb() };
    let [red, green, blue] = rgb.map(|c| c.clamp(0.0, 255.0) / 255.0);

    let hsv = SrgbHsv::from_color(Srgb::new(red, green, blue));
    [
        hsv.hue.into_positive_degrees().rem_euclid(360.0),
        hsv.saturation * 100.0,
        hsv.value * 100.0,
    ]
}

/// Parses a 3- or 6-digit hex color, with or without `#`.
///
/// # Errors
///
/// Returns `ValueError::InvalidHexColor` for anything else; the input is
/// never coerced into a color.
pub fn hex_to_rgb(hex: &str) -> Result<RgbColor, ValueError> {
    RgbColor::from_hex(hex)
}

/// Formats RGB channels as six uppercase hex digits without `#`.
///
/// Channels are floored.
#[must_use]
pub fn rgb_to_hex(rgb: [f64; 3]) -> String {
    floor_rgb(rgb).to_hex()
}

/// Approximates the RGB appearance of a black-body color temperature.
///
/// Uses the Tanner Helland curve fit; the result is clamped to
/// `0.0..=255.0` per channel.
#[must_use]
pub fn kelvin_to_rgb(kelvin: f64) -> [f64; 3] {
    if !kelvin.is_finite() {
        return fallback_rgb();
    }
    let temp = kelvin / 100.0;

    let red = if temp <= 66.0 {
        255.0
    } else {
        329.698_727_446 * (temp - 60.0).powf(-0.133_204_759_2)
    };

    let green = if temp <= 66.0 {
        99.470_802_586_1 * temp.ln() - 161.119_568_166_1
    } else {
        288.122_169_528_3 * (temp - 60.0).powf(-0.075_514_849_2)
    };

    let blue = if temp >= 66.0 {
        255.0
    } else if temp <= 19.0 {
        0.0
    } else {
        138.517_731_223_1 * (temp - 10.0).ln() - 305.044_792_730_7
    };

    let rgb = [red, green, blue];
    if all_finite(&rgb) {
        rgb.map(|c| c.clamp(0.0, 255.0))
    } else {
        fallback_rgb()
    }
}

/// Rounds RGB channels into an [`RgbColor`].
#[must_use]
pub fn round_rgb(rgb: [f64; 3]) -> RgbColor {
    to_rgb_color(rgb, f64::round)
}

/// Floors RGB channels into an [`RgbColor`].
#[must_use]
pub fn floor_rgb(rgb: [f64; 3]) -> RgbColor {
    to_rgb_color(rgb, f64::floor)
}

fn to_rgb_color(rgb: [f64; 3], policy: fn(f64) -> f64) -> RgbColor {
    if !all_finite(&rgb) {
        return FALLBACK_RGB;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let [r, g, b] = rgb.map(|c| policy(c.clamp(0.0, 255.0)) as u8);
    RgbColor::new(r, g, b)
}

fn fallback_rgb() -> [f64; 3] {
    let (r, g, b) = FALLBACK_RGB.to_f64();
    [r, g, b]
}

fn all_finite(values: &[f64; 3]) -> bool {
    values.iter().all(|v| v.is_finite())
}
