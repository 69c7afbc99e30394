// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Resolution of loosely-typed payloads into a [`LightDelta`].

use serde_json::Value;
use thiserror::Error;

use crate::capabilities::CapabilitySet;
use crate::convert::{hsv_to_rgb, rgb_to_hsv};
use crate::state::LightState;
use crate::types::{HsvColor, Kelvin, clamp_f64, clamp_percent};

use super::input::Payload;

const RGB_KEYS: [&str; 3] = ["red", "green", "blue"];
const SATURATION_KEYS: [&str; 2] = ["sat", "saturation"];
const MIRED_KEYS: [&str; 3] = ["ct", "mirek", "mired"];
const BRIGHTNESS_KEYS: [&str; 2] = ["bri", "brightness"];

/// Normalized change requested by a command.
///
/// Every value is already clamped into its valid range and filtered by the
/// light's capabilities: a light without color never gets a hue or
/// saturation, a light without infrared never gets `max_ir`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LightDelta {
    /// New power state, with toggle already resolved.
    pub on: Option<bool>,
    /// New hue in degrees.
    pub hue: Option<u16>,
    /// New saturation percentage.
    pub saturation: Option<u8>,
    /// New brightness percentage.
    pub brightness: Option<u8>,
    /// New color temperature.
    pub kelvin: Option<Kelvin>,
    /// New maximum infrared level.
    pub max_ir: Option<u8>,
    /// Transition time in milliseconds.
    pub duration_ms: u64,
}

impl LightDelta {
    /// Returns `true` if the delta changes color, temperature or brightness.
    #[must_use]
    pub const fn touches_color(&self) -> bool {
        self.hue.is_some()
            || self.saturation.is_some()
            || self.brightness.is_some()
            || self.kelvin.is_some()
    }

    /// Returns `true` if applying the delta changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.on.is_none() && !self.touches_color() && self.max_ir.is_none()
    }
}

/// A payload that carried no recognized field.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unhandled input")]
pub struct UnhandledInput {
    /// The payload as received.
    pub input: Value,
}

/// Resolves a command payload against the current state of a light.
///
/// Accepted shapes are a boolean, one of `"on"`, `"off"`, `"toggle"`, a
/// number (turns on at that brightness), or an object with any of:
///
/// | Category | Keys (first present wins) |
/// |----------|---------------------------|
/// | Color | `hue`, else `red`/`green`/`blue`, else `hex` |
/// | Saturation | `sat`, `saturation` |
/// | Temperature | `ct`, `mirek`, `mired`, else `kelvin` |
/// | Brightness | `bri`, `brightness` |
/// | Power | `on` |
/// | Infrared | `maxIR` |
///
/// `duration` sets the transition time but does not count as a change.
///
/// # Errors
///
/// Returns [`UnhandledInput`] if no category is recognized.
///
/// # Examples
///
/// ```
/// use lifx_bridge::CapabilitySet;
/// use lifx_bridge::command::resolve;
/// use lifx_bridge::state::LightState;
/// use serde_json::json;
///
/// let caps = CapabilitySet::builder().with_color().build();
/// let delta = resolve(&json!({ "hex": "#123456" }), &LightState::default(), &caps).unwrap();
/// assert_eq!(delta.hue, Some(210));
/// assert_eq!(delta.saturation, Some(79));
/// assert_eq!(delta.brightness, Some(34));
///
/// assert!(resolve(&json!({ "duration": 500 }), &LightState::default(), &caps).is_err());
/// ```
pub fn resolve(
    input: &Value,
    current: &LightState,
    capabilities: &CapabilitySet,
) -> Result<LightDelta, UnhandledInput> {
    let unhandled = || UnhandledInput {
        input: input.clone(),
    };
    let payload = Payload::normalize(input).ok_or_else(unhandled)?;

    let mut delta = LightDelta::default();
    let mut recognized = resolve_color(&payload, current, capabilities, &mut delta);

    if capabilities.supports_temperature()
        && let Some(kelvin) = resolve_temperature(&payload)
    {
        delta.kelvin = Some(kelvin);
        recognized = true;
    }

    if let Some(brightness) = payload.first_number(&BRIGHTNESS_KEYS) {
        delta.brightness = Some(clamp_percent(brightness));
        recognized = true;
    }

    if let Some(power) = payload.power("on") {
        delta.on = Some(power.resolve(current.on()));
        recognized = true;
    }

    if let Some(level) = payload.number("maxIR") {
        if capabilities.supports_infrared() {
            delta.max_ir = Some(clamp_percent(level));
        }
        recognized = true;
    }

    if !recognized {
        return Err(unhandled());
    }

    delta.duration_ms = payload.number("duration").map_or(0, duration_ms);
    Ok(delta)
}

/// Resolves the color and saturation categories.
///
/// Runs even without the color capability, so that the brightness implied by
/// a color can still be extracted.
fn resolve_color(
    payload: &Payload<'_>,
    current: &LightState,
    capabilities: &CapabilitySet,
    delta: &mut LightDelta,
) -> bool {
    let (mut h, mut s, mut v) = current.hsv().to_f64();
    let mut changed = true;

    if let Some(hue) = payload.number("hue") {
        h = hue;
    } else if payload.has_number(&RGB_KEYS) {
        let mut rgb = hsv_to_rgb([h, s, v]);
        for (channel, key) in rgb.iter_mut().zip(RGB_KEYS) {
            if let Some(value) = payload.number(key) {
                *channel = value;
            }
        }
        [h, s, v] = rgb_to_hsv(rgb.map(|c| clamp_f64(c, 0.0, 255.0)));
    } else if let Some(rgb) = payload.hex("hex") {
        let (r, g, b) = rgb.to_f64();
        [h, s, v] = rgb_to_hsv([r, g, b]);
    } else {
        changed = false;
    }

    if let Some(saturation) = payload.first_number(&SATURATION_KEYS) {
        s = saturation;
        changed = true;
    }

    if !changed {
        return false;
    }

    let color = HsvColor::clamped(h, s, v);
    if capabilities.supports_color() {
        delta.hue = Some(color.hue());
        delta.saturation = Some(color.saturation());
        delta.brightness = Some(color.brightness());
    } else if color.brightness() != current.brightness() {
        delta.brightness = Some(color.brightness());
    }
    true
}

fn resolve_temperature(payload: &Payload<'_>) -> Option<Kelvin> {
    payload
        .first_number(&MIRED_KEYS)
        .map(Kelvin::from_mired)
        .or_else(|| payload.number("kelvin").map(Kelvin::clamped))
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn duration_ms(value: f64) -> u64 {
    if value <= 0.0 {
        0
    } else {
        value.min(u64::MAX as f64) as u64
    }
}
