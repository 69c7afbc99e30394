// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-facing snapshot of a light.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::capabilities::CapabilitySet;
use crate::convert::{floor_rgb, hsv_to_rgb, kelvin_to_rgb, nearest_keyword, rgb_to_hsv};
use crate::state::LightState;

/// Saturation shown for lights that only have a color temperature.
const TEMPERATURE_SATURATION: f64 = 5.0;

/// Full state of one light as sent to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateMessage {
    /// Light id.
    pub id: String,
    /// Static and slowly changing metadata.
    pub info: LightInfo,
    /// Display values derived from the state.
    pub payload: StatePayload,
    /// The raw internal state.
    pub state: LightState,
    /// Maximum infrared level, on infrared lights.
    #[serde(rename = "maxIR", skip_serializing_if = "Option::is_none")]
    pub max_ir: Option<u8>,
}

/// Light metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LightInfo {
    /// Light id.
    pub id: String,
    /// Label last reported by the device.
    pub label: Option<String>,
    /// Network address.
    pub address: String,
    /// Product name.
    pub model: String,
    /// Capability names, lowercase.
    pub capability: CapabilitySet,
    /// Time of the last successful state fetch.
    pub last_seen: Option<DateTime<Utc>>,
}

/// Display values of a light.
///
/// All numbers are floored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatePayload {
    /// Power state.
    pub on: bool,
    /// Whether the light is online.
    pub reachable: bool,
    /// Brightness percentage.
    pub bri: u8,
    /// Hue, saturation, value.
    pub hsv: [u16; 3],
    /// Red, green, blue.
    pub rgb: [u8; 3],
    /// Six uppercase hex digits, no `#`.
    pub hex: String,
    /// Nearest CSS color keyword.
    pub color: String,
    /// Color temperature, on lights with a temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kelvin: Option<u16>,
    /// Color temperature in mired, on lights with a temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mired: Option<u16>,
}

impl StatePayload {
    /// Computes the display values of `state`.
    ///
    /// Color lights showing a color display their stored hue and saturation.
    /// Lights showing white, and temperature-only lights, display the hue of
    /// their white point at a fixed low saturation.
    #[must_use]
    pub fn new(state: &LightState, capabilities: &CapabilitySet, reachable: bool) -> Self {
        let brightness = f64::from(state.brightness());
        let hsv = if capabilities.supports_color() && !state.shows_temperature() {
            [
                f64::from(state.hue()),
                f64::from(state.saturation()),
                brightness,
            ]
        } else {
            let [hue, _, _] = rgb_to_hsv(kelvin_to_rgb(f64::from(state.kelvin().value())));
            [hue, TEMPERATURE_SATURATION, brightness]
        };

        let rgb = floor_rgb(hsv_to_rgb(hsv));
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let hsv = hsv.map(|c| c.floor() as u16);

        let (kelvin, mired) = if capabilities.supports_temperature() {
            (Some(state.kelvin().value()), Some(state.kelvin().to_mired()))
        } else {
            (None, None)
        };

        Self {
            on: state.on(),
            reachable,
            bri: state.brightness(),
            hsv,
            rgb: rgb.to_array(),
            hex: rgb.to_hex(),
            color: nearest_keyword(rgb).to_string(),
            kelvin,
            mired,
        }
    }
}
