// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authoritative power and color model of one light.

use serde::{Deserialize, Serialize};

use crate::command::LightDelta;
use crate::device::DeviceState;
use crate::types::{HsvColor, Kelvin};

/// Which color description the light is showing.
///
/// Both descriptions are kept in [`LightState`]. In
/// [`Temperature`](Self::Temperature) mode the stored hue and saturation are
/// retained for the next color command but the device is sent saturation 0,
/// so it shows white at the stored temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Hue and saturation are active.
    Color,
    /// The color temperature is active.
    #[default]
    Temperature,
}

/// Power and color state of a light.
///
/// Every field is kept inside its valid range. Turning a light off never
/// resets the color fields; they are reused by the next "on".
///
/// # Examples
///
/// ```
/// use lifx_bridge::state::{ColorMode, LightState};
/// use lifx_bridge::types::{HsvColor, Kelvin};
///
/// let state = LightState::new(true, HsvColor::clamped(120.0, 50.0, 80.0), Kelvin::NEUTRAL);
/// assert!(state.on());
/// assert_eq!(state.hue(), 120);
/// assert_eq!(state.mode(), ColorMode::Color);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LightState {
    on: bool,
    hue: u16,
    saturation: u8,
    brightness: u8,
    kelvin: Kelvin,
    mode: ColorMode,
}

impl LightState {
    /// Creates a state. The mode is [`ColorMode::Color`] when the color has
    /// any saturation, [`ColorMode::Temperature`] otherwise.
    #[must_use]
    pub fn new(on: bool, color: HsvColor, kelvin: Kelvin) -> Self {
        let mode = if color.saturation() > 0 {
            ColorMode::Color
        } else {
            ColorMode::Temperature
        };
        Self {
            on,
            hue: color.hue(),
            saturation: color.saturation(),
            brightness: color.brightness(),
            kelvin,
            mode,
        }
    }

    /// Builds a state from a device reading, clamping every field.
    #[must_use]
    pub fn from_device(device: &DeviceState) -> Self {
        let color = &device.color;
        Self::new(
            device.is_on(),
            HsvColor::clamped(color.hue, color.saturation, color.brightness),
            Kelvin::clamped(color.kelvin),
        )
    }

    /// Returns `true` if the light is on.
    #[must_use]
    pub const fn on(&self) -> bool {
        self.on
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

    /// Returns the color temperature.
    #[must_use]
    pub const fn kelvin(&self) -> Kelvin {
        self.kelvin
    }

    /// Returns the active color description.
    #[must_use]
    pub const fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Returns the saturation the device should show: 0 in
    /// [`ColorMode::Temperature`], the stored saturation otherwise.
    #[must_use]
    pub const fn active_saturation(&self) -> u8 {
        match self.mode {
            ColorMode::Color => self.saturation,
            ColorMode::Temperature => 0,
        }
    }

    /// Returns `true` if the light shows white at its color temperature.
    #[must_use]
    pub const fn shows_temperature(&self) -> bool {
        self.active_saturation() == 0
    }

    /// Returns hue, saturation and brightness as an [`HsvColor`].
    #[must_use]
    pub fn hsv(&self) -> HsvColor {
        HsvColor::clamped(
            f64::from(self.hue),
            f64::from(self.saturation),
            f64::from(self.brightness),
        )
    }

    /// Merges a resolved command delta into the state.
    ///
    /// A temperature switches the mode to [`ColorMode::Temperature`] and wins
    /// over a hue or saturation in the same delta. Brightness alone leaves
    /// the mode unchanged.
    pub fn merge(&mut self, delta: &LightDelta) {
        if let Some(on) = delta.on {
            self.on = on;
        }
        if let Some(hue) = delta.hue {
            self.hue = hue;
        }
        if let Some(saturation) = delta.saturation {
            self.saturation = saturation;
        }
        if let Some(brightness) = delta.brightness {
            self.brightness = brightness;
        }
        if let Some(kelvin) = delta.kelvin {
            self.kelvin = kelvin;
        }

        if delta.kelvin.is_some() {
            self.mode = ColorMode::Temperature;
        } else if delta.hue.is_some() || delta.saturation.is_some() {
            self.mode = ColorMode::Color;
        }
    }

    /// Reconciles a device reading into the state.
    ///
    /// When the device reports power off only the `on` flag is taken over.
    /// Otherwise the whole state is replaced if any value differs. Returns
    /// `true` if anything changed.
    pub fn reconcile(&mut self, device: &DeviceState) -> bool {
        let observed = Self::from_device(device);

        if !observed.on {
            let changed = self.on;
            self.on = false;
            return changed;
        }

        if self.same_values(&observed) {
            return false;
        }
        *self = observed;
        true
    }

    /// Compares what the two states look like on the device.
    ///
    /// Hue and saturation only count when both states show a color; any two
    /// states showing white at the same temperature and brightness are equal.
    #[must_use]
    pub fn same_values(&self, other: &Self) -> bool {
        let same_color = match (self.shows_temperature(), other.shows_temperature()) {
            (true, true) => true,
            (false, false) => self.hue == other.hue && self.saturation == other.saturation,
            _ => false,
        };
        self.on == other.on
            && self.brightness == other.brightness
            && self.kelvin == other.kelvin
            && same_color
    }
}
