// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device commands derived from a state transition.

use std::fmt;

use crate::device::DeviceHandle;
use crate::error::TransportError;
use crate::state::LightState;
use crate::types::Kelvin;

use super::LightDelta;

/// A single call on a [`DeviceHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    /// Set hue, saturation, brightness and temperature.
    SetColor {
        /// Hue in degrees.
        hue: u16,
        /// Saturation percentage.
        saturation: u8,
        /// Brightness percentage.
        brightness: u8,
        /// Color temperature.
        kelvin: Kelvin,
        /// Transition time in milliseconds.
        duration_ms: u64,
    },
    /// Switch power.
    SetPower {
        /// Target power state.
        on: bool,
        /// Transition time in milliseconds.
        duration_ms: u64,
    },
    /// Set the maximum infrared level.
    SetInfrared {
        /// Level percentage.
        level: u8,
    },
}

impl DeviceCommand {
    /// Creates a color command carrying the color `state` shows.
    ///
    /// In temperature mode the saturation is 0, so the device shows white.
    #[must_use]
    pub const fn color_of(state: &LightState, duration_ms: u64) -> Self {
        Self::SetColor {
            hue: state.hue(),
            saturation: state.active_saturation(),
            brightness: state.brightness(),
            kelvin: state.kelvin(),
            duration_ms,
        }
    }

    /// Sends the command to a device.
    ///
    /// # Errors
    ///
    /// Returns the transport error reported by the device.
    pub async fn execute<D: DeviceHandle>(&self, device: &D) -> Result<(), TransportError> {
        match *self {
            Self::SetColor {
                hue,
                saturation,
                brightness,
                kelvin,
                duration_ms,
            } => {
                device
                    .set_color(
                        f64::from(hue),
                        f64::from(saturation),
                        f64::from(brightness),
                        f64::from(kelvin.value()),
                        duration_ms,
                    )
                    .await
            }
            Self::SetPower { on, duration_ms } => device.set_power(on, duration_ms).await,
            Self::SetInfrared { level } => device.set_infrared_level(f64::from(level)).await,
        }
    }
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetColor {
                hue,
                saturation,
                brightness,
                kelvin,
                duration_ms,
            } => write!(
                f,
                "setColor({hue}, {saturation}, {brightness}, {kelvin}, {duration_ms}ms)"
            ),
            Self::SetPower { on, duration_ms } => write!(f, "setPower({on}, {duration_ms}ms)"),
            Self::SetInfrared { level } => write!(f, "setInfrared({level})"),
        }
    }
}

/// Plans the device calls for a delta that was merged into `state`.
///
/// `was_on` is the power state before the merge.
///
/// - on to off: power off with the requested duration
/// - on to on with a color change: one color command with the duration
/// - off to on: the color at duration 0, then power on with the duration,
///   so the light fades up already showing the target color
/// - off to off: nothing, the new color is kept for the next "on"
///
/// An infrared level is sent on its own and never triggers the above.
#[must_use]
pub fn plan(was_on: bool, state: &LightState, delta: &LightDelta) -> Vec<DeviceCommand> {
    let duration_ms = delta.duration_ms;
    let mut commands = Vec::new();

    match (was_on, state.on()) {
        (true, false) => commands.push(DeviceCommand::SetPower {
            on: false,
            duration_ms,
        }),
        (true, true) if delta.touches_color() => {
            commands.push(DeviceCommand::color_of(state, duration_ms));
        }
        (false, true) => {
            commands.push(DeviceCommand::color_of(state, 0));
            commands.push(DeviceCommand::SetPower {
                on: true,
                duration_ms,
            });
        }
        _ => {}
    }

    if let Some(level) = delta.max_ir {
        commands.push(DeviceCommand::SetInfrared { level });
    }

    commands
}
