// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One-line status summary for host UIs.

use std::fmt;

use crate::state::LightState;

use super::Reachability;

/// Coarse status of a light, e.g. for a node badge.
///
/// # Examples
///
/// ```
/// use lifx_bridge::light::LightStatus;
///
/// assert_eq!(LightStatus::On { brightness: 42 }.to_string(), "on (42%)");
/// assert_eq!(LightStatus::Disconnected.to_string(), "disconnected");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightStatus {
    /// The light is not known.
    Unknown,
    /// The light is not reachable.
    Disconnected,
    /// Reachable and off.
    Off,
    /// Reachable and on.
    On {
        /// Brightness percentage.
        brightness: u8,
    },
}

impl LightStatus {
    /// Summarizes a light.
    #[must_use]
    pub const fn of(reachability: Reachability, state: &LightState) -> Self {
        if !reachability.is_online() {
            Self::Disconnected
        } else if state.on() {
            Self::On {
                brightness: state.brightness(),
            }
        } else {
            Self::Off
        }
    }
}

impl fmt::Display for LightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str("unknown"),
            Self::Disconnected => f.write_str("disconnected"),
            Self::Off => f.write_str("off"),
            Self::On { brightness } => write!(f, "on ({brightness}%)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HsvColor, Kelvin};

    fn state(on: bool) -> LightState {
        LightState::new(on, HsvColor::clamped(0.0, 0.0, 73.0), Kelvin::NEUTRAL)
    }

    #[test]
    fn unreachable_is_disconnected() {
        assert_eq!(LightStatus::of(Reachability::Offline, &state(true)), LightStatus::Disconnected);
        assert_eq!(LightStatus::of(Reachability::Unknown, &state(false)), LightStatus::Disconnected);
    }

    #[test]
    fn online_reports_power() {
        assert_eq!(LightStatus::of(Reachability::Online, &state(false)), LightStatus::Off);
        assert_eq!(
            LightStatus::of(Reachability::Online, &state(true)),
            LightStatus::On { brightness: 73 }
        );
    }

    #[test]
    fn display() {
        assert_eq!(LightStatus::Unknown.to_string(), "unknown");
        assert_eq!(LightStatus::Off.to_string(), "off");
    }
}
