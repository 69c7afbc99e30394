// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power intent for a light.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Requested power state of a light.
///
/// `Toggle` is only meaningful relative to the state a light had before the
/// command carrying it was applied; use [`PowerState::resolve`] to turn it
/// into a concrete on/off value.
///
/// # Examples
///
/// ```
/// use lifx_bridge::types::PowerState;
///
/// let state: PowerState = "toggle".parse().unwrap();
/// assert!(!state.resolve(true));
/// assert!(state.resolve(false));
///
/// assert_eq!("off".parse::<PowerState>().unwrap(), PowerState::Off);
/// assert_eq!("true".parse::<PowerState>().unwrap(), PowerState::On);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerState {
    /// Power is off.
    Off,
    /// Power is on.
    On,
    /// Invert the current power state.
    Toggle,
}

impl PowerState {
    /// Returns the lowercase string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Toggle => "toggle",
        }
    }

    /// Resolves this intent against the current on-state.
    #[must_use]
    pub const fn resolve(self, currently_on: bool) -> bool {
        match self {
            Self::Off => false,
            Self::On => true,
            Self::Toggle => !currently_on,
        }
    }

    /// Interprets a number as a power state: zero is off, anything else on.
    ///
    /// Returns `None` for non-finite values.
    #[must_use]
    pub fn from_number(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Some(if value == 0.0 { Self::Off } else { Self::On })
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "false" => Ok(Self::Off),
            "on" | "true" => Ok(Self::On),
            "toggle" => Ok(Self::Toggle),
            _ => Err(ValueError::InvalidPowerState(s.to_string())),
        }
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}
