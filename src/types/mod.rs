// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for light control.
//!
//! Each type keeps its value inside the valid range at construction time,
//! so a value read back from [`LightState`](crate::state::LightState) never
//! needs re-validation.
//!
//! # Types
//!
//! - [`PowerState`] - On/Off/Toggle intent
//! - [`HsvColor`] - Hue 0-359, Saturation 0-100, Brightness 0-100
//! - [`Kelvin`] - Color temperature, 2000-10000 K
//! - [`RgbColor`] - 8-bit RGB with hex parsing

mod color;
mod power;
mod rgb_color;

pub use color::{HsvColor, Kelvin};
pub(crate) use color::{clamp_f64, clamp_percent};
pub use power::PowerState;
pub use rgb_color::RgbColor;
