// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command resolution and planning.
//!
//! A host sends whatever it has: a boolean, a brightness number, a hex
//! string, RGB channels, a temperature in Kelvin or mired. Applying it is a
//! two step process:
//!
//! 1. [`resolve`] turns the payload into a [`LightDelta`], with every value
//!    clamped and filtered by the light's capabilities
//! 2. after the delta is merged into the state, [`plan`] derives the
//!    [`DeviceCommand`]s to send, in order
//!
//! # Examples
//!
//! ```
//! use lifx_bridge::CapabilitySet;
//! use lifx_bridge::command::{DeviceCommand, plan, resolve};
//! use lifx_bridge::state::LightState;
//! use serde_json::json;
//!
//! let caps = CapabilitySet::builder().with_color().build();
//! let mut state = LightState::default();
//!
//! let delta = resolve(&json!({ "on": true, "bri": 40, "duration": 2000 }), &state, &caps).unwrap();
//! let was_on = state.on();
//! state.merge(&delta);
//!
//! let commands = plan(was_on, &state, &delta);
//! assert_eq!(commands.len(), 2);
//! assert!(matches!(commands[1], DeviceCommand::SetPower { on: true, duration_ms: 2000 }));
//! ```

mod input;
mod plan;
mod resolver;

pub use plan::{DeviceCommand, plan};
pub use resolver::{LightDelta, UnhandledInput, resolve};
