// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `lifx_bridge` - keeps LIFX lights in sync with loosely-typed host commands.
//!
//! The library sits between a host (a flow engine, a home automation hub, a
//! CLI) and a LIFX transport. The host sends JSON-ish payloads such as
//! `{"on": true, "hex": "#ff8800", "duration": 500}`; the library resolves
//! them against each light's capabilities, updates a local color model,
//! sends the minimal ordered sequence of device commands and publishes state
//! events. A poll loop reconciles changes made from outside, while echo
//! suppression hides the light's own in-flight transitions.
//!
//! The transport itself is not part of this crate: plug it in by
//! implementing [`DeviceHandle`].
//!
//! # Quick Start
//!
//! ```no_run
//! use lifx_bridge::{DeviceHandle, LightRegistry, RegistryConfig};
//! use serde_json::json;
//!
//! async fn run<D: DeviceHandle>(device: D) -> lifx_bridge::Result<()> {
//!     let registry = LightRegistry::new(RegistryConfig::default());
//!     let light = registry.add(device).await?;
//!
//!     // Warm white at 60 %, faded in over one second
//!     if let Some(dispatch) = light.apply(&json!({ "on": true, "kelvin": 2700, "bri": 60, "duration": 1000 })).into_dispatch() {
//!         dispatch.completed().await;
//!     }
//!
//!     println!("{}", light.status());
//!     Ok(())
//! }
//! ```
//!
//! # Accepted payloads
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `on` | `true`/`false`, `"on"`/`"off"`/`"toggle"`, `1`/`0` |
//! | `bri`, `brightness` | Brightness, 0-100 |
//! | `hue`, `sat`, `saturation` | HSV color |
//! | `red`, `green`, `blue` | RGB channels, 0-255 |
//! | `hex` | `#RGB` or `#RRGGBB` |
//! | `kelvin`, `ct`, `mired`, `mirek` | Color temperature |
//! | `maxIR` | Infrared level, 0-100 |
//! | `duration` | Transition time in milliseconds |
//!
//! A bare boolean, power keyword or number is accepted as a shorthand for
//! `on` (and brightness, for numbers).

pub mod command;
pub mod convert;
pub mod device;
pub mod error;
pub mod event;
pub mod light;
pub mod manager;
pub mod state;
pub mod types;

mod capabilities;

pub use capabilities::{Capability, CapabilitySet, CapabilitySetBuilder};
pub use device::{DeviceColor, DeviceHandle, DeviceState, HardwareInfo, InfraredLevel, ProductFeatures};
pub use error::{Error, InitStage, Result, TransportError, ValueError};
pub use event::{EventBus, LightEvent, StateMessage};
pub use light::{ApplyOutcome, Dispatch, Light, LightStatus, PollOutcome, Reachability};
pub use manager::{LightRegistry, LightSummary, RegistryConfig};
pub use state::{Clock, ColorMode, LightState, ManualClock, TokioClock};
pub use types::{HsvColor, Kelvin, PowerState, RgbColor};
