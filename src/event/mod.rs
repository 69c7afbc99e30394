// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Events published to the host.
//!
//! Lights never call back into the host. Instead they publish
//! [`LightEvent`]s on an [`EventBus`], a tokio broadcast channel the host
//! subscribes to. State events carry a full [`StateMessage`] snapshot.
//!
//! # Examples
//!
//! ```
//! use lifx_bridge::event::{EventBus, LightEvent};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(LightEvent::error(Some("d073d5000001"), "Command failed", None));
//! let event = rx.try_recv().unwrap();
//! assert_eq!(event.kind(), "error");
//! ```

mod event_bus;
mod light_event;
mod state_message;

pub use event_bus::{DEFAULT_CHANNEL_CAPACITY, EventBus};
pub use light_event::LightEvent;
pub use state_message::{LightInfo, StateMessage, StatePayload};
