// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light registry for hosts driving several lights.
//!
//! The [`LightRegistry`] owns the lights of one host. It initializes devices
//! as they are added, routes commands by id or label, forwards transport
//! reachability notifications and merges every light's events into a single
//! broadcast channel.
//!
//! # Examples
//!
//! ```no_run
//! use std::time::Duration;
//! use lifx_bridge::manager::{LightRegistry, RegistryConfig};
//! use lifx_bridge::event::LightEvent;
//!
//! # async fn example<D: lifx_bridge::DeviceHandle>(device: D) -> lifx_bridge::Result<()> {
//! let config = RegistryConfig::default().with_poll_interval(Duration::from_secs(1));
//! let registry = LightRegistry::new(config);
//! let mut events = registry.subscribe();
//!
//! tokio::spawn(async move {
//!     while let Ok(event) = events.recv().await {
//!         if let LightEvent::Update(message) = event {
//!             println!("{} is now {}", message.id, message.payload.color);
//!         }
//!     }
//! });
//!
//! registry.add(device).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod registry;

pub use config::{DEFAULT_SETTLE_MARGIN, MIN_POLL_INTERVAL, RegistryConfig};
pub use registry::{LightRegistry, LightSummary};
