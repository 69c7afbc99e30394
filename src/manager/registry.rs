// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry of active lights.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value, json};
use tokio::sync::{RwLock, broadcast, watch};

use crate::device::DeviceHandle;
use crate::error::{Error, Result};
use crate::event::{EventBus, LightEvent, StateMessage};
use crate::light::{ApplyOutcome, Light, LightStatus};
use crate::state::{Clock, LightState, TokioClock};

use super::RegistryConfig;

/// Entry of [`LightRegistry::lights`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LightSummary {
    /// Device id.
    pub id: String,
    /// Device address.
    pub address: String,
    /// Last known label.
    pub label: Option<String>,
}

/// Owns the active lights of one host and fans their events out.
///
/// Every light added here shares the registry's [`RegistryConfig`], clock and
/// event channel. Dropping the registry (or calling [`stop`](Self::stop))
/// stops all polling.
///
/// # Examples
///
/// ```no_run
/// use lifx_bridge::DeviceHandle;
/// use lifx_bridge::manager::{LightRegistry, RegistryConfig};
/// use serde_json::json;
///
/// async fn run<D: DeviceHandle>(device: D) -> lifx_bridge::Result<()> {
///     let registry = LightRegistry::new(RegistryConfig::default());
///     let mut events = registry.subscribe();
///
///     let light = registry.add(device).await?;
///     registry.apply(light.id(), &json!({ "on": true, "bri": 40 })).await?;
///
///     while let Ok(event) = events.recv().await {
///         println!("{}", serde_json::to_string(&event).unwrap_or_default());
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct LightRegistry<D: DeviceHandle> {
    lights: Arc<RwLock<HashMap<String, Light<D>>>>,
    events: EventBus,
    config: RegistryConfig,
    clock: Arc<dyn Clock>,
}

impl<D: DeviceHandle> LightRegistry<D> {
    /// Creates an empty registry using the Tokio clock.
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        Self::with_clock(config, Arc::new(TokioClock))
    }

    /// Creates an empty registry with an explicit clock for echo suppression.
    #[must_use]
    pub fn with_clock(config: RegistryConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            lights: Arc::new(RwLock::new(HashMap::new())),
            events: EventBus::with_capacity(config.event_capacity()),
            config,
            clock,
        }
    }

    /// Returns the configuration shared by every light.
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Subscribes to the events of every light.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LightEvent> {
        self.events.subscribe()
    }

    /// Returns the number of event subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.events.subscriber_count()
    }

    // ========== Lifecycle ==========

    /// Initializes a device and registers it.
    ///
    /// Publishes a `new` event on success and an `error` event on failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyRegistered`] if a light with the same id is
    /// active, or [`Error::Initialization`] if the device did not answer.
    pub async fn add(&self, device: D) -> Result<Light<D>> {
        let id = device.id().to_string();
        if self.lights.read().await.contains_key(&id) {
            return Err(Error::AlreadyRegistered(id));
        }

        let light = match Light::initialize(
            device,
            self.config.clone(),
            Arc::clone(&self.clock),
            self.events.clone(),
        )
        .await
        {
            Ok(light) => light,
            Err(error) => {
                tracing::warn!(light_id = %id, %error, "Light initialization failed");
                self.events.publish(LightEvent::error(
                    Some(id.as_str()),
                    "Initialization failed",
                    Some(json!({ "error": error.to_string() })),
                ));
                return Err(error);
            }
        };

        {
            let mut lights = self.lights.write().await;
            if lights.contains_key(&id) {
                light.stop();
                return Err(Error::AlreadyRegistered(id));
            }
            lights.insert(id, light.clone());
        }

        self.events.publish(LightEvent::New(light.state_message()));
        Ok(light)
    }

    /// Removes a light and stops its polling.
    ///
    /// Returns `true` if the light was registered.
    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.lights.write().await.remove(id);
        if let Some(light) = &removed {
            light.stop();
            tracing::debug!(light_id = %id, "Light removed");
        }
        removed.is_some()
    }

    /// Stops every light and empties the registry.
    pub async fn stop(&self) {
        let mut lights = self.lights.write().await;
        for light in lights.values() {
            light.stop();
        }
        lights.clear();
        tracing::debug!("Registry stopped");
    }

    // ========== Lookup ==========

    /// Finds a light by id, or else by its current label.
    pub async fn get(&self, id_or_label: &str) -> Option<Light<D>> {
        let lights = self.lights.read().await;
        if let Some(light) = lights.get(id_or_label) {
            return Some(light.clone());
        }
        lights
            .values()
            .find(|light| light.label().as_deref() == Some(id_or_label))
            .cloned()
    }

    /// Lists the active lights, sorted by id.
    pub async fn lights(&self) -> Vec<LightSummary> {
        let mut summaries: Vec<_> = self
            .lights
            .read()
            .await
            .values()
            .map(|light| LightSummary {
                id: light.id().to_string(),
                address: light.address().to_string(),
                label: light.label(),
            })
            .collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        summaries
    }

    /// Returns the number of active lights.
    pub async fn len(&self) -> usize {
        self.lights.read().await.len()
    }

    /// Returns `true` if no light is active.
    pub async fn is_empty(&self) -> bool {
        self.lights.read().await.is_empty()
    }

    // ========== Per-light operations ==========

    /// Applies a host payload to a light addressed by id or label.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LightNotFound`] if no light matches.
    pub async fn apply(&self, id_or_label: &str, input: &Value) -> Result<ApplyOutcome> {
        let light = self.require(id_or_label).await?;
        Ok(light.apply(input))
    }

    /// Feeds a transport reachability notification for a light.
    ///
    /// Returns `true` if the notification was accepted; see [`Light::set_reachable`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::LightNotFound`] if no light has this id.
    pub async fn set_reachable(&self, id: &str, reachable: bool) -> Result<bool> {
        let light = self
            .lights
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| Error::LightNotFound(id.to_string()))?;
        Ok(light.set_reachable(reachable).await)
    }

    /// Returns the full snapshot of a light.
    pub async fn state_message(&self, id_or_label: &str) -> Option<StateMessage> {
        self.get(id_or_label).await.map(|light| light.state_message())
    }

    /// Returns the status summary of a light, `Unknown` if it is not active.
    pub async fn status_of(&self, id_or_label: &str) -> LightStatus {
        self.get(id_or_label)
            .await
            .map_or(LightStatus::Unknown, |light| light.status())
    }

    /// Watches the state of a light.
    pub async fn watch(&self, id_or_label: &str) -> Option<watch::Receiver<LightState>> {
        self.get(id_or_label).await.map(|light| light.watch())
    }

    async fn require(&self, id_or_label: &str) -> Result<Light<D>> {
        self.get(id_or_label)
            .await
            .ok_or_else(|| Error::LightNotFound(id_or_label.to_string()))
    }
}

impl<D: DeviceHandle> Drop for LightRegistry<D> {
    fn drop(&mut self) {
        if let Ok(lights) = self.lights.try_read() {
            for light in lights.values() {
                light.stop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::mock::MockDevice;
    use crate::light::Reachability;
    use crate::state::ManualClock;

    fn registry() -> LightRegistry<MockDevice> {
        LightRegistry::with_clock(RegistryConfig::default(), Arc::new(ManualClock::new()))
    }

    #[tokio::test(start_paused = true)]
    async fn add_publishes_new() {
        let registry = registry();
        let mut rx = registry.subscribe();

        let light = registry.add(MockDevice::new("d1", true, false)).await.unwrap();

        let event = rx.recv().await.unwrap();
        assert!(event.is_new());
        assert_eq!(event.light_id(), Some("d1"));
        assert_eq!(light.reachability(), Reachability::Online);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_add_is_rejected() {
        let registry = registry();
        registry.add(MockDevice::new("d1", true, false)).await.unwrap();

        let result = registry.add(MockDevice::new("d1", true, false)).await;
        assert!(matches!(result, Err(Error::AlreadyRegistered(id)) if id == "d1"));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_add_publishes_error() {
        let registry = registry();
        let mut rx = registry.subscribe();
        let device = MockDevice::new("d1", true, false);
        device.inner.lock().fail_state = true;

        assert!(registry.add(device).await.is_err());
        assert!(rx.recv().await.unwrap().is_error());
        assert!(registry.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_by_label() {
        let registry = registry();
        registry.add(MockDevice::new("d1", true, false)).await.unwrap();

        let light = registry.get("Light d1").await.unwrap();
        assert_eq!(light.id(), "d1");
        assert!(registry.get("Kitchen").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn lights_are_sorted() {
        let registry = registry();
        registry.add(MockDevice::new("d2", true, false)).await.unwrap();
        registry.add(MockDevice::new("d1", false, false)).await.unwrap();

        let ids: Vec<_> = registry.lights().await.into_iter().map(|s| s.id).collect();
        assert_eq!(ids, ["d1", "d2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_light() {
        let registry = registry();
        let result = registry.apply("nope", &serde_json::json!({ "on": true })).await;
        assert!(matches!(result, Err(Error::LightNotFound(_))));
        assert_eq!(registry.status_of("nope").await, LightStatus::Unknown);
        assert!(registry.set_reachable("nope", true).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn remove_stops_polling() {
        let registry = registry();
        let light = registry.add(MockDevice::new("d1", true, false)).await.unwrap();

        assert!(registry.remove("d1").await);
        assert!(!light.is_polling());
        assert!(!registry.remove("d1").await);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_clears() {
        let registry = registry();
        let light = registry.add(MockDevice::new("d1", true, false)).await.unwrap();

        registry.stop().await;
        assert!(registry.is_empty().await);
        assert!(!light.is_polling());
    }
}
