// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-light engine.
//!
//! A [`Light`] owns one [`DeviceHandle`] and keeps a [`LightState`] in sync
//! with it:
//!
//! - [`Light::apply`] resolves a host payload, merges it into the state and
//!   sends the resulting device commands on a background task
//! - a poll task fetches the device state on a fixed interval and reconciles
//!   it, unless a recent command is still settling
//! - [`Light::set_reachable`] feeds transport notifications into the
//!   [`Reachability`] state machine, which starts and stops polling
//!
//! Every change is published as a [`LightEvent`] and pushed to
//! [`Light::watch`] receivers.

mod poller;
mod reachability;
mod status;

pub use poller::PollOutcome;
pub use reachability::Reachability;
pub use status::LightStatus;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::capabilities::CapabilitySet;
use crate::command::{DeviceCommand, plan, resolve};
use crate::device::DeviceHandle;
use crate::error::{Error, InitStage, Result, TransportError};
use crate::event::{EventBus, LightEvent, LightInfo, StateMessage, StatePayload};
use crate::manager::RegistryConfig;
use crate::state::{Clock, EchoSuppression, LightState};
use crate::types::clamp_percent;

use poller::spawn_poller;

/// A light kept in sync with its device.
///
/// Cloning is cheap; clones share the same light.
pub struct Light<D: DeviceHandle> {
    inner: Arc<Inner<D>>,
}

pub(crate) struct Inner<D: DeviceHandle> {
    device: D,
    id: String,
    address: String,
    model: String,
    capabilities: CapabilitySet,
    config: RegistryConfig,
    clock: Arc<dyn Clock>,
    events: EventBus,
    shared: Mutex<Shared>,
    state_tx: watch::Sender<LightState>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

/// Mutable part of a light. Never locked across an `.await`.
#[derive(Debug)]
struct Shared {
    state: LightState,
    echo: EchoSuppression,
    reachability: Reachability,
    label: Option<String>,
    max_ir: Option<u8>,
    last_seen: Option<DateTime<Utc>>,
    /// Set while an online notification waits for its first poll.
    connecting: bool,
    /// Bumped on every accepted reachability notification.
    generation: u64,
}

impl<D: DeviceHandle> Light<D> {
    /// Initializes a light from its device.
    ///
    /// Reads the hardware info, then the state and, on infrared lights, the
    /// infrared level concurrently. On success the light is online and
    /// polling; the first poll happens one interval later.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Initialization`] naming the failed stage if any query
    /// fails. No task is started in that case.
    pub async fn initialize(
        device: D,
        config: RegistryConfig,
        clock: Arc<dyn Clock>,
        events: EventBus,
    ) -> Result<Self> {
        let id = device.id().to_string();
        tracing::debug!(light_id = %id, address = device.address(), "Initializing light");

        let hardware = device
            .get_hardware_version()
            .await
            .map_err(init_error(InitStage::HardwareInfo))?;
        let capabilities = CapabilitySet::from_hardware(&hardware);

        let (reading, max_ir) = if capabilities.supports_infrared() {
            let (reading, max_ir) = tokio::try_join!(
                async { device.get_state().await.map_err(init_error(InitStage::State)) },
                async {
                    device
                        .get_max_ir()
                        .await
                        .map_err(init_error(InitStage::InfraredLevel))
                },
            )?;
            (reading, Some(clamp_percent(max_ir.brightness)))
        } else {
            let reading = device
                .get_state()
                .await
                .map_err(init_error(InitStage::State))?;
            (reading, None)
        };

        let state = LightState::from_device(&reading);
        let (state_tx, _) = watch::channel(state);

        let inner = Arc::new(Inner {
            address: device.address().to_string(),
            device,
            id,
            model: hardware.product_name,
            capabilities,
            config,
            clock,
            events,
            shared: Mutex::new(Shared {
                state,
                echo: EchoSuppression::new(),
                reachability: Reachability::Online,
                label: reading.label,
                max_ir,
                last_seen: Some(Utc::now()),
                connecting: false,
                generation: 0,
            }),
            state_tx,
            poll_task: Mutex::new(None),
        });
        inner.start_polling(Instant::now() + inner.config.poll_interval());

        tracing::info!(
            light_id = %inner.id,
            model = %inner.model,
            capabilities = ?inner.capabilities.names(),
            "Light initialized"
        );
        Ok(Self { inner })
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    /// Returns the device id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Returns the device address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.inner.address
    }

    /// Returns the product name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Returns the capabilities detected at initialization.
    #[must_use]
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.inner.capabilities
    }

    /// Returns the label last reported by the device.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        self.inner.shared.lock().label.clone()
    }

    /// Returns the time of the last successful state fetch.
    #[must_use]
    pub fn last_seen(&self) -> Option<DateTime<Utc>> {
        self.inner.shared.lock().last_seen
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> LightState {
        self.inner.shared.lock().state
    }

    /// Returns the current reachability.
    #[must_use]
    pub fn reachability(&self) -> Reachability {
        self.inner.shared.lock().reachability
    }

    /// Returns the maximum infrared level, on infrared lights.
    #[must_use]
    pub fn max_ir(&self) -> Option<u8> {
        self.inner.shared.lock().max_ir
    }

    /// Returns the status summary.
    #[must_use]
    pub fn status(&self) -> LightStatus {
        let shared = self.inner.shared.lock();
        LightStatus::of(shared.reachability, &shared.state)
    }

    /// Returns the instant until which device readings are discarded.
    #[must_use]
    pub fn suppressed_until(&self) -> Option<Instant> {
        self.inner.shared.lock().echo.deadline()
    }

    /// Returns a full snapshot for the host.
    #[must_use]
    pub fn state_message(&self) -> StateMessage {
        let shared = self.inner.shared.lock();
        self.inner.message(&shared)
    }

    /// Returns a receiver notified on every state change.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<LightState> {
        self.inner.state_tx.subscribe()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Applies a host payload.
    ///
    /// See [`resolve`] for the accepted shapes. Device commands run on a
    /// spawned task, so this must be called within a Tokio runtime; the
    /// returned [`Dispatch`] may be awaited or ignored.
    ///
    /// - an unrecognized payload publishes a `warning` and changes nothing
    /// - on a light that is not online nothing changes and nothing is sent
    /// - otherwise the state is updated and the echo suppression window is
    ///   extended if a command is sent; a `change` is published only if the
    ///   state or the infrared level actually moved
    pub fn apply(&self, input: &Value) -> ApplyOutcome {
        self.inner.apply(input)
    }

    /// Polls the device once and reconciles the reading.
    pub async fn refresh(&self) -> PollOutcome {
        self.inner.refresh().await
    }

    /// Feeds a transport reachability notification.
    ///
    /// Going offline stops polling. Coming online polls once right away; the
    /// light only turns online, accepts commands and restarts the poll task
    /// once that poll returns, and only if no later notification arrived in
    /// the meantime. Returns `true` if the notification was accepted.
    pub async fn set_reachable(&self, reachable: bool) -> bool {
        self.inner.set_reachable(reachable).await
    }

    /// Stops polling. The light stays usable for commands.
    pub fn stop(&self) {
        self.inner.stop_polling();
        tracing::debug!(light_id = %self.inner.id, "Light stopped");
    }

    /// Returns `true` while the poll task is running.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.inner
            .poll_task
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl<D: DeviceHandle> Clone for Light<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: DeviceHandle> fmt::Debug for Light<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Light")
            .field("id", &self.inner.id)
            .field("address", &self.inner.address)
            .field("capabilities", &self.inner.capabilities)
            .field("shared", &*self.inner.shared.lock())
            .finish_non_exhaustive()
    }
}

impl<D: DeviceHandle> Inner<D> {
    fn apply(self: &Arc<Self>, input: &Value) -> ApplyOutcome {
        let mut shared = self.shared.lock();

        let delta = match resolve(input, &shared.state, &self.capabilities) {
            Ok(delta) => delta,
            Err(unhandled) => {
                drop(shared);
                tracing::warn!(light_id = %self.id, input = %unhandled.input, "Unhandled input");
                self.events.publish(LightEvent::warning(
                    Some(self.id.as_str()),
                    "Unhandled input",
                    Some(unhandled.input),
                ));
                return ApplyOutcome::Unhandled;
            }
        };

        if !shared.reachability.is_online() {
            let reachability = shared.reachability;
            drop(shared);
            tracing::debug!(light_id = %self.id, %reachability, "Command dropped, light not reachable");
            return ApplyOutcome::Unreachable;
        }

        let previous = (shared.state, shared.max_ir);
        let was_on = shared.state.on();
        shared.state.merge(&delta);
        if delta.max_ir.is_some() {
            shared.max_ir = delta.max_ir;
        }
        let commands = plan(was_on, &shared.state, &delta);
        if !commands.is_empty() {
            shared
                .echo
                .extend(self.clock.now(), self.config.settle_margin(), delta.duration_ms);
        }

        let state = shared.state;
        let changed = !delta.is_empty() && (state, shared.max_ir) != previous;
        let message = changed.then(|| self.message(&shared));
        drop(shared);

        tracing::debug!(
            light_id = %self.id,
            on = state.on(),
            changed,
            commands = commands.len(),
            "Applied command"
        );
        if let Some(message) = message {
            self.state_tx.send_replace(state);
            self.events.publish(LightEvent::Change(message));
        }

        ApplyOutcome::Applied(self.dispatch(commands))
    }

    /// Sends `commands` in order on a background task. Stops at the first
    /// failure, which is logged and published as an `error` event.
    fn dispatch(self: &Arc<Self>, commands: Vec<DeviceCommand>) -> Dispatch {
        if commands.is_empty() {
            return Dispatch {
                commands,
                handle: None,
            };
        }

        let inner = Arc::clone(self);
        let planned = commands.clone();
        let handle = tokio::spawn(async move {
            for command in &planned {
                if let Err(error) = command.execute(&inner.device).await {
                    tracing::warn!(light_id = %inner.id, %command, %error, "Device command failed");
                    inner.events.publish(LightEvent::error(
                        Some(inner.id.as_str()),
                        "Command failed",
                        Some(command_failure(command, &error)),
                    ));
                    break;
                }
            }
        });

        Dispatch {
            commands,
            handle: Some(handle),
        }
    }

    async fn set_reachable(self: &Arc<Self>, reachable: bool) -> bool {
        if !reachable {
            return self.set_unreachable();
        }

        let generation = {
            let mut shared = self.shared.lock();
            if shared.reachability.next(true).is_none() {
                return false;
            }
            shared.generation += 1;
            shared.connecting = true;
            shared.generation
        };

        tracing::debug!(light_id = %self.id, "Light reachable, polling before going online");
        self.refresh().await;

        let mut shared = self.shared.lock();
        if shared.generation != generation {
            drop(shared);
            tracing::debug!(light_id = %self.id, "Superseded while polling, staying offline");
            return true;
        }
        shared.connecting = false;
        shared.reachability = Reachability::Online;
        // Started under the state lock, like the stop in `set_unreachable`.
        self.start_polling(Instant::now() + self.config.poll_interval());
        let message = self.message(&shared);
        drop(shared);

        tracing::info!(light_id = %self.id, reachability = %Reachability::Online, "Reachability changed");
        self.events.publish(LightEvent::Change(message));
        true
    }

    /// Handles an offline notification. Also cancels an online notification
    /// still waiting for its first poll.
    fn set_unreachable(&self) -> bool {
        let mut shared = self.shared.lock();
        if shared.reachability.next(false).is_none() && !shared.connecting {
            return false;
        }

        shared.generation += 1;
        shared.connecting = false;
        let previous = shared.reachability;
        shared.reachability = Reachability::Offline;
        self.stop_polling();
        let message = (previous != Reachability::Offline).then(|| self.message(&shared));
        drop(shared);

        tracing::info!(light_id = %self.id, reachability = %Reachability::Offline, "Reachability changed");
        if let Some(message) = message {
            self.events.publish(LightEvent::Change(message));
        }
        true
    }

    fn start_polling(self: &Arc<Self>, first_tick: Instant) {
        let task = spawn_poller(self, first_tick);
        if let Some(previous) = self.poll_task.lock().replace(task) {
            previous.abort();
        }
    }

    fn stop_polling(&self) {
        if let Some(task) = self.poll_task.lock().take() {
            task.abort();
        }
    }

    fn message(&self, shared: &Shared) -> StateMessage {
        StateMessage {
            id: self.id.clone(),
            info: LightInfo {
                id: self.id.clone(),
                label: shared.label.clone(),
                address: self.address.clone(),
                model: self.model.clone(),
                capability: self.capabilities.clone(),
                last_seen: shared.last_seen,
            },
            payload: StatePayload::new(
                &shared.state,
                &self.capabilities,
                shared.reachability.is_online(),
            ),
            state: shared.state,
            max_ir: shared.max_ir,
        }
    }
}

impl<D: DeviceHandle> Drop for Inner<D> {
    fn drop(&mut self) {
        if let Some(task) = self.poll_task.get_mut().take() {
            task.abort();
        }
    }
}

fn init_error(stage: InitStage) -> impl FnOnce(TransportError) -> Error {
    move |source| Error::Initialization { stage, source }
}

fn command_failure(command: &DeviceCommand, error: &TransportError) -> Value {
    json!({
        "command": command.to_string(),
        "error": error.to_string(),
    })
}

/// Result of [`Light::apply`].
#[derive(Debug)]
pub enum ApplyOutcome {
    /// The state was updated; the device commands are being sent.
    Applied(Dispatch),
    /// The payload was not understood. A `warning` was published.
    Unhandled,
    /// The light is not online. Nothing changed.
    Unreachable,
}

impl ApplyOutcome {
    /// Returns `true` if the state was updated.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// Returns the dispatch of an applied command.
    #[must_use]
    pub fn into_dispatch(self) -> Option<Dispatch> {
        match self {
            Self::Applied(dispatch) => Some(dispatch),
            Self::Unhandled | Self::Unreachable => None,
        }
    }
}

/// Device commands of one applied payload, sent in order in the background.
#[derive(Debug)]
pub struct Dispatch {
    commands: Vec<DeviceCommand>,
    handle: Option<JoinHandle<()>>,
}

impl Dispatch {
    /// Returns the planned commands.
    #[must_use]
    pub fn commands(&self) -> &[DeviceCommand] {
        &self.commands
    }

    /// Waits until every command was sent or one failed.
    pub async fn completed(self) {
        if let Some(handle) = self.handle
            && let Err(error) = handle.await
        {
            tracing::warn!(%error, "Command dispatch task ended abnormally");
        }
    }
}
