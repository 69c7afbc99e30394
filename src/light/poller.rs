// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Poll loop and reconciliation.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::device::DeviceHandle;
use crate::event::LightEvent;
use crate::types::clamp_percent;

use super::Inner;

/// Result of one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollOutcome {
    /// The device reported different values; an `update` event was sent.
    Updated,
    /// The device agreed with the local state.
    Unchanged,
    /// A recent command is still settling; the reading was discarded.
    Suppressed,
    /// The device did not answer; the state was kept.
    Failed,
}

impl<D: DeviceHandle> Inner<D> {
    /// Fetches the device state, and the infrared level on infrared lights,
    /// then reconciles them unless echo suppression is active.
    pub(super) async fn refresh(&self) -> PollOutcome {
        let (reading, max_ir) = if self.capabilities.supports_infrared() {
            let (reading, max_ir) =
                tokio::join!(self.device.get_state(), self.device.get_max_ir());
            (reading, max_ir.ok())
        } else {
            (self.device.get_state().await, None)
        };

        let reading = match reading {
            Ok(reading) => reading,
            Err(error) => {
                tracing::debug!(light_id = %self.id, %error, "Poll failed");
                return PollOutcome::Failed;
            }
        };

        let mut shared = self.shared.lock();
        shared.last_seen = Some(Utc::now());

        if shared.echo.is_suppressed(self.clock.now()) {
            drop(shared);
            tracing::trace!(light_id = %self.id, "Poll suppressed while command settles");
            return PollOutcome::Suppressed;
        }

        if let Some(label) = reading.label.clone() {
            shared.label = Some(label);
        }

        let mut changed = shared.state.reconcile(&reading);
        if let Some(level) = max_ir.map(|ir| clamp_percent(ir.brightness))
            && shared.max_ir != Some(level)
        {
            shared.max_ir = Some(level);
            changed = true;
        }

        if !changed {
            return PollOutcome::Unchanged;
        }

        let state = shared.state;
        let message = self.message(&shared);
        drop(shared);

        tracing::debug!(light_id = %self.id, on = state.on(), "Device state changed");
        self.state_tx.send_replace(state);
        self.events.publish(LightEvent::Update(message));
        PollOutcome::Updated
    }
}

/// Spawns the periodic poll task of a light.
///
/// The task only holds a weak reference, so it ends on its own once the
/// light is dropped.
pub(super) fn spawn_poller<D: DeviceHandle>(
    inner: &Arc<Inner<D>>,
    first_tick: Instant,
) -> JoinHandle<()> {
    let weak = Arc::downgrade(inner);
    let period = inner.config.poll_interval();

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(first_tick, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let Some(inner) = weak.upgrade() else {
                break;
            };
            inner.refresh().await;
        }
    })
}
