// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Echo suppression and the monotonic clock it reads.
//!
//! After a command is sent, the device keeps reporting its old values until
//! the transition has settled. Polls that land inside that window would
//! overwrite the state the command just set, so they are discarded until
//! the suppression deadline has passed.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/// Source of monotonic time.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// Clock backed by [`tokio::time::Instant`].
///
/// Follows the paused test clock when tokio's `test-util` is active.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same time.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use lifx_bridge::state::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_secs(3));
/// assert_eq!(clock.now() - start, Duration::from_secs(3));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    /// Creates a clock frozen at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

/// Deadline before which device readings are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EchoSuppression {
    deadline: Option<Instant>,
}

impl EchoSuppression {
    /// Creates an inactive suppression window.
    #[must_use]
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Returns the current deadline, if a command was ever sent.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` while readings must be discarded.
    #[must_use]
    pub fn is_suppressed(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now < deadline)
    }

    /// Extends the window for a command with the given transition time.
    ///
    /// The new deadline is `now + settle_margin + ceil(duration_ms / 1000)`
    /// seconds, and always strictly later than the previous one.
    pub fn extend(&mut self, now: Instant, settle_margin: Duration, duration_ms: u64) -> Instant {
        let transition = Duration::from_secs(duration_ms.div_ceil(1000));
        let mut deadline = now + settle_margin + transition;
        if let Some(previous) = self.deadline
            && deadline <= previous
        {
            deadline = previous + Duration::from_millis(1);
        }
        self.deadline = Some(deadline);
        deadline
    }
}
