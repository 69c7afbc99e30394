// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry configuration.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::event::DEFAULT_CHANNEL_CAPACITY;

/// Shortest allowed poll interval.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default time added to every suppression window.
pub const DEFAULT_SETTLE_MARGIN: Duration = Duration::from_secs(2);

/// Configuration shared by every light of a [`LightRegistry`](super::LightRegistry).
///
/// Can be built in code or deserialized from host JSON, where `interval`
/// may be a number or a numeric string of milliseconds.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use lifx_bridge::manager::RegistryConfig;
///
/// let config = RegistryConfig::default()
///     .with_poll_interval(Duration::from_secs(2))
///     .with_event_capacity(64);
/// assert_eq!(config.poll_interval(), Duration::from_secs(2));
///
/// // Intervals below 500 ms are raised
/// let config = RegistryConfig::default().with_poll_interval(Duration::from_millis(10));
/// assert_eq!(config.poll_interval(), Duration::from_millis(500));
///
/// let config: RegistryConfig = serde_json::from_str(r#"{ "interval": "1500" }"#).unwrap();
/// assert_eq!(config.poll_interval(), Duration::from_millis(1500));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawConfig")]
pub struct RegistryConfig {
    poll_interval: Duration,
    settle_margin: Duration,
    event_capacity: usize,
}

impl RegistryConfig {
    /// Sets the poll interval, raised to at least [`MIN_POLL_INTERVAL`].
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// Sets the time added to every echo suppression window.
    #[must_use]
    pub fn with_settle_margin(mut self, margin: Duration) -> Self {
        self.settle_margin = margin;
        self
    }

    /// Sets the event channel capacity.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Returns the poll interval.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns the settle margin.
    #[must_use]
    pub const fn settle_margin(&self) -> Duration {
        self.settle_margin
    }

    /// Returns the event channel capacity.
    #[must_use]
    pub const fn event_capacity(&self) -> usize {
        self.event_capacity
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            poll_interval: MIN_POLL_INTERVAL,
            settle_margin: DEFAULT_SETTLE_MARGIN,
            event_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Host JSON shape, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawConfig {
    interval: Option<Value>,
    settle_margin: Option<u64>,
    event_capacity: Option<usize>,
}

impl From<RawConfig> for RegistryConfig {
    fn from(raw: RawConfig) -> Self {
        let mut config = Self::default();
        if let Some(millis) = raw.interval.as_ref().and_then(interval_millis) {
            config = config.with_poll_interval(Duration::from_millis(millis));
        }
        if let Some(millis) = raw.settle_margin {
            config = config.with_settle_margin(Duration::from_millis(millis));
        }
        if let Some(capacity) = raw.event_capacity {
            config = config.with_event_capacity(capacity);
        }
        config
    }
}

/// Reads a whole number of milliseconds from a number or a numeric string.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn interval_millis(value: &Value) -> Option<u64> {
    let millis = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (millis.is_finite() && millis >= 0.0).then(|| millis.floor() as u64)
}
