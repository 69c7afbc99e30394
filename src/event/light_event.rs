// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light event types.

use serde::Serialize;
use serde_json::Value;

use super::StateMessage;

/// Events published to the host.
///
/// Serializes with an `event` discriminator: `new`, `change`, `update`,
/// `warning` or `error`.
///
/// | Event | When |
/// |-------|------|
/// | `New` | a light finished initialization |
/// | `Change` | local intent changed the light (command, reachability) |
/// | `Update` | a poll observed a different device state |
/// | `Warning` | a payload was not understood |
/// | `Error` | initialization or a device command failed |
///
/// # Examples
///
/// ```
/// use lifx_bridge::event::LightEvent;
/// use serde_json::json;
///
/// let event = LightEvent::warning(Some("d073d5000001"), "Unhandled input", Some(json!("dim")));
/// assert!(event.is_warning());
/// assert_eq!(event.light_id(), Some("d073d5000001"));
///
/// let json = serde_json::to_value(&event).unwrap();
/// assert_eq!(json["event"], "warning");
/// assert_eq!(json["detail"], "dim");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum LightEvent {
    /// A light was added.
    New(StateMessage),

    /// A light changed because of local intent.
    Change(StateMessage),

    /// A light changed because the device reported different values.
    Update(StateMessage),

    /// Something was ignored.
    Warning {
        /// The light concerned, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Human readable message.
        message: String,
        /// Additional context.
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<Value>,
    },

    /// Something failed.
    Error {
        /// The light concerned, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Human readable message.
        message: String,
        /// Additional context.
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<Value>,
    },
}

impl LightEvent {
    /// Creates a warning event.
    #[must_use]
    pub fn warning(id: Option<&str>, message: impl Into<String>, detail: Option<Value>) -> Self {
        Self::Warning {
            id: id.map(str::to_string),
            message: message.into(),
            detail,
        }
    }

    /// Creates an error event.
    #[must_use]
    pub fn error(id: Option<&str>, message: impl Into<String>, detail: Option<Value>) -> Self {
        Self::Error {
            id: id.map(str::to_string),
            message: message.into(),
            detail,
        }
    }

    /// Returns the light this event concerns, if any.
    #[must_use]
    pub fn light_id(&self) -> Option<&str> {
        match self {
            Self::New(message) | Self::Change(message) | Self::Update(message) => {
                Some(&message.id)
            }
            Self::Warning { id, .. } | Self::Error { id, .. } => id.as_deref(),
        }
    }

    /// Returns the state snapshot carried by `new`, `change` and `update`.
    #[must_use]
    pub fn state_message(&self) -> Option<&StateMessage> {
        match self {
            Self::New(message) | Self::Change(message) | Self::Update(message) => Some(message),
            Self::Warning { .. } | Self::Error { .. } => None,
        }
    }

    /// Returns the `event` discriminator.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::New(_) => "new",
            Self::Change(_) => "change",
            Self::Update(_) => "update",
            Self::Warning { .. } => "warning",
            Self::Error { .. } => "error",
        }
    }

    /// Returns `true` for `new`.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        matches!(self, Self::New(_))
    }

    /// Returns `true` for `change`.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        matches!(self, Self::Change(_))
    }

    /// Returns `true` for `update`.
    #[must_use]
    pub const fn is_update(&self) -> bool {
        matches!(self, Self::Update(_))
    }

    /// Returns `true` for `warning`.
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::Warning { .. })
    }

    /// Returns `true` for `error`.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}
