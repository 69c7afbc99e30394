// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reachability state machine.

use std::fmt;

use serde::Serialize;

/// Whether a light currently answers the transport.
///
/// ```text
/// Unknown ──reachable──▶ Online ◀──reachable── Offline
///                          └──────unreachable────▶┘
/// ```
///
/// Transitions come only from transport notifications. A light that never
/// became reachable stays `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reachability {
    /// Never reached yet.
    #[default]
    Unknown,
    /// Answering; polls run and commands are sent.
    Online,
    /// Lost; polling is stopped and commands are dropped.
    Offline,
}

impl Reachability {
    /// Returns the state after a transport notification, or `None` if the
    /// notification does not change anything.
    ///
    /// # Examples
    ///
    /// ```
    /// use lifx_bridge::light::Reachability;
    ///
    /// assert_eq!(Reachability::Unknown.next(true), Some(Reachability::Online));
    /// assert_eq!(Reachability::Unknown.next(false), None);
    /// assert_eq!(Reachability::Online.next(false), Some(Reachability::Offline));
    /// assert_eq!(Reachability::Online.next(true), None);
    /// ```
    #[must_use]
    pub const fn next(self, reachable: bool) -> Option<Self> {
        match (self, reachable) {
            (Self::Unknown | Self::Offline, true) => Some(Self::Online),
            (Self::Online, false) => Some(Self::Offline),
            (Self::Online, true) | (Self::Unknown | Self::Offline, false) => None,
        }
    }

    /// Returns `true` if the light is online.
    #[must_use]
    pub const fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }
}

impl fmt::Display for Reachability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unknown => "unknown",
            Self::Online => "online",
            Self::Offline => "offline",
        })
    }
}
