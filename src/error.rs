// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `lifx_bridge` library.
//!
//! This module provides the error hierarchy used across the crate: value
//! validation, failures reported by the device transport, and light
//! lifecycle errors.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A value was rejected during validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The device handle reported a transport failure.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Initialization of a light failed at a specific stage.
    ///
    /// The light is never activated when this is returned.
    #[error("initialization failed while {stage}: {source}")]
    Initialization {
        /// What the initialization sequence was doing.
        stage: InitStage,
        /// The transport failure that aborted initialization.
        #[source]
        source: TransportError,
    },

    /// No active light matches the given id or label.
    #[error("light not found: {0}")]
    LightNotFound(String),

    /// A light with the same id is already registered.
    #[error("light already registered: {0}")]
    AlreadyRegistered(String),
}

/// Stages of the light initialization sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStage {
    /// Querying hardware metadata.
    HardwareInfo,
    /// Querying the current color and power state.
    State,
    /// Querying the maximum infrared level.
    InfraredLevel,
}

impl std::fmt::Display for InitStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stage = match self {
            Self::HardwareInfo => "reading hardware info",
            Self::State => "reading light state",
            Self::InfraredLevel => "reading infrared level",
        };
        f.write_str(stage)
    }
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A hex color string did not match `#RGB` or `#RRGGBB`.
    #[error("invalid hex color: {0}")]
    InvalidHexColor(String),

    /// A power state string was not recognized.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),

    /// A numeric value was not finite.
    #[error("{field} is not a finite number")]
    NotFinite {
        /// The field that carried the value.
        field: &'static str,
    },
}

/// Errors reported by a [`DeviceHandle`](crate::DeviceHandle).
///
/// The core never retries these; it only decides whether to propagate,
/// swallow, or publish them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The device did not answer in time.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// The device could not be reached.
    #[error("device unreachable: {0}")]
    Unreachable(String),

    /// The device answered with an error.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The device answered with data that could not be interpreted.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
