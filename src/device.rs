// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device handle contract.
//!
//! The network side of a light (discovery, packet framing, retries) lives
//! outside this crate. A transport exposes each discovered bulb as a
//! [`DeviceHandle`]; this crate only calls the contract and trusts its
//! results.
//!
//! All values use the units of the LIFX LAN protocol after scaling: hue in
//! degrees, saturation and brightness in percent, temperature in Kelvin and
//! durations in milliseconds.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// Color reported by a device.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviceColor {
    /// Hue in degrees.
    pub hue: f64,
    /// Saturation in percent.
    pub saturation: f64,
    /// Brightness in percent.
    pub brightness: f64,
    /// Color temperature in Kelvin.
    pub kelvin: f64,
}

/// State reported by a device.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviceState {
    /// Power level; any non-zero value means on.
    pub power: u16,
    /// Current color.
    pub color: DeviceColor,
    /// User-assigned label, if the device reported one.
    pub label: Option<String>,
}

impl DeviceState {
    /// Returns `true` if the device reports power on.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.power != 0
    }
}

/// Product feature flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFeatures {
    /// Full color support.
    pub color: bool,
    /// Infrared LEDs.
    pub infrared: bool,
}

/// Hardware metadata reported by a device.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareInfo {
    /// Marketing product name, used as the light model.
    pub product_name: String,
    /// Feature flags.
    pub product_features: ProductFeatures,
}

/// Maximum infrared level reported by a device.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InfraredLevel {
    /// Level in percent.
    pub brightness: f64,
}

/// Contract of a single physical light.
///
/// Every operation is asynchronous and yields exactly one result. The
/// returned futures must be `Send` because polling and command dispatch run
/// on spawned tasks.
///
/// Implementations usually write the methods as `async fn`:
///
/// ```
/// use lifx_bridge::device::{DeviceHandle, DeviceState, HardwareInfo, InfraredLevel};
/// use lifx_bridge::error::TransportError;
///
/// struct Offline {
///     id: String,
/// }
///
/// impl DeviceHandle for Offline {
///     fn id(&self) -> &str {
///         &self.id
///     }
///
///     fn address(&self) -> &str {
///         "192.168.1.20"
///     }
///
///     async fn get_state(&self) -> Result<DeviceState, TransportError> {
///         Err(TransportError::Timeout(1000))
///     }
///
///     async fn get_hardware_version(&self) -> Result<HardwareInfo, TransportError> {
///         Err(TransportError::Timeout(1000))
///     }
///
///     async fn get_max_ir(&self) -> Result<InfraredLevel, TransportError> {
///         Err(TransportError::Timeout(1000))
///     }
///
///     async fn set_color(&self, _: f64, _: f64, _: f64, _: f64, _: u64) -> Result<(), TransportError> {
///         Ok(())
///     }
///
///     async fn set_power(&self, _: bool, _: u64) -> Result<(), TransportError> {
///         Ok(())
///     }
///
///     async fn set_infrared_level(&self, _: f64) -> Result<(), TransportError> {
///         Ok(())
///     }
/// }
/// ```
pub trait DeviceHandle: Send + Sync + 'static {
    /// Returns the stable device identifier.
    fn id(&self) -> &str;

    /// Returns the network address of the device.
    fn address(&self) -> &str;

    /// Fetches power, color and label.
    fn get_state(&self) -> impl Future<Output = Result<DeviceState, TransportError>> + Send;

    /// Fetches product metadata.
    fn get_hardware_version(
        &self,
    ) -> impl Future<Output = Result<HardwareInfo, TransportError>> + Send;

    /// Fetches the maximum infrared level. Only called on infrared lights.
    fn get_max_ir(&self) -> impl Future<Output = Result<InfraredLevel, TransportError>> + Send;

    /// Sets the color, fading over `duration_ms`.
    fn set_color(
        &self,
        hue: f64,
        saturation: f64,
        brightness: f64,
        kelvin: f64,
        duration_ms: u64,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Switches power, fading over `duration_ms`.
    fn set_power(
        &self,
        on: bool,
        duration_ms: u64,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Sets the maximum infrared level in percent.
    fn set_infrared_level(&self, level: f64)
    -> impl Future<Output = Result<(), TransportError>> + Send;
}
