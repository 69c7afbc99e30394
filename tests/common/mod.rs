// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Simulated bulb shared by the integration tests.
//!
//! Successful commands are applied to the reported state right away, like a
//! bulb with instant transitions. Tests overwrite the reported state to
//! simulate changes made by other controllers.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use lifx_bridge::{
    DeviceColor, DeviceHandle, DeviceState, HardwareInfo, InfraredLevel, ProductFeatures,
    TransportError,
};
use parking_lot::Mutex;

/// A command received by the bulb.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Color {
        hue: f64,
        saturation: f64,
        brightness: f64,
        kelvin: f64,
        duration_ms: u64,
    },
    Power {
        on: bool,
        duration_ms: u64,
    },
    Infrared(f64),
}

#[derive(Debug)]
struct Bulb {
    reported: DeviceState,
    hardware: HardwareInfo,
    max_ir: InfraredLevel,
    offline: bool,
    reject_commands: bool,
    state_delay: Option<Duration>,
    state_fetches: usize,
    sent: Vec<Sent>,
}

#[derive(Debug, Clone)]
pub struct FakeBulb {
    id: String,
    address: String,
    bulb: Arc<Mutex<Bulb>>,
}

impl FakeBulb {
    fn new(id: &str, product: &str, color: bool, infrared: bool) -> Self {
        let reported = DeviceState {
            power: 65535,
            color: DeviceColor {
                hue: 0.0,
                saturation: if color { 100.0 } else { 0.0 },
                brightness: 100.0,
                kelvin: 3500.0,
            },
            label: Some(format!("Bulb {id}")),
        };
        Self {
            id: id.to_string(),
            address: format!("192.168.1.{}", id.len() + 10),
            bulb: Arc::new(Mutex::new(Bulb {
                reported,
                hardware: HardwareInfo {
                    product_name: product.to_string(),
                    product_features: ProductFeatures { color, infrared },
                },
                max_ir: InfraredLevel { brightness: 0.0 },
                offline: false,
                reject_commands: false,
                state_delay: None,
                state_fetches: 0,
                sent: Vec::new(),
            })),
        }
    }

    /// A full color bulb.
    pub fn color(id: &str) -> Self {
        Self::new(id, "LIFX A19", true, false)
    }

    /// A white-only bulb.
    pub fn white(id: &str) -> Self {
        Self::new(id, "LIFX Mini White", false, false)
    }

    /// A color bulb with night vision.
    pub fn night_vision(id: &str) -> Self {
        Self::new(id, "LIFX A19 Night Vision", true, true)
    }

    /// Changes what the bulb reports, as another controller would.
    pub fn report(&self, change: impl FnOnce(&mut DeviceState)) {
        change(&mut self.bulb.lock().reported);
    }

    pub fn set_offline(&self, offline: bool) {
        self.bulb.lock().offline = offline;
    }

    pub fn reject_commands(&self, reject: bool) {
        self.bulb.lock().reject_commands = reject;
    }

    /// Makes state queries take `delay` to answer.
    pub fn delay_state(&self, delay: Duration) {
        self.bulb.lock().state_delay = Some(delay);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.bulb.lock().sent.clone()
    }

    pub fn clear_sent(&self) {
        self.bulb.lock().sent.clear();
    }

    pub fn state_fetches(&self) -> usize {
        self.bulb.lock().state_fetches
    }

    fn command(&self, sent: Sent, apply: impl FnOnce(&mut Bulb)) -> Result<(), TransportError> {
        let mut bulb = self.bulb.lock();
        if bulb.offline {
            return Err(TransportError::Unreachable(self.address.clone()));
        }
        if bulb.reject_commands {
            return Err(TransportError::Rejected("busy".to_string()));
        }
        bulb.sent.push(sent);
        apply(&mut bulb);
        Ok(())
    }
}

impl DeviceHandle for FakeBulb {
    fn id(&self) -> &str {
        &self.id
    }

    fn address(&self) -> &str {
        &self.address
    }

    async fn get_state(&self) -> Result<DeviceState, TransportError> {
        let (result, delay) = {
            let mut bulb = self.bulb.lock();
            bulb.state_fetches += 1;
            let result = if bulb.offline {
                Err(TransportError::Timeout(5000))
            } else {
                Ok(bulb.reported.clone())
            };
            (result, bulb.state_delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn get_hardware_version(&self) -> Result<HardwareInfo, TransportError> {
        let bulb = self.bulb.lock();
        if bulb.offline {
            return Err(TransportError::Timeout(5000));
        }
        Ok(bulb.hardware.clone())
    }

    async fn get_max_ir(&self) -> Result<InfraredLevel, TransportError> {
        let bulb = self.bulb.lock();
        if bulb.offline {
            return Err(TransportError::Timeout(5000));
        }
        Ok(bulb.max_ir)
    }

    async fn set_color(
        &self,
        hue: f64,
        saturation: f64,
        brightness: f64,
        kelvin: f64,
        duration_ms: u64,
    ) -> Result<(), TransportError> {
        let sent = Sent::Color {
            hue,
            saturation,
            brightness,
            kelvin,
            duration_ms,
        };
        self.command(sent, |bulb| {
            bulb.reported.color = DeviceColor {
                hue,
                saturation,
                brightness,
                kelvin,
            };
        })
    }

    async fn set_power(&self, on: bool, duration_ms: u64) -> Result<(), TransportError> {
        self.command(Sent::Power { on, duration_ms }, |bulb| {
            bulb.reported.power = if on { 65535 } else { 0 };
        })
    }

    async fn set_infrared_level(&self, level: f64) -> Result<(), TransportError> {
        self.command(Sent::Infrared(level), |bulb| {
            bulb.max_ir = InfraredLevel { brightness: level };
        })
    }
}
