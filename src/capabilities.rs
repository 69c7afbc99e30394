// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light capability detection.
//!
//! A [`CapabilitySet`] is derived once from the hardware metadata reported
//! during initialization and never changes afterwards. It gates two
//! behaviors:
//!
//! - whether hue and saturation are forwarded to the device, or only used to
//!   extract a brightness value
//! - whether infrared level commands are sent at all
//!
//! Capabilities can also be built manually, which is mostly useful in tests.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::device::HardwareInfo;

/// A single light feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    /// Full hue/saturation color control.
    Color,
    /// Color temperature (white balance) control.
    Temperature,
    /// Infrared night-vision LEDs.
    Infrared,
}

impl Capability {
    /// Returns the lowercase name used in host payloads.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Temperature => "temperature",
            Self::Infrared => "infrared",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of capabilities of one light.
///
/// # Examples
///
/// ```
/// use lifx_bridge::{Capability, CapabilitySet};
///
/// let caps = CapabilitySet::builder().with_color().with_infrared().build();
/// assert!(caps.contains(Capability::Color));
/// assert!(caps.contains(Capability::Temperature));
/// assert!(caps.supports_infrared());
///
/// let white = CapabilitySet::builder().build();
/// assert!(!white.supports_color());
/// assert_eq!(white.names(), vec!["temperature"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    /// Returns a builder. Temperature is always included.
    #[must_use]
    pub fn builder() -> CapabilitySetBuilder {
        CapabilitySetBuilder::default()
    }

    /// Derives the capabilities from hardware metadata.
    ///
    /// Temperature is assumed for every light; color and infrared come from
    /// the product feature flags.
    #[must_use]
    pub fn from_hardware(info: &HardwareInfo) -> Self {
        let mut builder = Self::builder();
        if info.product_features.color {
            builder = builder.with_color();
        }
        if info.product_features.infrared {
            builder = builder.with_infrared();
        }
        builder.build()
    }

    /// Returns `true` if the set contains `capability`.
    #[must_use]
    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    /// Returns `true` if hue and saturation can be sent to the light.
    #[must_use]
    pub fn supports_color(&self) -> bool {
        self.contains(Capability::Color)
    }

    /// Returns `true` if the light has a color temperature.
    #[must_use]
    pub fn supports_temperature(&self) -> bool {
        self.contains(Capability::Temperature)
    }

    /// Returns `true` if the light accepts infrared levels.
    #[must_use]
    pub fn supports_infrared(&self) -> bool {
        self.contains(Capability::Infrared)
    }

    /// Iterates over the capabilities in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }

    /// Returns the lowercase capability names.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(|c| c.as_str()).collect()
    }
}

impl Default for CapabilitySet {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`CapabilitySet`].
#[derive(Debug, Clone, Default)]
pub struct CapabilitySetBuilder {
    color: bool,
    infrared: bool,
}

impl CapabilitySetBuilder {
    /// Enables color control.
    #[must_use]
    pub fn with_color(mut self) -> Self {
        self.color = true;
        self
    }

    /// Enables infrared control.
    #[must_use]
    pub fn with_infrared(mut self) -> Self {
        self.infrared = true;
        self
    }

    /// Builds the capability set.
    #[must_use]
    pub fn build(self) -> CapabilitySet {
        let mut set = BTreeSet::from([Capability::Temperature]);
        if self.color {
            set.insert(Capability::Color);
        }
        if self.infrared {
            set.insert(Capability::Infrared);
        }
        CapabilitySet(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::ProductFeatures;

    fn hardware(color: bool, infrared: bool) -> HardwareInfo {
        HardwareInfo {
            product_name: "LIFX Test".to_string(),
            product_features: ProductFeatures { color, infrared },
        }
    }

    #[test]
    fn temperature_is_always_present() {
        let caps = CapabilitySet::from_hardware(&hardware(false, false));
        assert!(caps.supports_temperature());
        assert!(!caps.supports_color());
        assert!(!caps.supports_infrared());
    }

    #[test]
    fn from_hardware_reads_feature_flags() {
        let caps = CapabilitySet::from_hardware(&hardware(true, true));
        assert!(caps.supports_color());
        assert!(caps.supports_infrared());

        let caps = CapabilitySet::from_hardware(&hardware(false, true));
        assert!(!caps.supports_color());
        assert!(caps.supports_infrared());
    }

    #[test]
    fn names_are_lowercase_and_ordered() {
        let caps = CapabilitySet::builder().with_infrared().with_color().build();
        assert_eq!(caps.names(), vec!["color", "temperature", "infrared"]);
    }

    #[test]
    fn serializes_as_name_list() {
        let caps = CapabilitySet::builder().with_color().build();
        let json = serde_json::to_value(&caps).unwrap();
        assert_eq!(json, serde_json::json!(["color", "temperature"]));
    }

    #[test]
    fn serialized_name_matches_as_str() {
        for capability in [Capability::Color, Capability::Temperature, Capability::Infrared] {
            let json = serde_json::to_value(capability).unwrap();
            assert_eq!(json, capability.as_str());
        }
    }
}
