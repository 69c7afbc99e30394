// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lenient readers for loosely-typed command payloads.

use std::borrow::Cow;

use serde_json::{Map, Value, json};

use crate::types::{PowerState, RgbColor};

/// A command payload normalized to object form.
#[derive(Debug)]
pub(crate) struct Payload<'a> {
    fields: Cow<'a, Map<String, Value>>,
}

impl<'a> Payload<'a> {
    /// Normalizes the scalar shorthands into an object.
    ///
    /// - `true`/`false` become `{on: ...}`
    /// - `"on"`, `"off"`, `"toggle"` (and `"true"`/`"false"`) become `{on: ...}`
    /// - a number `n` becomes `{on: true, bri: n}`
    ///
    /// Anything else that is not an object yields `None`.
    pub(crate) fn normalize(input: &'a Value) -> Option<Self> {
        let fields = match input {
            Value::Object(map) => Cow::Borrowed(map),
            Value::Bool(on) => Cow::Owned(object(json!({ "on": on }))),
            Value::String(s) => {
                let power = s.parse::<PowerState>().ok()?;
                Cow::Owned(object(json!({ "on": power.as_str() })))
            }
            Value::Number(n) => {
                let bri = n.as_f64().filter(|v| v.is_finite())?;
                Cow::Owned(object(json!({ "on": true, "bri": bri })))
            }
            Value::Null | Value::Array(_) => return None,
        };
        Some(Self { fields })
    }

    /// Reads a numeric field. Numeric strings are accepted; anything that is
    /// not a finite number is treated as absent.
    pub(crate) fn number(&self, key: &str) -> Option<f64> {
        let value = match self.fields.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value.filter(|v| v.is_finite())
    }

    /// Returns the first key in `keys` holding a number.
    pub(crate) fn first_number(&self, keys: &[&str]) -> Option<f64> {
        keys.iter().find_map(|key| self.number(key))
    }

    /// Returns `true` if any key in `keys` holds a number.
    pub(crate) fn has_number(&self, keys: &[&str]) -> bool {
        keys.iter().any(|key| self.number(key).is_some())
    }

    /// Reads a power field from a boolean, a number (zero is off) or one of
    /// the strings accepted by [`PowerState`].
    pub(crate) fn power(&self, key: &str) -> Option<PowerState> {
        match self.fields.get(key)? {
            Value::Bool(on) => Some(PowerState::from(*on)),
            Value::Number(n) => n.as_f64().and_then(PowerState::from_number),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Reads a hex color field. Malformed strings are treated as absent.
    pub(crate) fn hex(&self, key: &str) -> Option<RgbColor> {
        self.fields
            .get(key)?
            .as_str()
            .and_then(|s| RgbColor::from_hex(s).ok())
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
