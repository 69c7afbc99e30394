// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light state and echo suppression.
//!
//! [`LightState`] is the in-process model of a light. It changes in two
//! ways: a resolved command is merged into it, or a device reading is
//! reconciled into it. [`EchoSuppression`] gates the second path for a short
//! time after the first.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use lifx_bridge::state::{Clock, EchoSuppression, ManualClock};
//!
//! let clock = ManualClock::new();
//! let mut echo = EchoSuppression::new();
//!
//! echo.extend(clock.now(), Duration::from_secs(2), 1000);
//! assert!(echo.is_suppressed(clock.now()));
//!
//! clock.advance(Duration::from_secs(3));
//! assert!(!echo.is_suppressed(clock.now()));
//! ```

mod echo;
mod light_state;

pub use echo::{Clock, EchoSuppression, ManualClock, TokioClock};
pub use light_state::{ColorMode, LightState};
