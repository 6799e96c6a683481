// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for DSP-W215 synchronization.
//!
//! # Types
//!
//! - [`DeviceSnapshot`] - One consistent read of all four plug attributes
//! - [`SwitchReading`] - A switch-state reply, either a state or the expiry sentinel
//!
//! The `parse_*` functions turn the raw text returned by a
//! [`Transport`](crate::protocol::Transport) into typed readings.

mod reading;
mod snapshot;

pub use reading::{
    EXPIRY_SENTINEL, SwitchReading, parse_cumulative_energy, parse_instantaneous_power,
    parse_temperature,
};
pub use snapshot::DeviceSnapshot;
