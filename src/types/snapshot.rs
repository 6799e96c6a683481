// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device snapshot.

use serde::{Deserialize, Serialize};

/// One consistent read of every attribute the plug exposes.
///
/// A snapshot is only ever assembled from the four readings of a single
/// polling pass. It is immutable: updating a field yields a new snapshot.
///
/// # Examples
///
/// ```
/// use w215_lib::types::DeviceSnapshot;
///
/// let snapshot = DeviceSnapshot::new(true, 42, 12.345, 21.5);
/// assert!(snapshot.power());
/// assert_eq!(snapshot.instantaneous_power(), 42);
///
/// let off = snapshot.with_power(false);
/// assert!(!off.power());
/// assert_eq!(off.instantaneous_power(), 42);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    power: bool,
    instantaneous_power: u32,
    cumulative_energy: f64,
    temperature: f64,
}

impl DeviceSnapshot {
    /// Creates a snapshot from the four readings of one pass.
    #[must_use]
    pub const fn new(
        power: bool,
        instantaneous_power: u32,
        cumulative_energy: f64,
        temperature: f64,
    ) -> Self {
        Self {
            power,
            instantaneous_power,
            cumulative_energy,
            temperature,
        }
    }

    /// Returns whether the relay is on.
    #[must_use]
    pub const fn power(&self) -> bool {
        self.power
    }

    /// Returns the instantaneous power draw in Watts.
    #[must_use]
    pub const fn instantaneous_power(&self) -> u32 {
        self.instantaneous_power
    }

    /// Returns the cumulative energy usage in kWh.
    #[must_use]
    pub const fn cumulative_energy(&self) -> f64 {
        self.cumulative_energy
    }

    /// Returns the device temperature in degrees Celsius.
    #[must_use]
    pub const fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Returns a copy of this snapshot with a different relay state.
    #[must_use]
    pub const fn with_power(self, power: bool) -> Self {
        Self { power, ..self }
    }
}
