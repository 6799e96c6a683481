// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Metering commands.
//!
//! Power and energy are read from the meter module, temperature from the
//! thermometer module.

use crate::command::{Command, ModuleId};

/// Command to query one of the plug's sensor readings.
///
/// # Examples
///
/// ```
/// use w215_lib::command::{Command, MeterCommand};
///
/// let cmd = MeterCommand::TotalConsumption;
/// assert_eq!(cmd.name(), "GetPMWarningThreshold");
/// assert_eq!(cmd.response_element(), "TotalConsumption");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeterCommand {
    /// Instantaneous power draw in Watts.
    CurrentConsumption,
    /// Cumulative energy in kWh.
    TotalConsumption,
    /// Temperature in degrees Celsius.
    Temperature,
}

impl MeterCommand {
    const fn module(self) -> ModuleId {
        match self {
            Self::CurrentConsumption | Self::TotalConsumption => ModuleId::Meter,
            Self::Temperature => ModuleId::Thermometer,
        }
    }
}

impl Command for MeterCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::CurrentConsumption => "GetCurrentPowerConsumption",
            Self::TotalConsumption => "GetPMWarningThreshold",
            Self::Temperature => "GetCurrentTemperature",
        }
    }

    fn response_element(&self) -> &'static str {
        match self {
            Self::CurrentConsumption => "CurrentConsumption",
            Self::TotalConsumption => "TotalConsumption",
            Self::Temperature => "CurrentTemperature",
        }
    }

    fn parameters(&self) -> String {
        self.module().parameter()
    }
}
