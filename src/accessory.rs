// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory descriptors for home-automation hosts.
//!
//! The plug is exposed as three services: a switch, a power meter and a
//! temperature sensor. Each attribute a host can read or write is described
//! by a static [`AttributeDescriptor`] carrying its identifier, format, unit,
//! bounds and permissions. The power meter attributes use vendor-specific
//! identifiers; the others are standard HomeKit types.
//!
//! # Examples
//!
//! ```
//! use w215_lib::accessory::{CONSUMPTION, TOTAL_CONSUMPTION};
//!
//! assert!(CONSUMPTION.validate(1500.0).is_ok());
//! assert!(CONSUMPTION.validate(12_000.0).is_err());
//! assert!(TOTAL_CONSUMPTION.validate(12.345).is_ok());
//! ```

use serde::Serialize;
use uuid::Uuid;

use crate::error::ValueError;
use crate::types::DeviceSnapshot;

/// Value format of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Boolean.
    Bool,
    /// Unsigned 16-bit integer.
    Uint16,
    /// Floating point number.
    Float,
}

impl Format {
    /// Returns whether values of this format are whole numbers.
    #[must_use]
    pub const fn is_integral(self) -> bool {
        matches!(self, Self::Uint16)
    }
}

/// Unit of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Watts.
    Watts,
    /// Kilowatt-hours.
    KilowattHours,
    /// Degrees Celsius.
    Celsius,
}

/// Operations a host may perform on an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Permissions {
    /// The host may read the value.
    pub read: bool,
    /// The host may write the value.
    pub write: bool,
    /// The host may subscribe to changes.
    pub notify: bool,
}

impl Permissions {
    /// Read and notify.
    pub const READ_NOTIFY: Self = Self {
        read: true,
        write: false,
        notify: true,
    };

    /// Read, write and notify.
    pub const READ_WRITE_NOTIFY: Self = Self {
        read: true,
        write: true,
        notify: true,
    };
}

/// Static description of one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttributeDescriptor {
    /// Type identifier.
    pub uuid: Uuid,
    /// Display name.
    pub name: &'static str,
    /// Value format.
    pub format: Format,
    /// Unit, if the value has one.
    pub unit: Option<Unit>,
    /// Smallest accepted value.
    pub min: Option<f64>,
    /// Largest accepted value.
    pub max: Option<f64>,
    /// Value granularity.
    pub step: Option<f64>,
    /// Allowed operations.
    pub permissions: Permissions,
}

impl AttributeDescriptor {
    /// Checks a numeric value against the declared bounds.
    ///
    /// Integral formats also require the value to sit on the step grid.
    ///
    /// # Errors
    ///
    /// - [`ValueError::NotNumeric`] for boolean attributes
    /// - [`ValueError::OutOfRange`] if the value is outside `[min, max]` or
    ///   not a number
    /// - [`ValueError::InvalidStep`] if an integral value is off-grid
    pub fn validate(&self, value: f64) -> Result<(), ValueError> {
        if self.format == Format::Bool {
            return Err(ValueError::NotNumeric(self.name));
        }

        let min = self.min.unwrap_or(f64::NEG_INFINITY);
        let max = self.max.unwrap_or(f64::INFINITY);
        if !(min..=max).contains(&value) {
            return Err(ValueError::OutOfRange {
                attribute: self.name,
                min,
                max,
                actual: value,
            });
        }

        if let Some(step) = self.step.filter(|_| self.format.is_integral()) {
            let offset = (value - self.min.unwrap_or(0.0)) / step;
            if offset.fract().abs() > f64::EPSILON {
                return Err(ValueError::InvalidStep {
                    attribute: self.name,
                    step,
                    actual: value,
                });
            }
        }

        Ok(())
    }
}

/// Relay state.
pub const ON: AttributeDescriptor = AttributeDescriptor {
    uuid: Uuid::from_u128(0x0000_0025_0000_1000_8000_0026_BB76_5291),
    name: "On",
    format: Format::Bool,
    unit: None,
    min: None,
    max: None,
    step: None,
    permissions: Permissions::READ_WRITE_NOTIFY,
};

/// Instantaneous power draw.
pub const CONSUMPTION: AttributeDescriptor = AttributeDescriptor {
    uuid: Uuid::from_u128(0x2E05_E08B_37AA_4113_8407_D99D_41B7_4682),
    name: "Consumption",
    format: Format::Uint16,
    unit: Some(Unit::Watts),
    min: Some(0.0),
    max: Some(10_000.0),
    step: Some(1.0),
    permissions: Permissions::READ_NOTIFY,
};

/// Cumulative energy usage.
pub const TOTAL_CONSUMPTION: AttributeDescriptor = AttributeDescriptor {
    uuid: Uuid::from_u128(0x4B29_EE79_2464_461F_9DA7_F239_0FD1_8207),
    name: "Total Consumption",
    format: Format::Float,
    unit: Some(Unit::KilowattHours),
    min: Some(0.0),
    max: Some(1_000_000_000.0),
    step: Some(0.001),
    permissions: Permissions::READ_NOTIFY,
};

/// Device temperature.
pub const CURRENT_TEMPERATURE: AttributeDescriptor = AttributeDescriptor {
    uuid: Uuid::from_u128(0x0000_0011_0000_1000_8000_0026_BB76_5291),
    name: "Current Temperature",
    format: Format::Float,
    unit: Some(Unit::Celsius),
    min: Some(-270.0),
    max: Some(100.0),
    step: Some(0.1),
    permissions: Permissions::READ_NOTIFY,
};

/// Static description of one service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ServiceDescriptor {
    /// Type identifier.
    pub uuid: Uuid,
    /// Service kind.
    pub name: &'static str,
    /// Attributes the service exposes.
    pub attributes: &'static [AttributeDescriptor],
}

/// Relay service.
pub const SWITCH_SERVICE: ServiceDescriptor = ServiceDescriptor {
    uuid: Uuid::from_u128(0x0000_0049_0000_1000_8000_0026_BB76_5291),
    name: "Switch",
    attributes: &[ON],
};

/// Power meter service.
pub const POWER_METER_SERVICE: ServiceDescriptor = ServiceDescriptor {
    uuid: Uuid::from_u128(0xEB30_422F_0872_4D62_82C0_E6DE_A9A4_557A),
    name: "Power Meter",
    attributes: &[CONSUMPTION, TOTAL_CONSUMPTION],
};

/// Temperature sensor service.
pub const TEMPERATURE_SERVICE: ServiceDescriptor = ServiceDescriptor {
    uuid: Uuid::from_u128(0x0000_008A_0000_1000_8000_0026_BB76_5291),
    name: "Temperature Sensor",
    attributes: &[CURRENT_TEMPERATURE],
};

/// Services exposed by the plug, in presentation order.
pub const SERVICES: [ServiceDescriptor; 3] =
    [SWITCH_SERVICE, POWER_METER_SERVICE, TEMPERATURE_SERVICE];

/// Fixed identity reported to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessoryInformation {
    /// Manufacturer name.
    pub manufacturer: &'static str,
    /// Model name.
    pub model: &'static str,
    /// Serial number.
    pub serial_number: &'static str,
    /// Display name.
    pub name: String,
}

impl AccessoryInformation {
    /// Manufacturer reported for every plug.
    pub const MANUFACTURER: &'static str = "D-Link";
    /// Model reported for every plug.
    pub const MODEL: &'static str = "DSP W215";
    /// Serial number reported for every plug.
    pub const SERIAL_NUMBER: &'static str = "123456789";

    /// Creates the identity of a plug with the given display name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            manufacturer: Self::MANUFACTURER,
            model: Self::MODEL,
            serial_number: Self::SERIAL_NUMBER,
            name: name.into(),
        }
    }
}

/// Checks every numeric field of a snapshot against its descriptor.
///
/// The temperature is not checked: the plug reports whatever its sensor
/// reads.
///
/// # Errors
///
/// Returns the first bound violation.
pub fn validate_snapshot(snapshot: &DeviceSnapshot) -> Result<(), ValueError> {
    CONSUMPTION.validate(f64::from(snapshot.instantaneous_power()))?;
    TOTAL_CONSUMPTION.validate(snapshot.cumulative_energy())
}
