// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HNAP command definitions.
//!
//! This module provides typed representations of the HNAP actions the
//! DSP-W215 understands. Every action is sent as a SOAP 1.1 envelope whose
//! body element is named after the action.
//!
//! # Available Commands
//!
//! | Command Type | Action | Answer element |
//! |-------------|---------|---------|
//! | [`LoginCommand`] | `Login` | `LoginResult` |
//! | [`SocketCommand`] | `GetSocketSettings`, `SetSocketSettings` | `OPStatus`, `SetSocketSettingsResult` |
//! | [`MeterCommand`] | `GetCurrentPowerConsumption`, `GetPMWarningThreshold`, `GetCurrentTemperature` | `CurrentConsumption`, `TotalConsumption`, `CurrentTemperature` |
//!
//! # Examples
//!
//! ```
//! use w215_lib::command::{Command, SocketCommand};
//!
//! let cmd = SocketCommand::Get;
//! assert_eq!(cmd.name(), "GetSocketSettings");
//! assert_eq!(cmd.response_element(), "OPStatus");
//! assert_eq!(
//!     cmd.soap_action(),
//!     "\"http://purenetworks.com/HNAP1/GetSocketSettings\""
//! );
//! ```

mod login;
mod meter;
mod socket;

pub use login::LoginCommand;
pub use meter::MeterCommand;
pub use socket::SocketCommand;

/// XML namespace of every HNAP action.
pub const HNAP1_XMLNS: &str = "http://purenetworks.com/HNAP1/";

/// Functional module of the plug addressed by an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleId {
    /// The relay.
    Socket,
    /// The power meter.
    Meter,
    /// The temperature sensor.
    Thermometer,
}

impl ModuleId {
    /// Returns the numeric module identifier used on the wire.
    #[must_use]
    pub const fn as_num(self) -> u8 {
        match self {
            Self::Socket => 1,
            Self::Meter => 2,
            Self::Thermometer => 3,
        }
    }

    pub(crate) fn parameter(self) -> String {
        format!("<ModuleID>{}</ModuleID>", self.as_num())
    }
}

/// An HNAP action that can be sent to the plug.
pub trait Command {
    /// Returns the action name, e.g. `"GetSocketSettings"`.
    fn name(&self) -> &'static str;

    /// Returns the element of the answer that carries the result.
    fn response_element(&self) -> &'static str;

    /// Returns the XML parameters placed inside the action element.
    fn parameters(&self) -> String;

    /// Returns the value of the `SOAPAction` header, quotes included.
    fn soap_action(&self) -> String {
        format!("\"{HNAP1_XMLNS}{}\"", self.name())
    }

    /// Returns the complete SOAP envelope for this action.
    fn to_envelope(&self) -> String {
        let name = self.name();
        format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <soap:Envelope xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
             xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\" \
             xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\">\
             <soap:Body><{name} xmlns=\"{HNAP1_XMLNS}\">{}</{name}></soap:Body>\
             </soap:Envelope>",
            self.parameters()
        )
    }
}

/// Escapes text for use inside an XML element.
pub(crate) fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_wraps_parameters() {
        let envelope = MeterCommand::Temperature.to_envelope();
        assert!(envelope.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(envelope.contains(
            "<soap:Body><GetCurrentTemperature xmlns=\"http://purenetworks.com/HNAP1/\">\
             <ModuleID>3</ModuleID></GetCurrentTemperature></soap:Body>"
        ));
        assert!(envelope.ends_with("</soap:Envelope>"));
    }

    #[test]
    fn soap_action_is_quoted() {
        assert_eq!(
            SocketCommand::Set(true).soap_action(),
            "\"http://purenetworks.com/HNAP1/SetSocketSettings\""
        );
    }

    #[test]
    fn module_parameter() {
        assert_eq!(ModuleId::Meter.parameter(), "<ModuleID>2</ModuleID>");
    }

    #[test]
    fn escape_xml_special_characters() {
        assert_eq!(escape_xml("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
        assert_eq!(escape_xml("admin"), "admin");
    }
}
