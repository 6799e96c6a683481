// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Relay commands.

use crate::command::{Command, ModuleId};

/// Command to query or switch the relay.
///
/// # Examples
///
/// ```
/// use w215_lib::command::{Command, SocketCommand};
///
/// let on = SocketCommand::Set(true);
/// assert_eq!(on.name(), "SetSocketSettings");
/// assert!(on.parameters().contains("<OPStatus>true</OPStatus>"));
///
/// let query = SocketCommand::Get;
/// assert_eq!(query.parameters(), "<ModuleID>1</ModuleID>");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketCommand {
    /// Query the relay state.
    Get,
    /// Switch the relay on (`true`) or off (`false`).
    Set(bool),
}

impl SocketCommand {
    /// Result the device returns when a switch command is accepted.
    pub const ACCEPTED: &'static str = "OK";
}

impl Command for SocketCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::Get => "GetSocketSettings",
            Self::Set(_) => "SetSocketSettings",
        }
    }

    fn response_element(&self) -> &'static str {
        match self {
            Self::Get => "OPStatus",
            Self::Set(_) => "SetSocketSettingsResult",
        }
    }

    fn parameters(&self) -> String {
        let module = ModuleId::Socket.parameter();
        match self {
            Self::Get => module,
            Self::Set(on) => format!(
                "{module}<NickName>Socket 1</NickName><Description>Socket 1</Description>\
                 <OPStatus>{on}</OPStatus><Controller>1</Controller>"
            ),
        }
    }
}
