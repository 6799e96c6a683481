// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plug event types.

use serde::Serialize;

use crate::types::DeviceSnapshot;

/// Events emitted by a plug device.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlugEvent {
    /// A polling pass produced a new snapshot.
    SnapshotUpdated(DeviceSnapshot),

    /// A switch command completed.
    PowerChanged {
        /// Relay state reported by the device.
        on: bool,
    },

    /// The session was established or lost.
    SessionChanged {
        /// Whether the plug now accepts our requests.
        authenticated: bool,
    },
}

impl PlugEvent {
    /// Returns the relay state carried by this event, if any.
    #[must_use]
    pub fn power(&self) -> Option<bool> {
        match self {
            Self::SnapshotUpdated(snapshot) => Some(snapshot.power()),
            Self::PowerChanged { on } => Some(*on),
            Self::SessionChanged { .. } => None,
        }
    }
}
