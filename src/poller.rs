// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State polling.
//!
//! A polling pass reads the switch state, recovers from session expiry by
//! logging in again (a bounded number of times), then reads cumulative
//! energy, instantaneous power and temperature one after the other. Either
//! all four readings make it into a [`DeviceSnapshot`] or the pass fails.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::protocol::{Transport, bounded};
use crate::session::SessionManager;
use crate::types::{
    DeviceSnapshot, SwitchReading, parse_cumulative_energy, parse_instantaneous_power,
    parse_temperature,
};

/// Default number of re-logins allowed within one pass.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Runs polling passes against one plug.
#[derive(Debug)]
pub struct StatePoller<T: Transport> {
    transport: Arc<T>,
    session: Arc<SessionManager<T>>,
    max_retries: u32,
    timeout: Duration,
}

impl<T: Transport> StatePoller<T> {
    pub(crate) fn new(
        transport: Arc<T>,
        session: Arc<SessionManager<T>>,
        max_retries: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            session,
            max_retries,
            timeout,
        }
    }

    /// Returns the number of re-logins allowed within one pass.
    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Runs one complete polling pass.
    ///
    /// # Errors
    ///
    /// - [`Error::RetriesExhausted`] if the session is still expired after
    ///   the allowed number of re-logins
    /// - [`Error::AuthenticationFailed`] if a re-login is rejected
    /// - [`Error::MalformedReading`] if a numeric reading does not parse
    /// - [`Error::Transport`] if a request fails or times out
    pub async fn poll(&self) -> Result<DeviceSnapshot> {
        let mut retries: u32 = 0;

        let power = loop {
            let token = bounded(self.timeout, self.transport.read_switch_state()).await?;

            match SwitchReading::from_token(&token) {
                SwitchReading::State(on) => break on,
                SwitchReading::Expired if retries >= self.max_retries => {
                    tracing::warn!(retries, "Session still expired, abandoning poll");
                    return Err(Error::RetriesExhausted { retries });
                }
                SwitchReading::Expired => {
                    retries += 1;
                    tracing::debug!(attempt = retries, "Session expired, logging in again");

                    self.session.invalidate();
                    if !self.session.login().await.is_authenticated() {
                        return Err(Error::AuthenticationFailed);
                    }
                }
            }
        };

        let energy = bounded(self.timeout, self.transport.read_cumulative_energy()).await?;
        let cumulative_energy = parse_cumulative_energy(&energy)?;
        let power_draw = bounded(self.timeout, self.transport.read_instantaneous_power()).await?;
        let instantaneous_power = parse_instantaneous_power(&power_draw)?;
        let temperature = bounded(self.timeout, self.transport.read_temperature()).await?;
        let temperature = parse_temperature(&temperature)?;

        let snapshot =
            DeviceSnapshot::new(power, instantaneous_power, cumulative_energy, temperature);
        tracing::debug!(?snapshot, retries, "Poll complete");

        Ok(snapshot)
    }
}
