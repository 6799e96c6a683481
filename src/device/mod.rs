// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level device abstraction for the DSP-W215 smart plug.
//!
//! A [`PlugDevice`] owns one transport, the session with the plug, the last
//! known [`DeviceSnapshot`] and an event bus. Every read runs a full polling
//! pass so the value returned is always fresh; there is no cache.
//!
//! ```no_run
//! use w215_lib::{PlugConfig, PlugDevice};
//!
//! # async fn example() -> w215_lib::Result<()> {
//! let config = PlugConfig::new("192.168.0.20", "123456");
//! let device = PlugDevice::from_config(&config)?.connect().await;
//!
//! let watts = device.read_instantaneous_power().await?;
//! println!("Drawing {watts} W");
//!
//! device.write_power(false).await?;
//! # Ok(())
//! # }
//! ```

mod builder;

pub use builder::PlugDeviceBuilder;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::broadcast;

use crate::accessory::AccessoryInformation;
use crate::error::{Error, Result, TransportError};
use crate::event::{EventBus, PlugEvent};
use crate::poller::StatePoller;
use crate::protocol::{Credentials, Transport, bounded};
use crate::session::{Session, SessionManager};
use crate::types::{DeviceSnapshot, EXPIRY_SENTINEL};

#[cfg(feature = "hnap")]
use crate::config::PlugConfig;
#[cfg(feature = "hnap")]
use crate::protocol::HnapClient;

/// A DSP-W215 smart plug.
///
/// Polling passes and switch commands are serialized per device: while one
/// exchange is in flight, later callers wait and then run their own.
///
/// # Type Parameter
///
/// `T` is the transport used to reach the plug, [`HnapClient`] in
/// production.
#[derive(Debug)]
pub struct PlugDevice<T: Transport> {
    transport: Arc<T>,
    session: Arc<SessionManager<T>>,
    poller: StatePoller<T>,
    snapshot: RwLock<DeviceSnapshot>,
    exchange: tokio::sync::Mutex<()>,
    events: EventBus,
    name: String,
    timeout: Duration,
}

impl<T: Transport> PlugDevice<T> {
    /// Starts building a device around an existing transport.
    #[must_use]
    pub fn builder(transport: T, credentials: Credentials) -> PlugDeviceBuilder<T> {
        PlugDeviceBuilder::new(transport, credentials)
    }

    pub(crate) fn new(
        transport: T,
        credentials: Credentials,
        name: String,
        timeout: Duration,
        max_retries: u32,
    ) -> Self {
        let transport = Arc::new(transport);
        let events = EventBus::new();
        let session = Arc::new(SessionManager::new(
            Arc::clone(&transport),
            credentials,
            timeout,
            events.clone(),
        ));
        let poller = StatePoller::new(
            Arc::clone(&transport),
            Arc::clone(&session),
            max_retries,
            timeout,
        );

        Self {
            transport,
            session,
            poller,
            snapshot: RwLock::new(DeviceSnapshot::default()),
            exchange: tokio::sync::Mutex::new(()),
            events,
            name,
            timeout,
        }
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the identity reported to the host.
    #[must_use]
    pub fn information(&self) -> AccessoryInformation {
        AccessoryInformation::new(&self.name)
    }

    /// Returns the last known snapshot without contacting the plug.
    ///
    /// Before the first successful pass this is the default snapshot
    /// (off, zero readings).
    #[must_use]
    pub fn snapshot(&self) -> DeviceSnapshot {
        *self.snapshot.read()
    }

    /// Returns the current session state.
    #[must_use]
    pub fn session(&self) -> Session {
        self.session.session()
    }

    /// Subscribes to events published by this device.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PlugEvent> {
        self.events.subscribe()
    }

    /// Logs in to the plug.
    ///
    /// A rejected login is reported through the returned session, not as an
    /// error.
    pub async fn login(&self) -> Session {
        let _exchange = self.exchange.lock().await;
        self.session.login().await
    }

    /// Runs a polling pass and returns the fresh snapshot.
    ///
    /// # Errors
    ///
    /// Returns the error of the failed pass; the held snapshot is left
    /// untouched in that case.
    pub async fn poll(&self) -> Result<DeviceSnapshot> {
        let _exchange = self.exchange.lock().await;

        let snapshot = self.poller.poll().await?;
        *self.snapshot.write() = snapshot;
        self.events.publish(PlugEvent::SnapshotUpdated(snapshot));

        Ok(snapshot)
    }

    // ========== Reads ==========

    /// Reads whether the relay is on.
    ///
    /// # Errors
    ///
    /// Returns error if the polling pass fails.
    pub async fn read_power(&self) -> Result<bool> {
        Ok(self.poll().await?.power())
    }

    /// Reads the instantaneous power draw in Watts.
    ///
    /// # Errors
    ///
    /// Returns error if the polling pass fails.
    pub async fn read_instantaneous_power(&self) -> Result<u32> {
        Ok(self.poll().await?.instantaneous_power())
    }

    /// Reads the cumulative energy usage in kWh.
    ///
    /// # Errors
    ///
    /// Returns error if the polling pass fails.
    pub async fn read_cumulative_energy(&self) -> Result<f64> {
        Ok(self.poll().await?.cumulative_energy())
    }

    /// Reads the device temperature in degrees Celsius.
    ///
    /// # Errors
    ///
    /// Returns error if the polling pass fails.
    pub async fn read_temperature(&self) -> Result<f64> {
        Ok(self.poll().await?.temperature())
    }

    // ========== Power Control ==========

    /// Switches the relay and returns the state the plug reports.
    ///
    /// The reported state is authoritative and replaces the power field of
    /// the held snapshot, even if it differs from `on`. Logs in first when
    /// no session is established. If the plug refuses the command because
    /// the session expired, the session is invalidated and the command is
    /// sent once more after a fresh login.
    ///
    /// # Errors
    ///
    /// - [`Error::AuthenticationFailed`] if a login before the command is
    ///   rejected
    /// - [`Error::Transport`] if the command fails, times out or is refused,
    ///   including a second expiry right after logging in again
    pub async fn write_power(&self, on: bool) -> Result<bool> {
        let _exchange = self.exchange.lock().await;

        if !self.session.session().is_authenticated()
            && !self.session.login().await.is_authenticated()
        {
            return Err(Error::AuthenticationFailed);
        }

        let mut relogged = false;
        let echoed = loop {
            match bounded(self.timeout, self.transport.command_switch(on)).await {
                Ok(echoed) => break echoed,
                Err(e) if signals_expiry(&e) => {
                    self.session.invalidate();
                    if relogged {
                        tracing::warn!(
                            device = %self.name,
                            error = %e,
                            "Switch command refused after fresh login"
                        );
                        return Err(e.into());
                    }
                    relogged = true;

                    tracing::debug!(
                        device = %self.name,
                        error = %e,
                        "Session expired, logging in again"
                    );
                    if !self.session.login().await.is_authenticated() {
                        return Err(Error::AuthenticationFailed);
                    }
                }
                Err(e) => return Err(e.into()),
            }
        };

        {
            let mut snapshot = self.snapshot.write();
            *snapshot = snapshot.with_power(echoed);
        }
        tracing::info!(device = %self.name, requested = on, on = echoed, "Power changed");
        self.events.publish(PlugEvent::PowerChanged { on: echoed });

        Ok(echoed)
    }

    /// Handles an identify request from the host.
    ///
    /// The plug has no way to signal itself, so this only logs.
    pub fn identify(&self) {
        tracing::debug!(device = %self.name, "Identify requested");
    }
}

/// Whether a refused switch command means the session is gone.
fn signals_expiry(error: &TransportError) -> bool {
    match error {
        TransportError::AuthenticationFailed => true,
        TransportError::CommandRejected(reply) => reply == EXPIRY_SENTINEL,
        _ => false,
    }
}

#[cfg(feature = "hnap")]
impl PlugDevice<HnapClient> {
    /// Starts building an HNAP device from its configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn from_config(config: &PlugConfig) -> Result<PlugDeviceBuilder<HnapClient>> {
        PlugDeviceBuilder::from_config(config)
    }
}
