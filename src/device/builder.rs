// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plug device builder.

use std::time::Duration;

use crate::config::PlugConfig;
use crate::device::PlugDevice;
use crate::poller::DEFAULT_MAX_RETRIES;
use crate::protocol::{Credentials, Transport};

#[cfg(feature = "hnap")]
use crate::error::Result;
#[cfg(feature = "hnap")]
use crate::protocol::{HnapClient, HnapConfig};

/// Builder for creating plug devices.
///
/// This builder can be created in two ways:
/// - `PlugDevice::builder(transport, credentials)` - Any transport
/// - `PlugDevice::from_config(&config)` - HNAP transport from a [`PlugConfig`]
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use w215_lib::{PlugConfig, PlugDevice};
///
/// # async fn example() -> w215_lib::Result<()> {
/// // Log in and poll once
/// let config = PlugConfig::new("192.168.0.20", "123456");
/// let device = PlugDevice::from_config(&config)?.connect().await;
///
/// // No network access until the first read
/// let device = PlugDevice::from_config(&config)?
///     .with_timeout(Duration::from_secs(3))
///     .build();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PlugDeviceBuilder<T: Transport> {
    transport: T,
    credentials: Credentials,
    name: String,
    timeout: Duration,
    max_retries: u32,
}

impl<T: Transport> PlugDeviceBuilder<T> {
    /// Creates a builder with default settings.
    pub(crate) fn new(transport: T, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
            name: PlugConfig::DEFAULT_NAME.to_string(),
            timeout: Duration::from_millis(PlugConfig::DEFAULT_TIMEOUT_MS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the timeout applied to each request.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the number of re-logins allowed within one polling pass.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Returns the credentials the device will log in with.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Builds the device without contacting the plug.
    ///
    /// The session starts unauthenticated and the snapshot holds defaults;
    /// the first read logs in on demand.
    #[must_use]
    pub fn build(self) -> PlugDevice<T> {
        PlugDevice::new(
            self.transport,
            self.credentials,
            self.name,
            self.timeout,
            self.max_retries,
        )
    }

    /// Builds the device, logs in and runs a first polling pass.
    ///
    /// Neither step is fatal: if the login is rejected the poll is skipped,
    /// and if the poll fails the device keeps its default snapshot. Both
    /// cases are logged.
    pub async fn connect(self) -> PlugDevice<T> {
        let device = self.build();

        if !device.login().await.is_authenticated() {
            tracing::warn!(device = %device.name(), "Initial login failed, skipping first poll");
            return device;
        }

        if let Err(e) = device.poll().await {
            tracing::warn!(device = %device.name(), error = %e, "Initial poll failed");
        }

        device
    }
}

#[cfg(feature = "hnap")]
impl PlugDeviceBuilder<HnapClient> {
    /// Creates an HNAP builder from a configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn from_config(config: &PlugConfig) -> Result<Self> {
        config.validate()?;

        let client = HnapConfig::new()
            .with_timeout(config.timeout())
            .with_legacy(config.legacy)
            .into_client()?;

        Ok(Self::new(client, config.credentials())
            .with_name(config.name.clone())
            .with_timeout(config.timeout())
            .with_max_retries(config.max_retries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::mock::ScriptedTransport;
    use crate::types::DeviceSnapshot;

    fn builder(transport: ScriptedTransport) -> PlugDeviceBuilder<ScriptedTransport> {
        PlugDeviceBuilder::new(transport, Credentials::new("10.0.0.5", "admin", "pin"))
    }

    #[test]
    fn builder_defaults() {
        let builder = builder(ScriptedTransport::new());
        assert_eq!(builder.name, "DSP W215 Smart Plug");
        assert_eq!(builder.timeout, Duration::from_secs(10));
        assert_eq!(builder.max_retries, 5);
        assert_eq!(builder.credentials().endpoint(), "http://10.0.0.5/HNAP1");
    }

    #[test]
    fn build_does_no_io() {
        let device = builder(ScriptedTransport::new())
            .with_name("Desk")
            .with_max_retries(2)
            .build();

        assert_eq!(device.name(), "Desk");
        assert!(device.transport.calls().is_empty());
        assert_eq!(device.poller.max_retries(), 2);
    }

    #[tokio::test]
    async fn connect_logs_in_and_polls() {
        let device = builder(ScriptedTransport::new()).connect().await;

        assert!(device.session().is_authenticated());
        assert_eq!(device.snapshot(), DeviceSnapshot::new(true, 42, 12.345, 21.5));
    }

    #[tokio::test]
    async fn connect_survives_rejected_login() {
        let device = builder(ScriptedTransport::new().with_login_results([false]))
            .connect()
            .await;

        assert!(!device.session().is_authenticated());
        assert_eq!(device.snapshot(), DeviceSnapshot::default());
        assert_eq!(device.transport.calls(), vec!["authenticate"]);
    }

    #[tokio::test]
    async fn read_after_rejected_connect_logs_in() {
        let device = builder(
            ScriptedTransport::new()
                .with_session_tracking()
                .with_login_results([false, true]),
        )
        .connect()
        .await;
        assert!(!device.session().is_authenticated());

        assert!(device.read_power().await.unwrap());
        assert!(device.session().is_authenticated());
        assert_eq!(device.transport.logins(), 2);
        assert_eq!(
            device.transport.calls(),
            vec![
                "authenticate",
                "switch",
                "authenticate",
                "switch",
                "energy",
                "power",
                "temperature"
            ]
        );
    }

    #[tokio::test]
    async fn connect_survives_failed_poll() {
        let device = builder(ScriptedTransport::new().with_readings("N/A", "1.0", "20.0"))
            .connect()
            .await;

        assert!(device.session().is_authenticated());
        assert_eq!(device.snapshot(), DeviceSnapshot::default());
    }

    #[cfg(feature = "hnap")]
    #[test]
    fn from_config_rejects_invalid_config() {
        let config = PlugConfig::new("192.168.0.20", "");
        assert!(matches!(
            PlugDeviceBuilder::from_config(&config),
            Err(crate::error::Error::Config(_))
        ));
    }

    #[cfg(feature = "hnap")]
    #[test]
    fn from_config_carries_settings() {
        let config = PlugConfig::new("192.168.0.20", "123456")
            .with_name("Kitchen")
            .with_legacy(true)
            .with_timeout(Duration::from_secs(3))
            .with_max_retries(1);

        let builder = PlugDeviceBuilder::from_config(&config).unwrap();
        assert_eq!(builder.name, "Kitchen");
        assert_eq!(builder.timeout, Duration::from_secs(3));
        assert_eq!(builder.max_retries, 1);
        assert!(builder.transport.is_legacy());
    }
}
