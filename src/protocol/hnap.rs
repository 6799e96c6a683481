// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HNAP protocol implementation for the DSP-W215.

use std::borrow::Cow;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, COOKIE};

use crate::command::{Command, LoginCommand, MeterCommand, SocketCommand};
use crate::error::TransportError;
use crate::protocol::auth::{self, SessionKeys};
use crate::protocol::{CommandResponse, Credentials, Transport};
use crate::types::EXPIRY_SENTINEL;

// ============================================================================
// HnapConfig - Configuration for the HNAP transport
// ============================================================================

/// Configuration for an HNAP transport.
///
/// # Examples
///
/// ```
/// use w215_lib::protocol::HnapConfig;
/// use std::borrow::Cow;
/// use std::time::Duration;
///
/// let config = HnapConfig::new()
///     .with_timeout(Duration::from_secs(5))
///     .with_legacy(true);
///
/// assert_eq!(config.timeout(), Duration::from_secs(5));
/// assert!(config.legacy());
/// ```
#[derive(Debug, Clone)]
pub struct HnapConfig {
    timeout: Duration,
    legacy: bool,
}

impl HnapConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            legacy: false,
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Selects the legacy firmware dialect.
    ///
    /// Legacy firmware authenticates actions by cookie alone, so the
    /// `HNAP_AUTH` signature header is not sent.
    #[must_use]
    pub fn with_legacy(mut self, legacy: bool) -> Self {
        self.legacy = legacy;
        self
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns whether the legacy dialect is selected.
    #[must_use]
    pub fn legacy(&self) -> bool {
        self.legacy
    }

    /// Creates an `HnapClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn into_client(self) -> Result<HnapClient, TransportError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(TransportError::Http)?;

        Ok(HnapClient {
            client,
            legacy: self.legacy,
            session: RwLock::new(None),
        })
    }
}

impl Default for HnapConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// HnapClient - HNAP transport
// ============================================================================

/// HNAP transport for a DSP-W215.
///
/// Every action is a SOAP envelope posted to the device's `/HNAP1` endpoint.
/// The session material from the last successful login is kept internally;
/// reads issued without one report the expiry sentinel so the caller logs in.
///
/// # Examples
///
/// ```no_run
/// use w215_lib::protocol::{Credentials, HnapClient, Transport};
///
/// # async fn example() -> Result<(), w215_lib::error::TransportError> {
/// let client = HnapClient::new()?;
/// client
///     .authenticate(&Credentials::new("192.168.0.20", "admin", "123456"))
///     .await?;
/// let state = client.read_switch_state().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HnapClient {
    client: Client,
    legacy: bool,
    session: RwLock<Option<SessionKeys>>,
}

impl HnapClient {
    /// Creates a transport with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new() -> Result<Self, TransportError> {
        HnapConfig::new().into_client()
    }

    /// Returns whether the legacy dialect is selected.
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        self.legacy
    }

    /// Returns whether the transport holds session material.
    #[must_use]
    pub fn has_session(&self) -> bool {
        self.session.read().is_some()
    }

    async fn post<C: Command + Sync>(
        &self,
        endpoint: &str,
        command: &C,
        keys: Option<&SessionKeys>,
    ) -> Result<CommandResponse, TransportError> {
        let url = reqwest::Url::parse(endpoint)
            .map_err(|e| TransportError::InvalidAddress(format!("{endpoint}: {e}")))?;
        let soap_action = command.soap_action();

        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", soap_action.as_str())
            .body(command.to_envelope());

        if let Some(keys) = keys {
            request = request.header(COOKIE, keys.cookie_header());
            if !self.legacy {
                let timestamp = chrono::Utc::now().timestamp();
                let signature = auth::hnap_auth(&keys.private_key, &soap_action, timestamp)?;
                request = request.header("HNAP_AUTH", signature);
            }
        }

        tracing::debug!(endpoint = %endpoint, action = command.name(), "Sending HNAP action");

        let response = request.send().await.map_err(TransportError::Http)?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(TransportError::AuthenticationFailed);
        }

        if !status.is_success() {
            return Err(TransportError::ConnectionFailed(format!(
                "HTTP {} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response.text().await.map_err(TransportError::Http)?;

        tracing::debug!(action = command.name(), body = %body, "Received HNAP response");

        Ok(CommandResponse::new(body))
    }

    /// Runs a read action and returns the answer element's text.
    async fn query<C: Command + Sync>(&self, command: &C) -> Result<String, TransportError> {
        let keys = self.session.read().clone();
        let Some(keys) = keys else {
            tracing::debug!(action = command.name(), "No HNAP session, reporting expiry");
            return Ok(EXPIRY_SENTINEL.to_string());
        };

        let response = match self.post(&keys.endpoint, command, Some(&keys)).await {
            Ok(response) => response,
            Err(TransportError::AuthenticationFailed) => {
                tracing::debug!(action = command.name(), "Device refused session");
                return Ok(EXPIRY_SENTINEL.to_string());
            }
            Err(e) => return Err(e),
        };

        Ok(response
            .element(command.response_element())
            .map_or_else(|| EXPIRY_SENTINEL.to_string(), Cow::into_owned))
    }
}

impl Transport for HnapClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<(), TransportError> {
        let endpoint = credentials.endpoint();
        *self.session.write() = None;

        tracing::debug!(endpoint = %endpoint, "Requesting HNAP login challenge");

        let request = LoginCommand::request(credentials.username());
        let challenge_response = self.post(endpoint, &request, None).await?;
        let field = |name: &str| {
            challenge_response
                .element(name)
                .map(Cow::into_owned)
                .ok_or_else(|| {
                    TransportError::UnexpectedResponse(format!("login challenge lacks {name}"))
                })
        };
        let challenge = field("Challenge")?;
        let cookie = field("Cookie")?;
        let public_key = field("PublicKey")?;

        let keys = SessionKeys {
            endpoint: endpoint.to_string(),
            cookie,
            private_key: auth::private_key(&public_key, credentials.password(), &challenge)?,
        };
        let proof = auth::login_password(&keys.private_key, &challenge)?;

        let login = LoginCommand::login(credentials.username(), proof);
        let response = self.post(endpoint, &login, Some(&keys)).await?;

        match response.element(login.response_element()).as_deref() {
            Some(LoginCommand::SUCCESS) => {
                *self.session.write() = Some(keys);
                Ok(())
            }
            other => {
                tracing::debug!(result = ?other, "HNAP login refused");
                Err(TransportError::AuthenticationFailed)
            }
        }
    }

    async fn read_switch_state(&self) -> Result<String, TransportError> {
        self.query(&SocketCommand::Get).await
    }

    async fn read_instantaneous_power(&self) -> Result<String, TransportError> {
        self.query(&MeterCommand::CurrentConsumption).await
    }

    async fn read_cumulative_energy(&self) -> Result<String, TransportError> {
        self.query(&MeterCommand::TotalConsumption).await
    }

    async fn read_temperature(&self) -> Result<String, TransportError> {
        self.query(&MeterCommand::Temperature).await
    }

    async fn command_switch(&self, on: bool) -> Result<bool, TransportError> {
        let command = SocketCommand::Set(on);

        let keys = self.session.read().clone();
        let Some(keys) = keys else {
            return Err(TransportError::AuthenticationFailed);
        };

        let response = self.post(&keys.endpoint, &command, Some(&keys)).await?;
        match response.element(command.response_element()).as_deref() {
            Some(SocketCommand::ACCEPTED) => Ok(on),
            other => Err(TransportError::CommandRejected(
                other.unwrap_or(EXPIRY_SENTINEL).to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = HnapConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(!config.legacy());
    }

    #[test]
    fn config_builder_chain() {
        let config = HnapConfig::new()
            .with_timeout(Duration::from_millis(1500))
            .with_legacy(true);
        assert_eq!(config.timeout(), Duration::from_millis(1500));
        assert!(config.legacy());
    }

    #[test]
    fn config_into_client() {
        let client = HnapConfig::new().with_legacy(true).into_client().unwrap();
        assert!(client.is_legacy());
        assert!(!client.has_session());
    }

    #[tokio::test]
    async fn reads_without_session_report_expiry() {
        let client = HnapClient::new().unwrap();
        assert_eq!(client.read_switch_state().await.unwrap(), EXPIRY_SENTINEL);
        assert_eq!(client.read_temperature().await.unwrap(), EXPIRY_SENTINEL);
    }

    #[tokio::test]
    async fn unusable_host_is_invalid_address() {
        let client = HnapClient::new().unwrap();
        let err = client
            .authenticate(&Credentials::new("plug local", "admin", "pin"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TransportError::InvalidAddress(ref a) if a.starts_with("http://plug local/HNAP1")
        ));
        assert!(!client.has_session());
    }

    #[tokio::test]
    async fn switch_without_session_fails() {
        let client = HnapClient::new().unwrap();
        let err = client.command_switch(true).await.unwrap_err();
        assert!(matches!(err, TransportError::AuthenticationFailed));
    }
}
