// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport layer for communicating with the plug.
//!
//! The synchronization engine only talks to the device through the
//! [`Transport`] trait. Readings come back as the raw text the device sent;
//! interpreting them is left to [`crate::types`].
//!
//! # Transports
//!
//! - [`HnapClient`]: HNAP over HTTP, as spoken by the DSP-W215 (feature `hnap`)

#[cfg(feature = "hnap")]
mod auth;
#[cfg(feature = "hnap")]
mod hnap;
#[cfg(test)]
pub(crate) mod mock;

#[cfg(feature = "hnap")]
pub use hnap::{HnapClient, HnapConfig};

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::error::TransportError;

/// Login material for one device.
///
/// Immutable once built. The `Debug` output never shows the password.
///
/// # Examples
///
/// ```
/// use w215_lib::protocol::Credentials;
///
/// let creds = Credentials::new("192.168.0.20", "admin", "123456");
/// assert_eq!(creds.endpoint(), "http://192.168.0.20/HNAP1");
/// assert!(!format!("{creds:?}").contains("123456"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
    endpoint: String,
}

impl Credentials {
    /// Default account name of the plug.
    pub const DEFAULT_USERNAME: &'static str = "admin";

    /// Creates credentials for the device at `host`.
    ///
    /// The HNAP endpoint is `http://<host>/HNAP1`. A host that already
    /// carries a scheme keeps it.
    #[must_use]
    pub fn new(
        host: impl AsRef<str>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let host = host.as_ref().trim_end_matches('/');
        let endpoint = if host.starts_with("http://") || host.starts_with("https://") {
            format!("{host}/HNAP1")
        } else {
            format!("http://{host}/HNAP1")
        };

        Self {
            username: username.into(),
            password: password.into(),
            endpoint,
        }
    }

    /// Returns the account name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns the HNAP endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Response from an HNAP action.
#[derive(Debug, Clone)]
pub struct CommandResponse {
    /// The raw XML response body.
    body: String,
}

impl CommandResponse {
    /// Creates a new command response with the given body.
    #[must_use]
    pub fn new(body: String) -> Self {
        Self { body }
    }

    /// Returns the trimmed text of the first element called `name`.
    ///
    /// Namespace prefixes and attributes on the element are ignored. An
    /// empty or self-closing element yields an empty string. The five
    /// predefined XML entities are decoded.
    #[must_use]
    pub fn element(&self, name: &str) -> Option<Cow<'_, str>> {
        let mut rest = self.body.as_str();
        loop {
            let start = rest.find('<')?;
            rest = &rest[start + 1..];
            let tag_end = rest.find('>')?;
            let tag = &rest[..tag_end];
            rest = &rest[tag_end + 1..];

            if tag.starts_with('/') || tag.starts_with('?') || tag.starts_with('!') {
                continue;
            }
            let self_closing = tag.ends_with('/');
            let tag_name = tag
                .trim_end_matches('/')
                .split_whitespace()
                .next()
                .unwrap_or_default();
            let local = tag_name.rsplit(':').next().unwrap_or(tag_name);
            if local != name {
                continue;
            }
            if self_closing {
                return Some(Cow::Borrowed(""));
            }

            let close = format!("</{tag_name}>");
            let end = rest.find(&close)?;
            return Some(unescape_xml(rest[..end].trim()));
        }
    }
}

fn unescape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    // `&amp;` last so that `&amp;lt;` decodes to `&lt;`
    Cow::Owned(
        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&amp;", "&"),
    )
}

/// Awaits a transport call, failing with [`TransportError::Timeout`] once
/// `timeout` elapses.
pub(crate) async fn bounded<V>(
    timeout: Duration,
    request: impl Future<Output = Result<V, TransportError>>,
) -> Result<V, TransportError> {
    tokio::time::timeout(timeout, request)
        .await
        .unwrap_or_else(|_| Err(TransportError::Timeout(timeout_ms(timeout))))
}

/// Converts a timeout to whole milliseconds, saturating.
pub(crate) fn timeout_ms(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

/// Capability to talk to one plug.
///
/// Numeric reads return the device's text verbatim. Once the session has
/// expired a read returns [`EXPIRY_SENTINEL`](crate::types::EXPIRY_SENTINEL)
/// instead of a value.
pub trait Transport: Send + Sync {
    /// Logs in with `credentials`, replacing any previous session material.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::AuthenticationFailed`] if the device rejects
    /// the credentials, or another `TransportError` if the exchange fails.
    fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Reads the relay state token.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the request fails.
    fn read_switch_state(&self) -> impl Future<Output = Result<String, TransportError>> + Send;

    /// Reads the instantaneous power draw in Watts.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the request fails.
    fn read_instantaneous_power(
        &self,
    ) -> impl Future<Output = Result<String, TransportError>> + Send;

    /// Reads the cumulative energy in kWh.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the request fails.
    fn read_cumulative_energy(
        &self,
    ) -> impl Future<Output = Result<String, TransportError>> + Send;

    /// Reads the temperature in degrees Celsius.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the request fails.
    fn read_temperature(&self) -> impl Future<Output = Result<String, TransportError>> + Send;

    /// Switches the relay and returns the state the device reports.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if the request fails or the device refuses
    /// the command.
    fn command_switch(&self, on: bool) -> impl Future<Output = Result<bool, TransportError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_endpoint_from_ip() {
        let creds = Credentials::new("10.0.0.5", "admin", "pin");
        assert_eq!(creds.endpoint(), "http://10.0.0.5/HNAP1");
    }

    #[test]
    fn credentials_endpoint_keeps_scheme() {
        let creds = Credentials::new("http://127.0.0.1:8080/", "admin", "pin");
        assert_eq!(creds.endpoint(), "http://127.0.0.1:8080/HNAP1");
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let creds = Credentials::new("10.0.0.5", "admin", "s3cret");
        let debug = format!("{creds:?}");
        assert!(debug.contains("admin"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn element_extracts_text() {
        let response = CommandResponse::new(
            "<soap:Envelope><soap:Body><GetSocketSettingsResponse xmlns=\"x\">\
             <GetSocketSettingsResult>OK</GetSocketSettingsResult>\
             <OPStatus> true </OPStatus>\
             </GetSocketSettingsResponse></soap:Body></soap:Envelope>"
                .to_string(),
        );
        assert_eq!(response.element("OPStatus").as_deref(), Some("true"));
        assert_eq!(response.element("GetSocketSettingsResult").as_deref(), Some("OK"));
    }

    #[test]
    fn element_ignores_prefixes_and_attributes() {
        let response =
            CommandResponse::new("<a:Cookie type=\"uid\">abc</a:Cookie>".to_string());
        assert_eq!(response.element("Cookie").as_deref(), Some("abc"));
    }

    #[test]
    fn element_missing() {
        let response = CommandResponse::new("<LoginResponse/>".to_string());
        assert!(response.element("Challenge").is_none());
    }

    #[test]
    fn element_self_closing_is_empty() {
        let response = CommandResponse::new("<r><Captcha/></r>".to_string());
        assert_eq!(response.element("Captcha").as_deref(), Some(""));
    }

    #[test]
    fn element_does_not_match_prefix_of_longer_name() {
        let response = CommandResponse::new(
            "<r><LoginResultCode>1</LoginResultCode><LoginResult>success</LoginResult></r>"
                .to_string(),
        );
        assert_eq!(response.element("LoginResult").as_deref(), Some("success"));
    }

    #[test]
    fn element_decodes_entities() {
        let response = CommandResponse::new(
            "<r><NickName>Tom &amp; Jerry &lt;1&gt;</NickName><Raw>&amp;lt;</Raw></r>".to_string(),
        );
        assert_eq!(
            response.element("NickName").as_deref(),
            Some("Tom & Jerry <1>")
        );
        assert_eq!(response.element("Raw").as_deref(), Some("&lt;"));
    }

    #[test]
    fn element_without_entities_borrows() {
        let response = CommandResponse::new("<r><OPStatus>true</OPStatus></r>".to_string());
        assert!(matches!(response.element("OPStatus"), Some(Cow::Borrowed("true"))));
    }

    #[tokio::test(start_paused = true)]
    async fn bounded_call_times_out() {
        let result: Result<(), TransportError> =
            bounded(Duration::from_millis(250), std::future::pending()).await;
        assert!(matches!(result, Err(TransportError::Timeout(250))));
    }

    #[tokio::test]
    async fn bounded_call_passes_result_through() {
        let result = bounded(Duration::from_secs(1), async { Ok::<_, TransportError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[test]
    fn timeout_ms_saturates() {
        assert_eq!(timeout_ms(Duration::from_secs(10)), 10_000);
        assert_eq!(timeout_ms(Duration::MAX), u64::MAX);
    }
}
