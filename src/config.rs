// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory configuration.
//!
//! The host hands each accessory a JSON block; [`PlugConfig`] is its typed
//! form.
//!
//! ```json
//! {
//!     "host": "192.168.0.20",
//!     "username": "admin",
//!     "password": "123456",
//!     "name": "Kitchen Plug",
//!     "legacy": false
//! }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::poller::DEFAULT_MAX_RETRIES;
use crate::protocol::Credentials;

/// Configuration for one plug.
///
/// # Examples
///
/// ```
/// use w215_lib::config::PlugConfig;
///
/// let config = PlugConfig::from_json(r#"{ "host": "192.168.0.20", "password": "123456" }"#)
///     .unwrap();
/// assert_eq!(config.username, "admin");
/// assert_eq!(config.name, "DSP W215 Smart Plug");
/// assert!(!config.legacy);
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlugConfig {
    /// Network address of the plug.
    pub host: String,
    /// Account name.
    #[serde(default = "default_username")]
    pub username: String,
    /// Account password (the PIN printed on the plug).
    pub password: String,
    /// Display name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Talk to legacy firmware.
    #[serde(default)]
    pub legacy: bool,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Re-logins allowed within one polling pass.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_username() -> String {
    Credentials::DEFAULT_USERNAME.to_string()
}

fn default_name() -> String {
    PlugConfig::DEFAULT_NAME.to_string()
}

fn default_timeout_ms() -> u64 {
    PlugConfig::DEFAULT_TIMEOUT_MS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

impl PlugConfig {
    /// Default display name.
    pub const DEFAULT_NAME: &'static str = "DSP W215 Smart Plug";
    /// Default per-request timeout in milliseconds.
    pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

    /// Creates a configuration with default values for everything but the
    /// address and password.
    #[must_use]
    pub fn new(host: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            username: default_username(),
            password: password.into(),
            name: default_name(),
            legacy: false,
            timeout_ms: Self::DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Parses and validates a JSON configuration block.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the JSON is malformed or a required
    /// field is missing, [`ConfigError::Invalid`] if a field is unusable.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the account name.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Selects the legacy firmware dialect.
    #[must_use]
    pub fn with_legacy(mut self, legacy: bool) -> Self {
        self.legacy = legacy;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = crate::protocol::timeout_ms(timeout);
        self
    }

    /// Sets the number of re-logins allowed within one polling pass.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Checks that every field is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first unusable field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(invalid("host", "must not be empty"));
        }
        if self.host.chars().any(char::is_whitespace) {
            return Err(invalid("host", "must not contain whitespace"));
        }
        if self.username.is_empty() {
            return Err(invalid("username", "must not be empty"));
        }
        if self.password.is_empty() {
            return Err(invalid("password", "is required"));
        }
        if self.timeout_ms == 0 {
            return Err(invalid("timeout_ms", "must be greater than zero"));
        }
        Ok(())
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the login credentials.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.host, self.username.clone(), self.password.clone())
    }
}

impl std::fmt::Debug for PlugConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlugConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("legacy", &self.legacy)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

fn invalid(field: &'static str, message: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        message: message.to_string(),
    }
}
