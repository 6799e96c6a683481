// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `w215_lib` library.
//!
//! Session expiry is not represented here: it is recovered inside the state
//! poller and only surfaces as [`Error::RetriesExhausted`] or
//! [`Error::AuthenticationFailed`] when recovery is impossible.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The device rejected the credentials while re-establishing a session.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// A transport call failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The session kept expiring after the allowed number of re-logins.
    #[error("session still expired after {retries} re-authentication attempts")]
    RetriesExhausted {
        /// Number of re-authentication attempts made during the pass.
        retries: u32,
    },

    /// A reading returned by the device could not be parsed.
    #[error("malformed reading: {0}")]
    MalformedReading(#[from] ParseError),

    /// The configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised by a [`Transport`](crate::protocol::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed.
    #[cfg(feature = "hnap")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection to the device failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The device rejected the credentials.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The device refused a switch command.
    #[error("command rejected: {0}")]
    CommandRejected(String),

    /// The device answered with something that is not a valid HNAP reply.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Errors related to parsing device readings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Failed to parse a specific reading.
    #[error("failed to parse {field} from {raw:?}")]
    InvalidValue {
        /// The reading that failed to parse.
        field: &'static str,
        /// The text the device returned.
        raw: String,
    },
}

/// Errors related to attribute bounds.
///
/// Returned directly by the accessory validators.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("{attribute} value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Attribute being validated.
        attribute: &'static str,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
        /// The actual value that was provided.
        actual: f64,
    },

    /// A value does not sit on the attribute's step grid.
    #[error("{attribute} value {actual} is not a multiple of {step}")]
    InvalidStep {
        /// Attribute being validated.
        attribute: &'static str,
        /// Declared step.
        step: f64,
        /// The actual value that was provided.
        actual: f64,
    },

    /// The attribute holds a boolean, not a number.
    #[error("{0} is not a numeric attribute")]
    NotNumeric(&'static str),
}

/// Errors related to the accessory configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A field holds an unusable value.
    #[error("invalid {field}: {message}")]
    Invalid {
        /// The offending field.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
