// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HNAP login proofs and request signatures.
//!
//! Every value is an upper-case hex HMAC-MD5:
//!
//! - private key: key = public key + password, message = challenge
//! - login password: key = private key, message = challenge
//! - `HNAP_AUTH`: key = private key, message = timestamp + quoted `SOAPAction`

use std::fmt;

use hmac::{Hmac, Mac};
use md5::Md5;

use crate::error::TransportError;

type HmacMd5 = Hmac<Md5>;

/// Session material obtained from a successful login.
#[derive(Clone)]
pub(crate) struct SessionKeys {
    pub(crate) endpoint: String,
    pub(crate) cookie: String,
    pub(crate) private_key: String,
}

impl SessionKeys {
    /// Returns the `Cookie` header value.
    pub(crate) fn cookie_header(&self) -> String {
        format!("uid={}", self.cookie)
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("endpoint", &self.endpoint)
            .field("cookie", &"<redacted>")
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Computes the upper-case hex HMAC-MD5 of `message` under `key`.
pub(crate) fn hmac_md5_hex(key: &[u8], message: &[u8]) -> Result<String, TransportError> {
    let mut mac = HmacMd5::new_from_slice(key)
        .map_err(|e| TransportError::UnexpectedResponse(format!("invalid HMAC key: {e}")))?;
    mac.update(message);

    Ok(mac
        .finalize()
        .into_bytes()
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect())
}

/// Derives the session private key from the login challenge.
pub(crate) fn private_key(
    public_key: &str,
    password: &str,
    challenge: &str,
) -> Result<String, TransportError> {
    let key = format!("{public_key}{password}");
    hmac_md5_hex(key.as_bytes(), challenge.as_bytes())
}

/// Computes the password proof sent with the second `Login` action.
pub(crate) fn login_password(private_key: &str, challenge: &str) -> Result<String, TransportError> {
    hmac_md5_hex(private_key.as_bytes(), challenge.as_bytes())
}

/// Computes the `HNAP_AUTH` header value for an action sent at `timestamp`.
pub(crate) fn hnap_auth(
    private_key: &str,
    soap_action: &str,
    timestamp: i64,
) -> Result<String, TransportError> {
    let message = format!("{timestamp}{soap_action}");
    let signature = hmac_md5_hex(private_key.as_bytes(), message.as_bytes())?;
    Ok(format!("{signature} {timestamp}"))
}
