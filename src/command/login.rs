// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Login handshake commands.
//!
//! Logging in takes two `Login` actions: a `request` that returns the
//! challenge, cookie and public key, then a `login` carrying the password
//! proof derived from them.

use crate::command::{Command, escape_xml};

/// One step of the HNAP login handshake.
///
/// # Examples
///
/// ```
/// use w215_lib::command::{Command, LoginCommand};
///
/// let request = LoginCommand::request("admin");
/// assert_eq!(request.name(), "Login");
/// assert!(request.parameters().starts_with("<Action>request</Action>"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginCommand {
    /// Ask the device for a challenge.
    Request {
        /// Account name.
        username: String,
    },
    /// Answer the challenge.
    Login {
        /// Account name.
        username: String,
        /// Upper-case hex proof of the password.
        login_password: String,
    },
}

impl LoginCommand {
    /// Result the device returns when the proof is accepted.
    pub const SUCCESS: &'static str = "success";

    /// Creates the challenge request.
    #[must_use]
    pub fn request(username: impl Into<String>) -> Self {
        Self::Request {
            username: username.into(),
        }
    }

    /// Creates the challenge answer.
    #[must_use]
    pub fn login(username: impl Into<String>, login_password: impl Into<String>) -> Self {
        Self::Login {
            username: username.into(),
            login_password: login_password.into(),
        }
    }
}

impl Command for LoginCommand {
    fn name(&self) -> &'static str {
        "Login"
    }

    fn response_element(&self) -> &'static str {
        "LoginResult"
    }

    fn parameters(&self) -> String {
        let (action, username, password) = match self {
            Self::Request { username } => ("request", username, ""),
            Self::Login {
                username,
                login_password,
            } => ("login", username, login_password.as_str()),
        };
        format!(
            "<Action>{action}</Action><Username>{}</Username>\
             <LoginPassword>{}</LoginPassword><Captcha></Captcha>",
            escape_xml(username),
            escape_xml(password)
        )
    }
}
