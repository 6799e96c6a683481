// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authenticated session lifecycle.
//!
//! The [`SessionManager`] logs in through a [`Transport`] on demand. A
//! failed login is not an error at this layer: it yields an unauthenticated
//! [`Session`] and the caller decides what to do with it.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::event::{EventBus, PlugEvent};
use crate::protocol::{Credentials, Transport, bounded};

/// State of the authenticated relationship with the plug.
///
/// The session material itself lives inside the transport; only the outcome
/// of the last login is tracked here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    authenticated: bool,
    last_authenticated_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates an unauthenticated session.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            authenticated: false,
            last_authenticated_at: None,
        }
    }

    /// Returns whether the last login succeeded and no expiry was seen since.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Returns when the last successful login happened.
    #[must_use]
    pub const fn last_authenticated_at(&self) -> Option<DateTime<Utc>> {
        self.last_authenticated_at
    }

    fn authenticated_now() -> Self {
        Self {
            authenticated: true,
            last_authenticated_at: Some(Utc::now()),
        }
    }

    fn expired(self) -> Self {
        Self {
            authenticated: false,
            ..self
        }
    }
}

/// Owns the session with one plug.
#[derive(Debug)]
pub struct SessionManager<T: Transport> {
    transport: Arc<T>,
    credentials: Credentials,
    session: RwLock<Session>,
    timeout: Duration,
    events: EventBus,
}

impl<T: Transport> SessionManager<T> {
    /// Creates a manager with an unauthenticated session.
    pub(crate) fn new(
        transport: Arc<T>,
        credentials: Credentials,
        timeout: Duration,
        events: EventBus,
    ) -> Self {
        Self {
            transport,
            credentials,
            session: RwLock::new(Session::new()),
            timeout,
            events,
        }
    }

    /// Returns the credentials used to log in.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns a copy of the current session state.
    #[must_use]
    pub fn session(&self) -> Session {
        *self.session.read()
    }

    /// Logs in and returns the resulting session.
    ///
    /// Never fails: a rejected or failed login produces an unauthenticated
    /// session, which the caller must check with
    /// [`Session::is_authenticated`].
    pub async fn login(&self) -> Session {
        let outcome = bounded(self.timeout, self.transport.authenticate(&self.credentials)).await;

        let session = match outcome {
            Ok(()) => {
                tracing::info!(endpoint = %self.credentials.endpoint(), "Logged in to plug");
                Session::authenticated_now()
            }
            Err(e) => {
                tracing::warn!(
                    endpoint = %self.credentials.endpoint(),
                    error = %e,
                    "Login to plug failed"
                );
                self.session().expired()
            }
        };

        self.replace(session);
        session
    }

    /// Marks the session as expired.
    pub fn invalidate(&self) {
        let session = self.session().expired();
        self.replace(session);
    }

    fn replace(&self, session: Session) {
        let previous = std::mem::replace(&mut *self.session.write(), session);
        if previous.authenticated != session.authenticated {
            self.events.publish(PlugEvent::SessionChanged {
                authenticated: session.authenticated,
            });
        }
    }
}
