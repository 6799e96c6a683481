// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scripted transport for engine tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::TransportError;
use crate::protocol::{Credentials, Transport};
use crate::types::EXPIRY_SENTINEL;

/// Transport whose answers are scripted by the test.
///
/// Switch reads pop from a queue and fall back to the current relay state
/// once the queue is empty. With session tracking, they report expiry until
/// a login succeeds. Numeric reads return fixed text, or the number
/// of switch reads so far when `generation_readings` is set.
#[derive(Debug)]
pub(crate) struct ScriptedTransport {
    switch_replies: Mutex<VecDeque<String>>,
    relay_on: Mutex<bool>,
    login_results: Mutex<VecDeque<bool>>,
    power: Mutex<String>,
    energy: Mutex<String>,
    temperature: Mutex<String>,
    echo_override: Mutex<Option<bool>>,
    fail_commands: Mutex<bool>,
    expired_commands: Mutex<usize>,
    track_session: Mutex<bool>,
    logged_in: Mutex<bool>,
    hang_switch_reads: Mutex<bool>,
    read_delay: Mutex<Option<Duration>>,
    generation_readings: Mutex<bool>,
    calls: Mutex<Vec<&'static str>>,
    logins: AtomicUsize,
    switch_reads: AtomicUsize,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self {
            switch_replies: Mutex::new(VecDeque::new()),
            relay_on: Mutex::new(true),
            login_results: Mutex::new(VecDeque::new()),
            power: Mutex::new("42".to_string()),
            energy: Mutex::new("12.345".to_string()),
            temperature: Mutex::new("21.5".to_string()),
            echo_override: Mutex::new(None),
            fail_commands: Mutex::new(false),
            expired_commands: Mutex::new(0),
            track_session: Mutex::new(false),
            logged_in: Mutex::new(false),
            hang_switch_reads: Mutex::new(false),
            read_delay: Mutex::new(None),
            generation_readings: Mutex::new(false),
            calls: Mutex::new(Vec::new()),
            logins: AtomicUsize::new(0),
            switch_reads: AtomicUsize::new(0),
        }
    }

    /// Queues raw switch-state replies.
    pub(crate) fn with_switch_replies<'a>(self, replies: impl IntoIterator<Item = &'a str>) -> Self {
        self.switch_replies
            .lock()
            .extend(replies.into_iter().map(str::to_string));
        self
    }

    /// Queues `count` expiry sentinels.
    pub(crate) fn with_expiries(self, count: usize) -> Self {
        self.with_switch_replies(std::iter::repeat_n(EXPIRY_SENTINEL, count))
    }

    pub(crate) fn with_relay(self, on: bool) -> Self {
        *self.relay_on.lock() = on;
        self
    }

    /// Queues login outcomes; logins succeed once the queue is empty.
    pub(crate) fn with_login_results(self, results: impl IntoIterator<Item = bool>) -> Self {
        self.login_results.lock().extend(results);
        self
    }

    pub(crate) fn with_readings(self, power: &str, energy: &str, temperature: &str) -> Self {
        *self.power.lock() = power.to_string();
        *self.energy.lock() = energy.to_string();
        *self.temperature.lock() = temperature.to_string();
        self
    }

    pub(crate) fn with_echo(self, echo: bool) -> Self {
        *self.echo_override.lock() = Some(echo);
        self
    }

    pub(crate) fn with_failing_commands(self) -> Self {
        *self.fail_commands.lock() = true;
        self
    }

    /// Answers the next `count` switch commands with the expiry sentinel.
    pub(crate) fn with_expired_commands(self, count: usize) -> Self {
        *self.expired_commands.lock() = count;
        self
    }

    /// Reports expiry on switch reads until a login has been accepted.
    pub(crate) fn with_session_tracking(self) -> Self {
        *self.track_session.lock() = true;
        self
    }

    pub(crate) fn with_hanging_switch_reads(self) -> Self {
        *self.hang_switch_reads.lock() = true;
        self
    }

    pub(crate) fn with_read_delay(self, delay: Duration) -> Self {
        *self.read_delay.lock() = Some(delay);
        self
    }

    pub(crate) fn with_generation_readings(self) -> Self {
        *self.generation_readings.lock() = true;
        self
    }

    pub(crate) fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub(crate) fn switch_reads(&self) -> usize {
        self.switch_reads.load(Ordering::SeqCst)
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().push(call);
    }

    async fn numeric(&self, call: &'static str, value: &Mutex<String>) -> String {
        self.record(call);
        let delay = *self.read_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if *self.generation_readings.lock() {
            return self.switch_reads().to_string();
        }
        value.lock().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn authenticate(&self, _credentials: &Credentials) -> Result<(), TransportError> {
        self.record("authenticate");
        self.logins.fetch_add(1, Ordering::SeqCst);
        let accepted = self.login_results.lock().pop_front().unwrap_or(true);
        *self.logged_in.lock() = accepted;
        if accepted {
            Ok(())
        } else {
            Err(TransportError::AuthenticationFailed)
        }
    }

    async fn read_switch_state(&self) -> Result<String, TransportError> {
        self.record("switch");
        let hang = *self.hang_switch_reads.lock();
        if hang {
            std::future::pending::<()>().await;
        }
        self.switch_reads.fetch_add(1, Ordering::SeqCst);
        let delay = *self.read_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if *self.track_session.lock() && !*self.logged_in.lock() {
            return Ok(EXPIRY_SENTINEL.to_string());
        }
        let scripted = self.switch_replies.lock().pop_front();
        Ok(scripted.unwrap_or_else(|| self.relay_on.lock().to_string()))
    }

    async fn read_instantaneous_power(&self) -> Result<String, TransportError> {
        Ok(self.numeric("power", &self.power).await)
    }

    async fn read_cumulative_energy(&self) -> Result<String, TransportError> {
        Ok(self.numeric("energy", &self.energy).await)
    }

    async fn read_temperature(&self) -> Result<String, TransportError> {
        Ok(self.numeric("temperature", &self.temperature).await)
    }

    async fn command_switch(&self, on: bool) -> Result<bool, TransportError> {
        self.record("command");
        if *self.fail_commands.lock() {
            return Err(TransportError::CommandRejected("REFUSED".to_string()));
        }
        {
            let mut expired = self.expired_commands.lock();
            if *expired > 0 {
                *expired -= 1;
                return Err(TransportError::CommandRejected(EXPIRY_SENTINEL.to_string()));
            }
        }
        let echoed = self.echo_override.lock().unwrap_or(on);
        *self.relay_on.lock() = echoed;
        Ok(echoed)
    }
}
