// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `w215_lib` - A Rust library to keep a D-Link DSP-W215 smart plug in sync.
//!
//! This library talks to the plug over HNAP, keeps an authenticated session
//! alive across expiries and exposes the plug's state as one consistent
//! snapshot per read.
//!
//! # Supported Features
//!
//! - **Power control**: Switch the relay on or off
//! - **Energy monitoring**: Instantaneous power draw and cumulative energy
//! - **Temperature**: Internal temperature sensor
//! - **Session recovery**: Transparent re-login when the session expires
//! - **Events**: Snapshot, power and session changes over a broadcast channel
//!
//! # Quick Start
//!
//! ## From Configuration
//!
//! ```no_run
//! use w215_lib::{PlugConfig, PlugDevice};
//!
//! #[tokio::main]
//! async fn main() -> w215_lib::Result<()> {
//!     let config = PlugConfig::from_json(
//!         r#"{ "host": "192.168.0.20", "password": "123456", "name": "Kitchen" }"#,
//!     )?;
//!
//!     // Logs in and polls once; failures are logged, not fatal
//!     let device = PlugDevice::from_config(&config)?.connect().await;
//!
//!     let snapshot = device.poll().await?;
//!     println!(
//!         "{} W, {} kWh, {} C",
//!         snapshot.instantaneous_power(),
//!         snapshot.cumulative_energy(),
//!         snapshot.temperature()
//!     );
//!
//!     device.write_power(!snapshot.power()).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Event Subscriptions
//!
//! ```no_run
//! use w215_lib::{PlugConfig, PlugDevice, PlugEvent};
//!
//! #[tokio::main]
//! async fn main() -> w215_lib::Result<()> {
//!     let config = PlugConfig::new("192.168.0.20", "123456");
//!     let device = PlugDevice::from_config(&config)?.build();
//!
//!     let mut events = device.subscribe();
//!     device.write_power(true).await?;
//!
//!     while let Ok(event) = events.try_recv() {
//!         if let PlugEvent::PowerChanged { on } = event {
//!             println!("Relay is now {}", if on { "on" } else { "off" });
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod accessory;
pub mod command;
pub mod config;
mod device;
pub mod error;
pub mod event;
pub mod poller;
pub mod protocol;
pub mod session;
pub mod types;

pub use config::PlugConfig;
pub use device::{PlugDevice, PlugDeviceBuilder};
pub use error::{ConfigError, Error, ParseError, Result, TransportError, ValueError};
pub use event::{EventBus, PlugEvent};
pub use protocol::{Credentials, Transport};
#[cfg(feature = "hnap")]
pub use protocol::{HnapClient, HnapConfig};
pub use session::Session;
pub use types::DeviceSnapshot;
