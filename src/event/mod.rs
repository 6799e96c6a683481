// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for plug state changes.
//!
//! A host adapter that wants change notifications subscribes to the
//! [`EventBus`] of a [`PlugDevice`](crate::PlugDevice) instead of polling.
//!
//! # Examples
//!
//! ```
//! use w215_lib::event::{EventBus, PlugEvent};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(PlugEvent::PowerChanged { on: true });
//! assert!(matches!(rx.try_recv(), Ok(PlugEvent::PowerChanged { on: true })));
//! ```

mod event_bus;
mod plug_event;

pub use event_bus::EventBus;
pub use plug_event::PlugEvent;
