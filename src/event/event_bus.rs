// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting plug events.

use tokio::sync::broadcast;

use super::PlugEvent;

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Event bus for broadcasting plug events to multiple subscribers.
///
/// A slow subscriber that falls more than the capacity behind loses the
/// oldest events and receives `RecvError::Lagged`.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PlugEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PlugEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event to all subscribers.
    ///
    /// If there are no subscribers, the event is silently discarded.
    pub fn publish(&self, event: PlugEvent) {
        // No subscribers is not an error
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeviceSnapshot;

    #[test]
    fn new_bus_has_no_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn drop_subscriber_decrements_count() {
        let bus = EventBus::new();

        let rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        drop(rx);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn publish_delivers_to_multiple_subscribers() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let snapshot = DeviceSnapshot::new(true, 5, 0.5, 20.0);
        bus.publish(PlugEvent::SnapshotUpdated(snapshot));

        assert_eq!(
            rx1.recv().await.unwrap(),
            PlugEvent::SnapshotUpdated(snapshot)
        );
        assert_eq!(
            rx2.recv().await.unwrap(),
            PlugEvent::SnapshotUpdated(snapshot)
        );
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish(PlugEvent::PowerChanged { on: false });
    }

    #[test]
    fn clone_shares_same_channel() {
        let bus1 = EventBus::new();
        let bus2 = bus1.clone();

        let _rx = bus1.subscribe();
        assert_eq!(bus2.subscriber_count(), 1);
    }
}
