//! In-process fan-out of change events

use std::collections::VecDeque;

use tokio::sync::broadcast;

use super::{ChangeEvent, ChangeKind};
use crate::store::Resource;

const CHANNEL_CAPACITY: usize = 64;

/// Broadcasts change events to every live [`Subscription`]
#[derive(Debug, Clone)]
pub struct ChangeHub {
    sender: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Deliver `event` to current subscribers; returns how many received it
    pub fn publish(&self, event: ChangeEvent) -> usize {
        tracing::debug!("Change on {} ({:?})", event.channel, event.kind);
        self.sender.send(event).unwrap_or(0)
    }

    /// Listen for changes to `resources` within `sync_code`
    pub fn subscribe(&self, sync_code: impl Into<String>, resources: &[Resource]) -> Subscription {
        let sync_code = sync_code.into();
        tracing::info!("Subscribed to {resources:?} for {sync_code}");
        Subscription {
            receiver: self.sender.subscribe(),
            sync_code,
            resources: resources.to_vec(),
            pending: VecDeque::new(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// A filtered stream of change events; dropping it unsubscribes
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<ChangeEvent>,
    sync_code: String,
    resources: Vec<Resource>,
    pending: VecDeque<ChangeEvent>,
}

impl Subscription {
    /// Wait for the next matching event; `None` once the hub is gone.
    ///
    /// When the subscriber falls behind, the skipped events are replaced by
    /// one `Changed` event per subscribed resource.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Subscription lagged, skipped {skipped} change events");
                    self.pending = self
                        .resources
                        .iter()
                        .map(|&resource| {
                            ChangeEvent::new(resource, self.sync_code.clone(), ChangeKind::Changed)
                        })
                        .collect();
                    if let Some(event) = self.pending.pop_front() {
                        return Some(event);
                    }
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    fn matches(&self, event: &ChangeEvent) -> bool {
        event.channel.sync_code == self.sync_code && self.resources.contains(&event.resource())
    }

    pub fn unsubscribe(self) {
        tracing::info!("Unsubscribed from {:?} for {}", self.resources, self.sync_code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn subscription_filters_by_sync_code_and_resource() {
        let hub = ChangeHub::new();
        let mut subscription = hub.subscribe("SHARED", &[Resource::Sessions]);

        hub.publish(ChangeEvent::new(Resource::Sessions, "OTHER", ChangeKind::Insert));
        hub.publish(ChangeEvent::new(Resource::Users, "SHARED", ChangeKind::Insert));
        hub.publish(ChangeEvent::new(Resource::Sessions, "SHARED", ChangeKind::Delete));

        let event = subscription.next().await.unwrap();
        assert_eq!(event.resource(), Resource::Sessions);
        assert_eq!(event.kind, ChangeKind::Delete);
        assert_eq!(event.channel.sync_code, "SHARED");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn dropping_subscription_unsubscribes() {
        let hub = ChangeHub::new();
        let subscription = hub.subscribe("SHARED", &Resource::ALL);
        assert_eq!(hub.subscriber_count(), 1);
        subscription.unsubscribe();
        assert_eq!(hub.subscriber_count(), 0);
        assert_eq!(
            hub.publish(ChangeEvent::new(Resource::Users, "SHARED", ChangeKind::Update)),
            0
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn lagging_subscriber_gets_a_change_per_resource() {
        let hub = ChangeHub::new();
        let mut subscription = hub.subscribe("SHARED", &[Resource::Sessions, Resource::Users]);
        for _ in 0..CHANNEL_CAPACITY + 5 {
            hub.publish(ChangeEvent::new(Resource::Sessions, "SHARED", ChangeKind::Insert));
        }

        let first = subscription.next().await.unwrap();
        assert_eq!(first.resource(), Resource::Sessions);
        assert_eq!(first.kind, ChangeKind::Changed);
        let second = subscription.next().await.unwrap();
        assert_eq!(second.resource(), Resource::Users);
        assert_eq!(second.kind, ChangeKind::Changed);
        assert_eq!(second.channel.sync_code, "SHARED");

        let buffered = subscription.next().await.unwrap();
        assert_eq!(buffered.kind, ChangeKind::Insert);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn closed_hub_ends_subscription() {
        let hub = ChangeHub::new();
        let mut subscription = hub.subscribe("SHARED", &[Resource::Users]);
        drop(hub);
        assert!(subscription.next().await.is_none());
    }
}
