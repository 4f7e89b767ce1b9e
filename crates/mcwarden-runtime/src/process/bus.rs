//! Fan-out of [`ServerEvent`]s to any number of viewers.
//!
//! Built on `tokio::sync::broadcast`: each subscriber has a bounded ring,
//! a slow subscriber loses its oldest entries, and publishing never waits
//! on anyone.

use mcwarden_core::ServerEvent;
use tokio::sync::broadcast;
use tracing::debug;

/// Publish/subscribe hub for server events. Cheap to clone.
#[derive(Clone, Debug)]
pub struct EventBus {
    sender: broadcast::Sender<ServerEvent>,
}

impl EventBus {
    /// Create a bus buffering at most `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Deliver an event to every current subscriber.
    ///
    /// Publishing with no subscribers is not an error; the event is dropped.
    pub fn publish(&self, event: ServerEvent) {
        let kind = event.kind();
        if let Ok(count) = self.sender.send(event) {
            debug!(kind, subscribers = count, "Published server event");
        }
    }

    /// Register a new subscriber. It receives events published from now on.
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Remove a subscriber.
    #[allow(clippy::needless_pass_by_value)]
    pub fn unsubscribe(&self, subscription: Subscription) {
        drop(subscription);
        debug!(
            subscribers = self.subscriber_count(),
            "Event subscriber removed"
        );
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Receiving end of one subscriber.
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<ServerEvent>,
}

impl Subscription {
    /// Next event, skipping over anything lost to lag.
    ///
    /// Returns `None` once the bus has been dropped.
    pub async fn recv(&mut self) -> Option<ServerEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Event subscriber lagged, dropped oldest events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of [`Subscription::recv`].
    pub fn try_recv(&mut self) -> Option<ServerEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "Event subscriber lagged, dropped oldest events");
                }
                Err(_) => return None,
            }
        }
    }
}
