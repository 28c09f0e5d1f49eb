use crate::error::{Error, Result};
use crate::message::Message;
use crate::registry::{Registry, SubscriptionId};
use crate::subscription::Subscription;
use crate::timer;
use futures_util::future::join_all;
use log::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};

/// Seconds a subscription stays open before it is evicted with a timeout event.
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 30;

/// Capacity of each subscription's delivery channel.
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 1;

/// Topic fan-out engine.
///
/// Cloning a `Broker` is cheap and every clone shares the same registry and
/// sequence counter. All registry access goes through one `RwLock`:
/// register, unregister, expiry and shutdown take it for writing, while
/// `publish` holds it for reading across the whole delivery so the set of
/// matching subscribers can't change underneath it.
#[derive(Clone)]
pub struct Broker {
    registry: Arc<RwLock<Registry>>,
    sequence: Arc<AtomicU64>,
    idle_timeout: Duration,
    subscriber_buffer: usize,
}

impl Broker {
    pub fn new(idle_timeout: Duration, subscriber_buffer: usize) -> Self {
        Self {
            registry: Arc::new(RwLock::new(Registry::new())),
            sequence: Arc::new(AtomicU64::new(0)),
            idle_timeout,
            subscriber_buffer: subscriber_buffer.max(1),
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Register a new subscription on `topic` without an idle timer.
    pub async fn register(&self, topic: impl Into<String>) -> Result<Subscription> {
        self.insert(topic.into(), false).await
    }

    /// Register a new subscription on `topic` and start its idle timer.
    pub async fn subscribe(&self, topic: impl Into<String>) -> Result<Subscription> {
        self.insert(topic.into(), true).await
    }

    async fn insert(&self, topic: String, idle_timer: bool) -> Result<Subscription> {
        let (sender, receiver) = mpsc::channel(self.subscriber_buffer);
        let id = SubscriptionId::new();

        {
            let mut registry = self.registry.write().await;
            if registry.is_draining() {
                warn!("Rejecting subscription on topic {topic}: broker is shutting down");
                return Err(Error::ShuttingDown);
            }

            registry.insert(id.clone(), topic.clone(), sender);

            if idle_timer {
                let handle = timer::spawn_idle_timer(self.clone(), id.clone());
                registry.set_idle_timer(&id, handle.abort_handle());
            }
        }

        info!("Registered subscription {id} on topic {topic}");
        Ok(Subscription::new(id, topic, receiver, self.clone()))
    }

    /// Unregister a subscription, closing its channel. Returns `false` if it was already gone.
    pub async fn unregister(&self, id: &SubscriptionId) -> bool {
        let removed = self.registry.write().await.remove(id);

        match removed {
            Some(entry) => {
                if let Some(idle_timer) = &entry.idle_timer {
                    idle_timer.abort();
                }
                info!(
                    "Unregistered subscription {id} on topic {}",
                    entry.topic
                );
                // Dropping the entry drops the only sender, which closes the channel
                drop(entry);
                true
            }
            None => {
                debug!("Subscription {id} was already unregistered");
                false
            }
        }
    }

    /// Evicts a subscription whose idle threshold elapsed: the timeout marker is
    /// its last message, then its channel closes. No-op if it is already gone.
    pub(crate) async fn expire(&self, id: &SubscriptionId) -> bool {
        let Some(entry) = self.registry.write().await.remove(id) else {
            return false;
        };

        // The entry is out of the registry, so no publish can write to this
        // sender anymore and the marker is guaranteed to be the last message.
        let marker = Message::timeout(self.idle_timeout);
        if entry.sender.send(marker).await.is_err() {
            debug!("Subscription {id} went away before its timeout event was delivered");
        }

        info!(
            "Subscription {id} on topic {} timed out after {:?}",
            entry.topic, self.idle_timeout
        );
        true
    }

    /// Publish `payload` to every subscription currently bound to `topic`.
    ///
    /// Returns the sequence number assigned to the message. Each delivery waits
    /// for room in the subscriber's channel, so this returns only once every
    /// matched subscriber has accepted the message or gone away.
    pub async fn publish(&self, topic: &str, payload: &str) -> u64 {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let message = Message::new(sequence, payload);

        let registry = self.registry.read().await;
        let deliveries = registry.senders_for(topic).map(|(id, sender)| {
            let message = message.clone();
            async move {
                match sender.send(message).await {
                    Ok(()) => true,
                    Err(_) => {
                        debug!("Skipping closed subscription {id} on topic {topic}");
                        false
                    }
                }
            }
        });

        let delivered = join_all(deliveries)
            .await
            .into_iter()
            .filter(|delivered| *delivered)
            .count();

        debug!("Published message {sequence} to {delivered} subscriber(s) on topic {topic}");
        sequence
    }

    /// Drain hook: closes every subscription and rejects new ones.
    /// Returns how many subscriptions were closed.
    pub async fn shutdown(&self) -> usize {
        let entries = self.registry.write().await.drain();

        for entry in &entries {
            if let Some(idle_timer) = &entry.idle_timer {
                idle_timer.abort();
            }
        }

        let closed = entries.len();
        drop(entries);

        info!("Broker shut down, closed {closed} subscription(s)");
        closed
    }

    /// Number of live subscriptions bound to `topic`.
    pub async fn subscriber_count(&self, topic: &str) -> usize {
        self.registry.read().await.count_for(topic)
    }

    /// Number of live subscriptions across all topics.
    pub async fn len(&self) -> usize {
        self.registry.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.registry.read().await.is_empty()
    }
}

impl Default for Broker {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
            DEFAULT_SUBSCRIBER_BUFFER,
        )
    }
}
