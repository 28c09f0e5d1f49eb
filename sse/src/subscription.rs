use crate::broker::Broker;
use crate::message::Message;
use crate::registry::SubscriptionId;
use log::*;
use tokio::runtime::Handle;
use tokio::sync::mpsc::Receiver;

/// One subscriber's receiving end of a topic.
///
/// Dropping a `Subscription` that hasn't seen its channel close unregisters
/// it from the broker, so every way a stream handler can exit (client gone,
/// error, panic unwinding) releases the registry entry.
pub struct Subscription {
    id: SubscriptionId,
    topic: String,
    receiver: Receiver<Message>,
    broker: Broker,
    closed: bool,
}

impl Subscription {
    pub(crate) fn new(
        id: SubscriptionId,
        topic: String,
        receiver: Receiver<Message>,
        broker: Broker,
    ) -> Self {
        Self {
            id,
            topic,
            receiver,
            broker,
            closed: false,
        }
    }

    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Waits for the next message. `None` means the broker closed the subscription.
    pub async fn recv(&mut self) -> Option<Message> {
        let message = self.receiver.recv().await;
        if message.is_none() {
            self.closed = true;
        }
        message
    }

    /// Unregisters right away instead of waiting for the drop.
    pub async fn unsubscribe(mut self) {
        self.broker.unregister(&self.id).await;
        self.closed = true;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.closed {
            return;
        }

        let broker = self.broker.clone();
        let id = self.id.clone();
        match Handle::try_current() {
            Ok(handle) => {
                debug!("Subscription {id} dropped, scheduling unregister");
                handle.spawn(async move {
                    broker.unregister(&id).await;
                });
            }
            Err(_) => {
                warn!("No async runtime to unregister dropped subscription {id}");
            }
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .field("closed", &self.closed)
            .finish()
    }
}
