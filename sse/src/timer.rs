use crate::broker::Broker;
use crate::registry::SubscriptionId;
use log::*;
use tokio::task::JoinHandle;

/// Spawns the watchdog that evicts `id` once the broker's idle threshold has
/// passed since connect. Activity on the subscription does not reset it.
pub(crate) fn spawn_idle_timer(broker: Broker, id: SubscriptionId) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(broker.idle_timeout()).await;

        if !broker.expire(&id).await {
            trace!("Idle timer fired for subscription {id} after it was already gone");
        }
    })
}
