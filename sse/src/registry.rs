use crate::message::Message;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tokio::sync::mpsc::Sender;
use tokio::task::AbortHandle;

pub type Topic = String;

/// Unique identifier for a subscription (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(String);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A live registry entry. Holding the only `Sender` means removing the entry closes the channel.
#[derive(Debug)]
pub(crate) struct Entry {
    pub topic: Topic,
    pub sender: Sender<Message>,
    pub idle_timer: Option<AbortHandle>,
}

/// Subscription registry with a secondary topic index for fan-out lookups.
///
/// Not synchronized on its own: the `Broker` keeps it behind a single `RwLock`
/// so every mutation and every publish scan see a consistent view.
#[derive(Debug, Default)]
pub struct Registry {
    /// Primary storage: lookup by subscription id for registration/cleanup
    subscriptions: HashMap<SubscriptionId, Entry>,

    /// Secondary index: subscription ids bound to each topic
    topic_index: HashMap<Topic, HashSet<SubscriptionId>>,

    /// Set once the broker has been drained
    draining: bool,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, id: SubscriptionId, topic: Topic, sender: Sender<Message>) {
        self.topic_index
            .entry(topic.clone())
            .or_default()
            .insert(id.clone());

        self.subscriptions.insert(
            id,
            Entry {
                topic,
                sender,
                idle_timer: None,
            },
        );
    }

    pub(crate) fn set_idle_timer(&mut self, id: &SubscriptionId, handle: AbortHandle) {
        match self.subscriptions.get_mut(id) {
            Some(entry) => entry.idle_timer = Some(handle),
            None => handle.abort(),
        }
    }

    /// Removes an entry, returning it if it was still present.
    pub(crate) fn remove(&mut self, id: &SubscriptionId) -> Option<Entry> {
        let entry = self.subscriptions.remove(id)?;

        if let Some(ids) = self.topic_index.get_mut(&entry.topic) {
            ids.remove(id);

            // Clean up empty topic entries
            if ids.is_empty() {
                self.topic_index.remove(&entry.topic);
            }
        }

        Some(entry)
    }

    /// Removes every entry and refuses further inserts from the broker.
    pub(crate) fn drain(&mut self) -> Vec<Entry> {
        self.draining = true;
        self.topic_index.clear();
        self.subscriptions.drain().map(|(_, entry)| entry).collect()
    }

    pub(crate) fn is_draining(&self) -> bool {
        self.draining
    }

    /// Senders of every subscription currently bound to `topic`.
    pub(crate) fn senders_for<'a>(
        &'a self,
        topic: &str,
    ) -> impl Iterator<Item = (&'a SubscriptionId, &'a Sender<Message>)> + 'a {
        self.topic_index
            .get(topic)
            .into_iter()
            .flat_map(|ids| ids.iter())
            .filter_map(move |id| {
                self.subscriptions
                    .get(id)
                    .map(|entry| (id, &entry.sender))
            })
    }

    pub fn contains(&self, id: &SubscriptionId) -> bool {
        self.subscriptions.contains_key(id)
    }

    pub fn topic_of(&self, id: &SubscriptionId) -> Option<&str> {
        self.subscriptions.get(id).map(|entry| entry.topic.as_str())
    }

    pub fn count_for(&self, topic: &str) -> usize {
        self.topic_index.get(topic).map_or(0, HashSet::len)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn insert_new(registry: &mut Registry, topic: &str) -> SubscriptionId {
        let (tx, _rx) = mpsc::channel(1);
        let id = SubscriptionId::new();
        registry.insert(id.clone(), topic.to_string(), tx);
        id
    }

    #[test]
    fn test_subscription_ids_are_unique() {
        assert_ne!(SubscriptionId::new(), SubscriptionId::new());
    }

    #[test]
    fn test_insert_indexes_by_topic() {
        let mut registry = Registry::new();
        let news_a = insert_new(&mut registry, "news");
        let news_b = insert_new(&mut registry, "news");
        let sports = insert_new(&mut registry, "sports");

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.count_for("news"), 2);
        assert_eq!(registry.count_for("sports"), 1);
        assert_eq!(registry.count_for("weather"), 0);
        assert_eq!(registry.topic_of(&sports), Some("sports"));

        let mut matched: Vec<_> = registry
            .senders_for("news")
            .map(|(id, _)| id.clone())
            .collect();
        matched.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        let mut expected = vec![news_a, news_b];
        expected.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        assert_eq!(matched, expected);
    }

    #[test]
    fn test_remove_is_idempotent_and_cleans_topic_index() {
        let mut registry = Registry::new();
        let id = insert_new(&mut registry, "news");

        assert!(registry.remove(&id).is_some());
        assert!(registry.remove(&id).is_none());
        assert!(!registry.contains(&id));
        assert!(registry.is_empty());
        assert_eq!(registry.senders_for("news").count(), 0);
        assert!(registry.topic_index.is_empty());
    }

    #[test]
    fn test_removing_entry_closes_channel() {
        let mut registry = Registry::new();
        let (tx, mut rx) = mpsc::channel::<Message>(1);
        let id = SubscriptionId::new();
        registry.insert(id.clone(), "news".to_string(), tx);

        assert_eq!(rx.try_recv(), Err(mpsc::error::TryRecvError::Empty));
        drop(registry.remove(&id));
        assert_eq!(
            rx.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        );
    }

    #[test]
    fn test_drain_empties_registry_and_marks_draining() {
        let mut registry = Registry::new();
        insert_new(&mut registry, "news");
        insert_new(&mut registry, "sports");

        let drained = registry.drain();

        assert_eq!(drained.len(), 2);
        assert!(registry.is_empty());
        assert!(registry.is_draining());
        assert_eq!(registry.count_for("news"), 0);
    }
}
