/*
[INPUT]:  subscribe/unsubscribe calls from a WebSocket client
[OUTPUT]: Live topic set and topic -> callback lookup
[POS]:    WebSocket layer - subscription bookkeeping, drives resubscription
[UPDATE]: When changing callback precedence or topic lifecycle
*/

use std::collections::BTreeMap;

use serde_json::Value;

use crate::ws::callback::Callback;

/// Topics the server currently considers subscribed, each with an optional callback.
///
/// Owned by exactly one client.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    entries: BTreeMap<String, Option<Callback<Value>>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `topic`. `Some` replaces any existing callback, `None` keeps it.
    ///
    /// Returns `true` if the topic was not registered before.
    pub fn register(&mut self, topic: impl Into<String>, callback: Option<Callback<Value>>) -> bool {
        let topic = topic.into();
        match self.entries.get_mut(&topic) {
            Some(existing) => {
                if callback.is_some() {
                    *existing = callback;
                }
                false
            }
            None => {
                self.entries.insert(topic, callback);
                true
            }
        }
    }

    /// Returns `true` if the topic was registered.
    pub fn unregister(&mut self, topic: &str) -> bool {
        self.entries.remove(topic).is_some()
    }

    /// Registered topics in lexical order.
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.entries.contains_key(topic)
    }

    pub fn callback_for(&self, topic: &str) -> Option<&Callback<Value>> {
        self.entries.get(topic).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
