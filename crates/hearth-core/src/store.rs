//! Last-known value storage keyed by topic.

use std::collections::BTreeMap;

/// Ordered mapping from full topic string to its last observed value.
///
/// The key set is the dashboard's entire observable world-state. Keys are
/// never removed — an empty payload is a value like any other — and the
/// map's ascending key order is the single sort key everywhere zones,
/// devices, and controls are enumerated.
#[derive(Debug, Clone, Default)]
pub struct ValueStore {
    values: BTreeMap<String, String>,
}

impl ValueStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a value. Returns `true` if the topic was new.
    ///
    /// Presence is read before the write: "seen for the first time" is the
    /// event that drives widget materialization downstream, so it must
    /// reflect the state prior to this call.
    pub fn insert(&mut self, topic: &str, value: &str) -> bool {
        let first_sight = !self.values.contains_key(topic);
        self.values.insert(topic.to_owned(), value.to_owned());
        first_sight
    }

    /// Last value for `topic`, if one has arrived.
    #[must_use]
    pub fn get(&self, topic: &str) -> Option<&str> {
        self.values.get(topic).map(String::as_str)
    }

    /// Last value for `topic`, or `fallback` if none has arrived yet.
    #[must_use]
    pub fn get_or<'a>(&'a self, topic: &str, fallback: &'a str) -> &'a str {
        self.get(topic).unwrap_or(fallback)
    }

    #[must_use]
    pub fn contains(&self, topic: &str) -> bool {
        self.values.contains_key(topic)
    }

    /// All topics in ascending lexicographic order.
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
