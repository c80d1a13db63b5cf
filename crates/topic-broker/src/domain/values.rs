//! Immutable snapshot of currently-held values grouped by topic.

use crate::domain::entry::TopicValue;
use crate::domain::topic::{AnyTopic, Topic};
use std::collections::HashMap;

/// Multimap `topic -> values`, one value per publisher that holds one.
///
/// Built by the broker and handed out by value; nothing mutates it afterwards.
#[derive(Debug, Clone, Default)]
pub struct ValuesByTopic {
    values: HashMap<AnyTopic, Vec<TopicValue>>,
}

impl ValuesByTopic {
    pub(crate) fn push(&mut self, topic: AnyTopic, value: TopicValue) {
        self.values.entry(topic).or_default().push(value);
    }

    /// Values held for `topic`, cloned as `T`.
    #[must_use]
    pub fn get<T: Clone + 'static>(&self, topic: &Topic<T>) -> Vec<T> {
        self.values(topic.erased())
            .iter()
            .filter_map(|value| value.downcast_ref::<T>().cloned())
            .collect()
    }

    /// Type-erased values held for `topic`; empty if none.
    #[must_use]
    pub fn values(&self, topic: &AnyTopic) -> &[TopicValue] {
        self.values.get(topic).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Topics with at least one value.
    pub fn topics(&self) -> impl Iterator<Item = &AnyTopic> {
        self.values.keys()
    }

    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.values.len()
    }

    /// Total number of values across all topics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
