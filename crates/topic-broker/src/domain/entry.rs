//! Broker-owned bookkeeping records for registered publishers and subscribers.

use crate::domain::matcher::TopicMatcher;
use crate::domain::topic::{AnyTopic, TypeWitness};
use crate::error::BrokerError;
use crate::ports::Subscriber;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque identity of a registered publisher. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublisherId(u64);

impl PublisherId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for PublisherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "publisher#{}", self.0)
    }
}

/// Opaque identity of a registered subscriber. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscriber#{}", self.0)
    }
}

/// A published value with its runtime type witness.
#[derive(Clone)]
pub struct TopicValue {
    witness: TypeWitness,
    value: Arc<dyn Any + Send + Sync>,
}

impl TopicValue {
    pub fn new<V: Any + Send + Sync>(value: V) -> Self {
        Self {
            witness: TypeWitness::of::<V>(),
            value: Arc::new(value),
        }
    }

    #[must_use]
    pub fn witness(&self) -> TypeWitness {
        self.witness
    }

    /// Borrow the value as `T`, if that is its type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl fmt::Debug for TopicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopicValue")
            .field("type", &self.witness.type_name())
            .finish_non_exhaustive()
    }
}

/// State of one registered publisher.
#[derive(Debug)]
pub struct PublisherEntry {
    topic: AnyTopic,
    value: Option<TopicValue>,
}

impl PublisherEntry {
    /// New entry with no value yet.
    pub fn new(topic: AnyTopic) -> Self {
        Self { topic, value: None }
    }

    pub fn topic(&self) -> &AnyTopic {
        &self.topic
    }

    pub fn value(&self) -> Option<&TopicValue> {
        self.value.as_ref()
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Returns `true` if this entry publishes exactly `topic`.
    pub fn publishes(&self, topic: &AnyTopic) -> bool {
        &self.topic == topic
    }

    /// Store `value` after checking it against the topic's witness and hand
    /// back the value it displaced.
    ///
    /// The displaced value must be dropped by the caller once the registry is
    /// no longer borrowed, since its `Drop` may call back into the broker.
    ///
    /// # Errors
    ///
    /// `BrokerError::TypeMismatch` leaves the previous value in place.
    pub fn set_value(&mut self, value: TopicValue) -> Result<Option<TopicValue>, BrokerError> {
        check_witness(&self.topic, &value)?;
        Ok(self.value.replace(value))
    }
}

/// Fails with `TypeMismatch` unless `value` conforms to `topic`.
pub(crate) fn check_witness(topic: &AnyTopic, value: &TopicValue) -> Result<(), BrokerError> {
    if value.witness() != topic.witness() {
        return Err(BrokerError::TypeMismatch {
            topic: topic.clone(),
            expected: topic.witness().type_name(),
            found: value.witness().type_name(),
        });
    }
    Ok(())
}

/// State of one registered subscriber. Immutable after creation.
pub struct SubscriberEntry {
    matcher: TopicMatcher,
    subscriber: Arc<dyn Subscriber>,
}

impl SubscriberEntry {
    pub fn new(matcher: TopicMatcher, subscriber: Arc<dyn Subscriber>) -> Self {
        Self {
            matcher,
            subscriber,
        }
    }

    pub fn matches(&self, topic: &AnyTopic) -> bool {
        self.matcher.matches(topic)
    }

    pub fn subscriber(&self) -> &Arc<dyn Subscriber> {
        &self.subscriber
    }
}

impl fmt::Debug for SubscriberEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberEntry")
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}
