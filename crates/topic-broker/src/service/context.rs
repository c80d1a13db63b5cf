//! Capability handles injected into caller-built publishers and subscribers.
//!
//! A context is bound to one broker-issued identity and only holds a weak
//! reference to the broker, so a subscriber stored inside the broker does not
//! keep the broker alive. Once the broker is gone every operation degrades to
//! a logged no-op.

use crate::domain::{PublisherId, SubscriberId, Topic, TopicValue, ValuesByTopic};
use crate::error::BrokerError;
use crate::service::BrokerShared;
use std::any::Any;
use std::sync::Weak;
use tracing::warn;

/// Write surface handed to a publisher factory.
#[derive(Debug, Clone)]
pub struct PublisherContext {
    broker: Weak<BrokerShared>,
    id: PublisherId,
}

impl PublisherContext {
    pub(crate) fn new(broker: Weak<BrokerShared>, id: PublisherId) -> Self {
        Self { broker, id }
    }

    #[must_use]
    pub fn id(&self) -> PublisherId {
        self.id
    }

    /// Publish `value` on this publisher's topic and notify matching
    /// subscribers before returning.
    ///
    /// A no-op if the publisher was unregistered.
    ///
    /// # Errors
    ///
    /// - `BrokerError::CycleDetected` if called from inside a notification
    ///   cascade that is already publishing this topic
    /// - `BrokerError::TypeMismatch` if `V` is not the topic's type
    /// - any error returned by a notified subscriber
    pub fn publish<V: Any + Send + Sync>(&self, value: V) -> Result<(), BrokerError> {
        let Some(broker) = self.broker.upgrade() else {
            warn!(publisher = %self.id, "Attempt to publish value after broker was dropped");
            return Ok(());
        };
        broker.publish(self.id, TopicValue::new(value))
    }
}

/// Read surface handed to a subscriber factory.
#[derive(Debug, Clone)]
pub struct SubscriberContext {
    broker: Weak<BrokerShared>,
    id: SubscriberId,
}

impl SubscriberContext {
    pub(crate) fn new(broker: Weak<BrokerShared>, id: SubscriberId) -> Self {
        Self { broker, id }
    }

    #[must_use]
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Current values of every publisher on `topic` that holds one.
    ///
    /// Registry order; treat the result as a multiset.
    #[must_use]
    pub fn values_for_topic<T: Clone + 'static>(&self, topic: &Topic<T>) -> Vec<T> {
        match self.broker.upgrade() {
            Some(broker) => broker.values_for_topic(topic),
            None => {
                warn!(subscriber = %self.id, topic = %topic, "Attempt to retrieve values after broker was dropped");
                Vec::new()
            }
        }
    }

    /// Current values of every topic this subscriber's matcher selects,
    /// grouped by topic. Empty once the subscriber is unregistered.
    #[must_use]
    pub fn values_for_matching_topics(&self) -> ValuesByTopic {
        match self.broker.upgrade() {
            Some(broker) => broker.values_for_matching_topics(self.id),
            None => {
                warn!(subscriber = %self.id, "Attempt to retrieve values after broker was dropped");
                ValuesByTopic::default()
            }
        }
    }
}
