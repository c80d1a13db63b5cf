//! # Test Fixtures
//!
//! Shared topics plus fake publisher/subscriber implementations used across
//! the integration suites and benchmarks.

use parking_lot::Mutex;
use std::marker::PhantomData;
use topic_broker::{
    Broker, BrokerError, PublisherContext, PublisherToken, Subscriber, SubscriberContext,
    SubscriberToken, Topic, TopicBroker, TopicMatcher, TopicSet,
};

// =============================================================================
// TOPICS
// =============================================================================

pub fn topic_1() -> Topic<i32> {
    Topic::of("topic1")
}

pub fn topic_2() -> Topic<String> {
    Topic::of("topic2")
}

pub fn topic_3() -> Topic<f64> {
    Topic::of("topic3")
}

/// Build the set `{topics...}` for notification assertions.
pub fn topic_set<I, T>(topics: I) -> TopicSet
where
    I: IntoIterator<Item = T>,
    T: AsRef<topic_broker::AnyTopic>,
{
    topics.into_iter().map(|topic| topic.as_ref().clone()).collect()
}

// =============================================================================
// FAKE PUBLISHER
// =============================================================================

/// Publisher exposing a typed `publish` over its context.
#[derive(Debug, Clone)]
pub struct FakePublisher<T> {
    context: PublisherContext,
    _marker: PhantomData<fn(T)>,
}

impl<T: Send + Sync + 'static> FakePublisher<T> {
    pub fn new(context: PublisherContext) -> Self {
        Self {
            context,
            _marker: PhantomData,
        }
    }

    /// Factory suitable for [`Broker::register_publisher`].
    pub fn factory() -> impl FnOnce(PublisherContext) -> Result<Self, BrokerError> {
        |context: PublisherContext| Ok(Self::new(context))
    }

    pub fn publish(&self, value: T) -> Result<(), BrokerError> {
        self.context.publish(value)
    }

    /// Raw context, for publishing values of the wrong type.
    pub fn context(&self) -> &PublisherContext {
        &self.context
    }
}

// =============================================================================
// RECORDING SUBSCRIBER
// =============================================================================

/// Subscriber that records every `topics_changed` call.
#[derive(Debug)]
pub struct RecordingSubscriber {
    context: SubscriberContext,
    received: Mutex<Vec<TopicSet>>,
}

impl RecordingSubscriber {
    pub fn new(context: SubscriberContext) -> Self {
        Self {
            context,
            received: Mutex::new(Vec::new()),
        }
    }

    /// Factory suitable for [`Broker::register_subscriber`].
    pub fn factory() -> impl FnOnce(SubscriberContext) -> Result<Self, BrokerError> {
        |context: SubscriberContext| Ok(Self::new(context))
    }

    pub fn context(&self) -> &SubscriberContext {
        &self.context
    }

    pub fn notifications(&self) -> Vec<TopicSet> {
        self.received.lock().clone()
    }

    pub fn notification_count(&self) -> usize {
        self.received.lock().len()
    }

    pub fn clear(&self) {
        self.received.lock().clear();
    }
}

impl Subscriber for RecordingSubscriber {
    fn topics_changed(&self, topics: &TopicSet) -> Result<(), BrokerError> {
        self.received.lock().push(topics.clone());
        Ok(())
    }
}

// =============================================================================
// REGISTRATION HELPERS
// =============================================================================

pub fn register_publisher<T: Send + Sync + 'static>(
    broker: &TopicBroker,
    topic: &Topic<T>,
) -> PublisherToken<FakePublisher<T>> {
    broker
        .register_publisher(topic, FakePublisher::factory())
        .expect("publisher registration")
}

pub fn register_subscriber(
    broker: &TopicBroker,
    matcher: TopicMatcher,
) -> SubscriberToken<RecordingSubscriber> {
    broker
        .register_subscriber(matcher, RecordingSubscriber::factory())
        .expect("subscriber registration")
}

/// Register a recording subscriber and forget its registration-time
/// notification.
pub fn register_quiet_subscriber(
    broker: &TopicBroker,
    matcher: TopicMatcher,
) -> SubscriberToken<RecordingSubscriber> {
    let token = register_subscriber(broker, matcher);
    token.subscriber().clear();
    token
}
