//! # Inbound Ports
//!
//! The capability contracts between the broker and its callers:
//!
//! - [`Broker`]: registration API (driving port)
//! - [`PublisherFactory`] / [`SubscriberFactory`]: build caller objects around
//!   a broker-issued context
//! - [`Subscriber`]: the single notification surface a subscriber implements

use crate::domain::{AnyTopic, TopicMatcher, TopicSet};
use crate::error::BrokerError;
use crate::service::{PublisherContext, PublisherToken, SubscriberContext, SubscriberToken};

/// Notification surface of a subscriber.
///
/// Called synchronously, on the thread that triggered the change, zero or more
/// times. Returning an error aborts the rest of the notification cascade and
/// propagates to whoever triggered it.
pub trait Subscriber: Send + Sync + 'static {
    /// The topics in `topics` changed: a value was published, or a publisher
    /// appeared or disappeared.
    fn topics_changed(&self, topics: &TopicSet) -> Result<(), BrokerError>;
}

/// Builds a publisher object around its [`PublisherContext`].
///
/// Implemented for every `FnOnce(PublisherContext) -> Result<P, BrokerError>`.
/// The factory must not re-enter the same registration.
pub trait PublisherFactory<P> {
    fn new_publisher(self, context: PublisherContext) -> Result<P, BrokerError>;
}

impl<P, F> PublisherFactory<P> for F
where
    F: FnOnce(PublisherContext) -> Result<P, BrokerError>,
{
    fn new_publisher(self, context: PublisherContext) -> Result<P, BrokerError> {
        self(context)
    }
}

/// Builds a subscriber object around its [`SubscriberContext`].
///
/// Implemented for every `FnOnce(SubscriberContext) -> Result<S, BrokerError>`.
pub trait SubscriberFactory<S: Subscriber> {
    fn new_subscriber(self, context: SubscriberContext) -> Result<S, BrokerError>;
}

impl<S, F> SubscriberFactory<S> for F
where
    S: Subscriber,
    F: FnOnce(SubscriberContext) -> Result<S, BrokerError>,
{
    fn new_subscriber(self, context: SubscriberContext) -> Result<S, BrokerError> {
        self(context)
    }
}

/// Registration API of a topic broker.
pub trait Broker {
    /// Register a publisher on `topic`.
    ///
    /// # Errors
    ///
    /// Whatever the factory returns; with publisher-registration notification
    /// enabled, whatever a notified subscriber returns.
    fn register_publisher<P, F>(
        &self,
        topic: impl AsRef<AnyTopic>,
        factory: F,
    ) -> Result<PublisherToken<P>, BrokerError>
    where
        F: PublisherFactory<P>;

    /// Register a subscriber for the topics selected by `matcher`.
    ///
    /// # Errors
    ///
    /// Whatever the factory or the initial notification returns.
    fn register_subscriber<S, F>(
        &self,
        matcher: TopicMatcher,
        factory: F,
    ) -> Result<SubscriberToken<S>, BrokerError>
    where
        S: Subscriber,
        F: SubscriberFactory<S>;
}
