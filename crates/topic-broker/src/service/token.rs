//! Registration handles returned to callers.
//!
//! Dropping a token does NOT unregister; call [`PublisherToken::unregister`] or
//! [`SubscriberToken::unregister`] explicitly. Both are idempotent.

use crate::domain::{PublisherId, SubscriberId};
use crate::error::BrokerError;
use crate::service::BrokerShared;
use std::sync::{Arc, Weak};
use tracing::warn;

/// Handle to a registered publisher and the object its factory built.
#[derive(Debug)]
pub struct PublisherToken<P> {
    broker: Weak<BrokerShared>,
    id: PublisherId,
    publisher: P,
}

impl<P> PublisherToken<P> {
    pub(crate) fn new(broker: Weak<BrokerShared>, id: PublisherId, publisher: P) -> Self {
        Self {
            broker,
            id,
            publisher,
        }
    }

    #[must_use]
    pub fn id(&self) -> PublisherId {
        self.id
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn publisher_mut(&mut self) -> &mut P {
        &mut self.publisher
    }

    /// Remove the publisher and notify subscribers matching its topic.
    ///
    /// # Errors
    ///
    /// Any error returned by a notified subscriber.
    pub fn unregister(&self) -> Result<(), BrokerError> {
        let Some(broker) = self.broker.upgrade() else {
            warn!(publisher = %self.id, "Attempt to unregister publisher after broker was dropped");
            return Ok(());
        };
        broker.unregister_publisher(self.id)
    }
}

/// Handle to a registered subscriber and the object its factory built.
#[derive(Debug)]
pub struct SubscriberToken<S> {
    broker: Weak<BrokerShared>,
    id: SubscriberId,
    subscriber: Arc<S>,
}

impl<S> SubscriberToken<S> {
    pub(crate) fn new(broker: Weak<BrokerShared>, id: SubscriberId, subscriber: Arc<S>) -> Self {
        Self {
            broker,
            id,
            subscriber,
        }
    }

    #[must_use]
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn subscriber(&self) -> &S {
        &self.subscriber
    }

    /// Shared handle to the subscriber object (the broker holds another).
    pub fn subscriber_arc(&self) -> Arc<S> {
        Arc::clone(&self.subscriber)
    }

    /// Remove the subscriber. Nobody is notified.
    pub fn unregister(&self) {
        let Some(broker) = self.broker.upgrade() else {
            warn!(subscriber = %self.id, "Attempt to unregister subscriber after broker was dropped");
            return;
        };
        broker.unregister_subscriber(self.id);
    }
}
