//! # Topic Broker
//!
//! Central registry owning every publisher and subscriber entry.
//!
//! ## Synchronisation
//!
//! All registry state (both entry maps and the in-flight topic set) lives in
//! one `ReentrantMutex<RefCell<Registry>>`. Every operation holds the lock for
//! its full duration, notification dispatch included, so:
//!
//! - publishes from different threads are serialised, and the in-flight
//!   check-and-set is atomic with respect to them;
//! - a subscriber callback running on the publishing thread can re-enter the
//!   broker (publish, query, register, unregister).
//!
//! `RefCell` borrows are never held while caller code runs, including the
//! `Drop` of a value displaced by a newer publish.
//!
//! ## Cycle Detection
//!
//! ```text
//! publish(t1) ──► in_flight = {t1} ──► subscriber A ──► publish(t2)
//!                                                        │
//!                   in_flight = {t1, t2} ◄───────────────┘
//!                          │
//!                          ▼
//!                    subscriber B ──► publish(t1)  ✗ CycleDetected
//! ```

use crate::config::BrokerConfig;
use crate::domain::{
    AnyTopic, PublisherEntry, PublisherId, SubscriberEntry, SubscriberId, Topic, TopicMatcher,
    TopicSet, TopicValue, ValuesByTopic,
};
use crate::error::BrokerError;
use crate::metrics::{BrokerMetrics, MetricsSnapshot};
use crate::ports::{Broker, PublisherFactory, Subscriber, SubscriberFactory};
use crate::service::context::{PublisherContext, SubscriberContext};
use crate::service::token::{PublisherToken, SubscriberToken};
use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Registry state guarded by the broker lock.
#[derive(Debug, Default)]
struct Registry {
    publishers: BTreeMap<PublisherId, PublisherEntry>,
    subscribers: BTreeMap<SubscriberId, SubscriberEntry>,
    /// Topics whose publish cascade is currently running.
    in_flight: HashSet<AnyTopic>,
}

/// Removes a topic from the in-flight set when the publish leaves scope.
struct InFlightGuard<'a> {
    registry: &'a RefCell<Registry>,
    topic: &'a AnyTopic,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        // try_borrow_mut: never panic while already unwinding.
        if let Ok(mut registry) = self.registry.try_borrow_mut() {
            registry.in_flight.remove(self.topic);
        }
    }
}

/// State shared between the broker handle, contexts, and tokens.
pub(crate) struct BrokerShared {
    id: Uuid,
    config: BrokerConfig,
    next_id: AtomicU64,
    registry: ReentrantMutex<RefCell<Registry>>,
    metrics: BrokerMetrics,
}

impl BrokerShared {
    fn new(config: BrokerConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            next_id: AtomicU64::new(1),
            registry: ReentrantMutex::new(RefCell::new(Registry::default())),
            metrics: BrokerMetrics::new(),
        }
    }

    fn issue_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Publish on behalf of publisher `id`.
    pub(crate) fn publish(&self, id: PublisherId, value: TopicValue) -> Result<(), BrokerError> {
        let registry = self.registry.lock();

        let topic = registry
            .borrow()
            .publishers
            .get(&id)
            .map(|entry| entry.topic().clone());
        let Some(topic) = topic else {
            warn!(
                broker = %self.config.name,
                publisher = %id,
                "Attempt to publish value by unregistered publisher"
            );
            self.metrics.record_stale_identity();
            return Ok(());
        };

        self.publish_to_topic(&registry, id, &topic, value)
    }

    fn publish_to_topic(
        &self,
        registry: &RefCell<Registry>,
        id: PublisherId,
        topic: &AnyTopic,
        value: TopicValue,
    ) -> Result<(), BrokerError> {
        let entered = registry.borrow_mut().in_flight.insert(topic.clone());
        if !entered {
            warn!(
                broker = %self.config.name,
                publisher = %id,
                topic = %topic,
                "Publication cycle detected"
            );
            self.metrics.record_cycle();
            return Err(BrokerError::CycleDetected {
                topic: topic.clone(),
            });
        }
        let _in_flight = InFlightGuard { registry, topic };

        // The displaced value is dropped only after the borrow ends.
        let stored = registry
            .borrow_mut()
            .publishers
            .get_mut(&id)
            .map(|entry| entry.set_value(value));
        match stored {
            Some(Ok(displaced)) => {
                drop(displaced);
                self.metrics.record_value_published();
            }
            Some(Err(err)) => {
                warn!(
                    broker = %self.config.name,
                    publisher = %id,
                    error = %err,
                    "Published value rejected"
                );
                self.metrics.record_type_mismatch();
                return Err(err);
            }
            None => {
                self.metrics.record_stale_identity();
                return Ok(());
            }
        }

        debug!(broker = %self.config.name, publisher = %id, topic = %topic, "Value published");
        self.notify_subscribers_for_topic(registry, topic)
    }

    /// Call every subscriber matching `topic` with `{topic}`, in registry order.
    fn notify_subscribers_for_topic(
        &self,
        registry: &RefCell<Registry>,
        topic: &AnyTopic,
    ) -> Result<(), BrokerError> {
        let targets: Vec<(SubscriberId, Arc<dyn Subscriber>)> = registry
            .borrow()
            .subscribers
            .iter()
            .filter(|(_, entry)| entry.matches(topic))
            .map(|(id, entry)| (*id, Arc::clone(entry.subscriber())))
            .collect();
        if targets.is_empty() {
            return Ok(());
        }

        let topics = TopicSet::single(topic.clone());
        for (id, subscriber) in targets {
            // An earlier callback in this cascade may have unregistered it.
            if !registry.borrow().subscribers.contains_key(&id) {
                continue;
            }
            debug!(broker = %self.config.name, subscriber = %id, topic = %topic, "Notifying subscriber");
            self.metrics.record_notification();
            subscriber.topics_changed(&topics)?;
        }
        Ok(())
    }

    pub(crate) fn unregister_publisher(&self, id: PublisherId) -> Result<(), BrokerError> {
        let registry = self.registry.lock();

        let removed = registry.borrow_mut().publishers.remove(&id);
        match removed {
            Some(entry) => {
                debug!(broker = %self.config.name, publisher = %id, topic = %entry.topic(), "Publisher unregistered");
                self.notify_subscribers_for_topic(&registry, entry.topic())
            }
            None => {
                warn!(
                    broker = %self.config.name,
                    publisher = %id,
                    "Attempt to unregister unregistered publisher"
                );
                self.metrics.record_stale_identity();
                Ok(())
            }
        }
    }

    pub(crate) fn unregister_subscriber(&self, id: SubscriberId) {
        let registry = self.registry.lock();

        let removed = registry.borrow_mut().subscribers.remove(&id);
        if removed.is_some() {
            debug!(broker = %self.config.name, subscriber = %id, "Subscriber unregistered");
        } else {
            warn!(
                broker = %self.config.name,
                subscriber = %id,
                "Attempt to unregister unregistered subscriber"
            );
            self.metrics.record_stale_identity();
        }
    }

    pub(crate) fn values_for_topic<T: Clone + 'static>(&self, topic: &Topic<T>) -> Vec<T> {
        let guard = self.registry.lock();
        let registry = guard.borrow();

        let values: Vec<T> = registry
            .publishers
            .values()
            .filter(|entry| entry.publishes(topic.erased()))
            .filter_map(PublisherEntry::value)
            .filter_map(|value| value.downcast_ref::<T>().cloned())
            .collect();
        values
    }

    pub(crate) fn values_for_matching_topics(&self, id: SubscriberId) -> ValuesByTopic {
        let guard = self.registry.lock();
        let registry = guard.borrow();

        let mut values = ValuesByTopic::default();
        let Some(subscriber) = registry.subscribers.get(&id) else {
            warn!(
                broker = %self.config.name,
                subscriber = %id,
                "Attempt to retrieve values by unregistered subscriber"
            );
            self.metrics.record_stale_identity();
            return values;
        };

        for entry in registry
            .publishers
            .values()
            .filter(|entry| subscriber.matches(entry.topic()))
        {
            if let Some(value) = entry.value() {
                values.push(entry.topic().clone(), value.clone());
            }
        }
        values
    }
}

/// In-process topic broker.
///
/// Cheap to clone; clones share the same registry.
///
/// ```rust,ignore
/// use topic_broker::{Broker, Topic, TopicBroker, TopicMatcher};
///
/// let broker = TopicBroker::new();
/// let speed = Topic::<f64>::of("train.speed");
///
/// let publisher = broker.register_publisher(&speed, |ctx| Ok(ctx))?;
/// let subscriber = broker.register_subscriber(TopicMatcher::for_topic(&speed), |ctx| {
///     Ok(SpeedGauge::new(ctx))
/// })?;
///
/// publisher.publisher().publish(42.0_f64)?; // SpeedGauge::topics_changed runs here
/// ```
#[derive(Clone)]
pub struct TopicBroker {
    shared: Arc<BrokerShared>,
}

impl TopicBroker {
    /// Create a broker with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_valid_config(BrokerConfig::default())
    }

    /// Create a broker with a custom configuration.
    ///
    /// # Errors
    ///
    /// `BrokerError::InvalidConfig` if the configuration does not validate.
    pub fn with_config(config: BrokerConfig) -> Result<Self, BrokerError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: BrokerConfig) -> Self {
        let shared = BrokerShared::new(config);
        info!(
            broker = %shared.config.name,
            broker_id = %shared.id,
            notify_on_publisher_registration = shared.config.notify_on_publisher_registration,
            "Topic broker created"
        );
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Unique identifier of this broker instance.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    #[must_use]
    pub fn config(&self) -> &BrokerConfig {
        &self.shared.config
    }

    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.shared.metrics.snapshot()
    }

    /// Number of currently registered publishers.
    #[must_use]
    pub fn publisher_count(&self) -> usize {
        self.shared.registry.lock().borrow().publishers.len()
    }

    /// Number of currently registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.registry.lock().borrow().subscribers.len()
    }

    /// Current values of every publisher on `topic` that holds one.
    #[must_use]
    pub fn values_for_topic<T: Clone + 'static>(&self, topic: &Topic<T>) -> Vec<T> {
        self.shared.values_for_topic(topic)
    }
}

impl std::fmt::Debug for TopicBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopicBroker")
            .field("id", &self.shared.id)
            .field("name", &self.shared.config.name)
            .finish_non_exhaustive()
    }
}

impl Default for TopicBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl Broker for TopicBroker {
    fn register_publisher<P, F>(
        &self,
        topic: impl AsRef<AnyTopic>,
        factory: F,
    ) -> Result<PublisherToken<P>, BrokerError>
    where
        F: PublisherFactory<P>,
    {
        let shared = &self.shared;
        let topic = topic.as_ref().clone();
        let id = PublisherId::new(shared.issue_id());
        let registry = shared.registry.lock();

        let context = PublisherContext::new(Arc::downgrade(shared), id);
        let publisher = factory.new_publisher(context)?;
        registry
            .borrow_mut()
            .publishers
            .insert(id, PublisherEntry::new(topic.clone()));
        shared.metrics.record_publisher_registered();
        debug!(broker = %shared.config.name, publisher = %id, topic = %topic, "Publisher registered");

        if shared.config.notify_on_publisher_registration {
            if let Err(err) = shared.notify_subscribers_for_topic(&registry, &topic) {
                let removed = registry.borrow_mut().publishers.remove(&id);
                drop(removed);
                return Err(err);
            }
        }

        Ok(PublisherToken::new(Arc::downgrade(shared), id, publisher))
    }

    fn register_subscriber<S, F>(
        &self,
        matcher: TopicMatcher,
        factory: F,
    ) -> Result<SubscriberToken<S>, BrokerError>
    where
        S: Subscriber,
        F: SubscriberFactory<S>,
    {
        let shared = &self.shared;
        let id = SubscriberId::new(shared.issue_id());
        let registry = shared.registry.lock();

        let context = SubscriberContext::new(Arc::downgrade(shared), id);
        let subscriber = Arc::new(factory.new_subscriber(context)?);

        // Publishers count here whether or not they hold a value yet.
        let topics: TopicSet = registry
            .borrow()
            .publishers
            .values()
            .map(PublisherEntry::topic)
            .filter(|topic| matcher.matches(topic))
            .cloned()
            .collect();

        let handle: Arc<dyn Subscriber> = subscriber.clone();
        registry
            .borrow_mut()
            .subscribers
            .insert(id, SubscriberEntry::new(matcher, handle));
        shared.metrics.record_subscriber_registered();
        debug!(
            broker = %shared.config.name,
            subscriber = %id,
            matching_topics = topics.len(),
            "Subscriber registered"
        );

        if !topics.is_empty() {
            shared.metrics.record_notification();
            if let Err(err) = subscriber.topics_changed(&topics) {
                let removed = registry.borrow_mut().subscribers.remove(&id);
                drop(removed);
                return Err(err);
            }
        }

        Ok(SubscriberToken::new(Arc::downgrade(shared), id, subscriber))
    }
}
