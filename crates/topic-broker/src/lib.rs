//! # Topic Broker
//!
//! In-process, synchronous publish/subscribe over typed, named topics.
//!
//! Publishers hold the *current* value of one topic. Subscribers select topics
//! with a [`TopicMatcher`] and are told *which* topics changed; they pull the
//! values themselves through their [`SubscriberContext`].
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): topics, matchers, registry records
//!   - `Topic<T>` / `AnyTopic`: name plus value-type witness
//!   - `TopicMatcher`: explicit topic set or anchored name pattern
//! - **Ports Layer** (`ports/`): `Broker`, `Subscriber`, factory traits
//! - **Service Layer** (`service/`): `TopicBroker`, contexts, tokens
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐  publish(v)   ┌──────────────┐  topics_changed({t})  ┌──────────────┐
//! │  Publisher   │ ────────────► │ TopicBroker  │ ────────────────────► │  Subscriber  │
//! │ (context)    │               │  (registry)  │ ◄──────────────────── │  (context)   │
//! └──────────────┘               └──────────────┘   values_for_topic    └──────────────┘
//! ```
//!
//! Notification runs on the publishing thread before `publish` returns. A
//! subscriber may publish from inside `topics_changed`; publishing a topic
//! whose cascade is already running fails with `BrokerError::CycleDetected`.
//!
//! ## Usage Example
//!
//! ```ignore
//! use topic_broker::{Broker, Topic, TopicBroker, TopicMatcher};
//!
//! let broker = TopicBroker::new();
//! let temperature = Topic::<f64>::of("sensor.temperature");
//!
//! let sensor = broker.register_publisher(&temperature, |ctx| Ok(ctx))?;
//! let display = broker.register_subscriber(
//!     TopicMatcher::for_topics_matching_pattern::<f64>("sensor\\..*")?,
//!     |ctx| Ok(Display::new(ctx)),
//! )?;
//!
//! sensor.publisher().publish(21.5_f64)?;
//! ```

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use config::{BrokerConfig, BrokerConfigBuilder, DEFAULT_BROKER_NAME};
pub use domain::{
    AnyTopic, PublisherId, SubscriberId, Topic, TopicMatcher, TopicSet, TopicValue, TypeWitness,
    ValuesByTopic,
};
pub use error::{BoxError, BrokerError, MatcherError};
pub use metrics::{BrokerMetrics, MetricsSnapshot};
pub use ports::{Broker, PublisherFactory, Subscriber, SubscriberFactory};
pub use service::{PublisherContext, PublisherToken, SubscriberContext, SubscriberToken, TopicBroker};
