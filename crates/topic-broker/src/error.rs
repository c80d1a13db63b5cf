//! Error types for the topic broker.

use crate::domain::AnyTopic;
use thiserror::Error;

/// Boxed error raised by caller code (factories, subscriber callbacks).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by broker operations.
///
/// Stale identities (publishing after unregistration, querying from a removed
/// subscriber, unregistering twice) are NOT errors; they are logged and counted.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// A publish re-entered a topic whose notification cascade is still running.
    #[error("Publication cycle detected on topic {topic}")]
    CycleDetected { topic: AnyTopic },

    /// The published value does not conform to the topic's type witness.
    #[error("Type mismatch on topic {topic}: expected {expected}, found {found}")]
    TypeMismatch {
        topic: AnyTopic,
        expected: &'static str,
        found: &'static str,
    },

    /// A publisher or subscriber factory failed.
    #[error("Factory failed: {0}")]
    Factory(#[source] BoxError),

    /// A subscriber notification callback failed.
    #[error("Subscriber callback failed: {0}")]
    Subscriber(#[source] BoxError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BrokerError {
    /// Wrap an arbitrary factory failure.
    pub fn factory(err: impl Into<BoxError>) -> Self {
        Self::Factory(err.into())
    }

    /// Wrap an arbitrary subscriber callback failure.
    pub fn subscriber(err: impl Into<BoxError>) -> Self {
        Self::Subscriber(err.into())
    }

    /// Returns `true` for [`BrokerError::CycleDetected`].
    #[must_use]
    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::CycleDetected { .. })
    }

    /// Returns `true` for [`BrokerError::TypeMismatch`].
    #[must_use]
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}

/// Errors from building a [`TopicMatcher`](crate::domain::TopicMatcher).
#[derive(Debug, Error)]
pub enum MatcherError {
    /// A set matcher needs at least one topic.
    #[error("Topic matcher requires at least one topic")]
    EmptyTopicSet,

    #[error("Invalid topic name pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
