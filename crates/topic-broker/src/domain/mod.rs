//! Domain layer: topics, matchers, and the broker's bookkeeping records.
//!
//! Pure data and predicates; no locking and no logging.

pub mod entry;
pub mod matcher;
pub mod topic;
pub mod values;

pub use entry::{PublisherEntry, PublisherId, SubscriberEntry, SubscriberId, TopicValue};
pub use matcher::TopicMatcher;
pub use topic::{AnyTopic, Topic, TopicSet, TypeWitness};
pub use values::ValuesByTopic;
