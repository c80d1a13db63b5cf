//! Service layer: the broker and the handles it gives out.

mod broker;
pub mod context;
pub mod token;

pub use broker::TopicBroker;
pub(crate) use broker::BrokerShared;
pub use context::{PublisherContext, SubscriberContext};
pub use token::{PublisherToken, SubscriberToken};
