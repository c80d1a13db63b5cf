pub mod inbound;

pub use inbound::{Broker, PublisherFactory, Subscriber, SubscriberFactory};
