//! Counters for broker activity
//!
//! Every diagnostic the broker records (stale identities, cycles, type
//! mismatches) is also counted here so hosts and tests can observe it without
//! scraping logs.
//!
//! ## Usage
//!
//! ```ignore
//! let broker = TopicBroker::new();
//! // ... register, publish ...
//! let snapshot = broker.metrics();
//! println!("delivered {} notifications", snapshot.notifications_delivered);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for broker operations
#[derive(Debug, Default)]
pub struct BrokerMetrics {
    /// Total publishers registered
    pub publishers_registered: AtomicU64,
    /// Total subscribers registered
    pub subscribers_registered: AtomicU64,
    /// Values accepted and stored
    pub values_published: AtomicU64,
    /// `topics_changed` calls made
    pub notifications_delivered: AtomicU64,
    /// Publishes rejected by the in-flight guard
    pub cycles_detected: AtomicU64,
    /// Publishes rejected by the type check
    pub type_mismatches: AtomicU64,
    /// Operations attempted with an identity that is no longer registered
    pub stale_identity_accesses: AtomicU64,
}

impl BrokerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_publisher_registered(&self) {
        self.publishers_registered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_subscriber_registered(&self) {
        self.subscribers_registered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_value_published(&self) {
        self.values_published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_notification(&self) {
        self.notifications_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cycle(&self) {
        self.cycles_detected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_type_mismatch(&self) {
        self.type_mismatches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale_identity(&self) {
        self.stale_identity_accesses.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            publishers_registered: self.publishers_registered.load(Ordering::Relaxed),
            subscribers_registered: self.subscribers_registered.load(Ordering::Relaxed),
            values_published: self.values_published.load(Ordering::Relaxed),
            notifications_delivered: self.notifications_delivered.load(Ordering::Relaxed),
            cycles_detected: self.cycles_detected.load(Ordering::Relaxed),
            type_mismatches: self.type_mismatches.load(Ordering::Relaxed),
            stale_identity_accesses: self.stale_identity_accesses.load(Ordering::Relaxed),
        }
    }
}

/// Plain copy of [`BrokerMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub publishers_registered: u64,
    pub subscribers_registered: u64,
    pub values_published: u64,
    pub notifications_delivered: u64,
    pub cycles_detected: u64,
    pub type_mismatches: u64,
    pub stale_identity_accesses: u64,
}
