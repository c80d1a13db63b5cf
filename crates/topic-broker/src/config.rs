//! Broker configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use topic_broker::BrokerConfigBuilder;
//!
//! let config = BrokerConfigBuilder::new()
//!     .name("engine")
//!     .notify_on_publisher_registration(true)
//!     .build()
//!     .expect("Valid config");
//! ```

use crate::error::BrokerError;
use serde::{Deserialize, Serialize};

/// Default broker name used in log fields.
pub const DEFAULT_BROKER_NAME: &str = "topic-broker";

/// Broker configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Name reported in every log record of this broker
    pub name: String,
    /// Notify matching subscribers when a publisher registers, before it has
    /// published anything. Off by default: a bare registration carries no value.
    pub notify_on_publisher_registration: bool,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_BROKER_NAME.to_string(),
            notify_on_publisher_registration: false,
        }
    }
}

impl BrokerConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), BrokerError> {
        if self.name.trim().is_empty() {
            return Err(BrokerError::InvalidConfig(
                "name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Builder-style method to set the broker name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder-style method to toggle publisher-registration notification
    pub fn with_notify_on_publisher_registration(mut self, enabled: bool) -> Self {
        self.notify_on_publisher_registration = enabled;
        self
    }
}

/// Builder for BrokerConfig with validation
#[derive(Default)]
pub struct BrokerConfigBuilder {
    name: Option<String>,
    notify_on_publisher_registration: Option<bool>,
}

impl BrokerConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the broker name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Notify subscribers when a matching publisher registers
    pub fn notify_on_publisher_registration(mut self, enabled: bool) -> Self {
        self.notify_on_publisher_registration = Some(enabled);
        self
    }

    /// Build the BrokerConfig, validating all parameters
    pub fn build(self) -> Result<BrokerConfig, BrokerError> {
        let defaults = BrokerConfig::default();

        let config = BrokerConfig {
            name: self.name.unwrap_or(defaults.name),
            notify_on_publisher_registration: self
                .notify_on_publisher_registration
                .unwrap_or(defaults.notify_on_publisher_registration),
        };

        config.validate()?;
        Ok(config)
    }
}
