//! # Configuration, Metrics, and Telemetry
//!
//! Hosts embed `BrokerConfig` in their own config files and read counters
//! through `TopicBroker::metrics()`.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use broker_telemetry::{init_test_logging, TelemetryConfig};
    use topic_broker::{
        BrokerConfig, BrokerConfigBuilder, BrokerError, MetricsSnapshot, TopicBroker,
        TopicMatcher, DEFAULT_BROKER_NAME,
    };

    #[test]
    fn test_broker_from_json_config() {
        let config: BrokerConfig = serde_json::from_str(
            r#"{ "name": "signalling", "notify_on_publisher_registration": true }"#,
        )
        .unwrap();

        let broker = TopicBroker::with_config(config).unwrap();

        assert_eq!(broker.config().name, "signalling");
        assert!(broker.config().notify_on_publisher_registration);
    }

    #[test]
    fn test_config_embedded_in_host_document() {
        let document = serde_json::json!({
            "engine": { "tick_ms": 50 },
            "broker": { "name": "engine-broker" }
        });

        let config: BrokerConfig = serde_json::from_value(document["broker"].clone()).unwrap();

        assert_eq!(config.name, "engine-broker");
        assert!(!config.notify_on_publisher_registration);
    }

    #[test]
    fn test_config_serialization_round_trip_keeps_fields() {
        let config = BrokerConfigBuilder::new()
            .name("roundtrip")
            .notify_on_publisher_registration(true)
            .build()
            .unwrap();

        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["name"], "roundtrip");
        assert_eq!(json["notify_on_publisher_registration"], true);
    }

    #[test]
    fn test_invalid_config_rejected_by_broker() {
        let config: BrokerConfig = serde_json::from_str(r#"{ "name": "" }"#).unwrap();

        let result = TopicBroker::with_config(config);

        assert!(matches!(result, Err(BrokerError::InvalidConfig(_))));
    }

    #[test]
    fn test_default_broker_uses_default_config() {
        let broker = TopicBroker::default();

        assert_eq!(broker.config().name, DEFAULT_BROKER_NAME);
        assert_eq!(broker.config(), &BrokerConfig::default());
    }

    #[test]
    fn test_broker_instances_have_distinct_ids() {
        assert_ne!(TopicBroker::new().id(), TopicBroker::new().id());
    }

    #[test]
    fn test_metrics_track_full_lifecycle() {
        init_test_logging();
        let broker = TopicBroker::new();
        let publisher = register_publisher(&broker, &topic_1());
        let subscriber = register_subscriber(&broker, TopicMatcher::for_topic(topic_1()));

        publisher.publisher().publish(1).unwrap();
        publisher.publisher().publish(2).unwrap();
        publisher.unregister().unwrap();
        publisher.unregister().unwrap();
        subscriber.unregister();

        assert_eq!(
            broker.metrics(),
            MetricsSnapshot {
                publishers_registered: 1,
                subscribers_registered: 1,
                values_published: 2,
                // registration + two publishes + unregistration
                notifications_delivered: 4,
                cycles_detected: 0,
                type_mismatches: 0,
                stale_identity_accesses: 1,
            }
        );
        assert_eq!(broker.publisher_count(), 0);
        assert_eq!(broker.subscriber_count(), 0);
    }

    #[test]
    fn test_telemetry_config_from_lookup() {
        let config = TelemetryConfig::from_lookup(|key| match key {
            "BROKER_SERVICE_NAME" => Some("psychic-train".to_string()),
            "BROKER_LOG_LEVEL" => Some("topic_broker=debug".to_string()),
            _ => None,
        });

        assert_eq!(config.service_name, "psychic-train");
        assert_eq!(config.log_level, "topic_broker=debug");
        assert!(config.console_output);
    }
}
