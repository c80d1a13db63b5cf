//! # Topic Broker Benchmarks
//!
//! | Operation | Scaling parameter |
//! |-----------|-------------------|
//! | publish + notify | matching subscribers |
//! | subscriber registration | existing publishers |
//! | values_for_matching_topics | publishers per topic |
//! | pattern matching | topic name length |

use broker_tests::fixtures::{
    register_publisher, register_subscriber, topic_1, RecordingSubscriber,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;
use topic_broker::{
    AnyTopic, Broker, BrokerError, Subscriber, SubscriberContext, Topic, TopicBroker,
    TopicMatcher, TopicSet, TypeWitness,
};

/// Subscriber that does nothing, so the benchmark measures broker overhead.
struct Idle;

impl Subscriber for Idle {
    fn topics_changed(&self, _topics: &TopicSet) -> Result<(), BrokerError> {
        Ok(())
    }
}

fn register_idle(broker: &TopicBroker, matcher: TopicMatcher) {
    broker
        .register_subscriber(matcher, |_ctx: SubscriberContext| Ok(Idle))
        .expect("subscriber registration");
}

// ============================================================================
// Publish
// ============================================================================

fn bench_publish_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish");
    group.measurement_time(Duration::from_secs(5));

    for subscribers in [0usize, 1, 10, 100] {
        let broker = TopicBroker::new();
        let publisher = register_publisher(&broker, &topic_1());
        for _ in 0..subscribers {
            register_idle(&broker, TopicMatcher::for_topic(topic_1()));
        }
        // Subscribers on unrelated topics still have to be filtered out.
        for i in 0..100 {
            let other = Topic::<i32>::of(format!("other.{i}"));
            register_idle(&broker, TopicMatcher::for_topic(other));
        }

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("fan_out", subscribers),
            &publisher,
            |b, publisher| {
                let mut value = 0;
                b.iter(|| {
                    value += 1;
                    publisher.publisher().publish(black_box(value)).expect("publish")
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// Registration
// ============================================================================

fn bench_subscriber_registration(c: &mut Criterion) {
    let mut group = c.benchmark_group("register_subscriber");

    for publishers in [10usize, 100, 1000] {
        let broker = TopicBroker::new();
        let tokens: Vec<_> = (0..publishers)
            .map(|i| register_publisher(&broker, &Topic::<i32>::of(format!("topic.{i}"))))
            .collect();
        let matcher = TopicMatcher::for_topics_matching_pattern::<i32>(r"topic\.1\d*")
            .expect("valid pattern");

        group.bench_with_input(
            BenchmarkId::new("register_unregister", publishers),
            &matcher,
            |b, matcher| {
                b.iter(|| {
                    let token = register_subscriber(&broker, matcher.clone());
                    token.unregister();
                })
            },
        );
        drop(tokens);
    }

    group.finish();
}

// ============================================================================
// Queries
// ============================================================================

fn bench_values_for_matching_topics(c: &mut Criterion) {
    let mut group = c.benchmark_group("values_for_matching_topics");

    for per_topic in [1usize, 10, 100] {
        let broker = TopicBroker::new();
        for topic in 0..10 {
            let topic = Topic::<i32>::of(format!("sensor.{topic}"));
            for value in 0..per_topic {
                register_publisher(&broker, &topic)
                    .publisher()
                    .publish(value as i32)
                    .expect("publish");
            }
        }
        let subscriber = broker
            .register_subscriber(
                TopicMatcher::for_topics_matching_pattern::<i32>(r"sensor\.\d")
                    .expect("valid pattern"),
                RecordingSubscriber::factory(),
            )
            .expect("subscriber registration");

        group.throughput(Throughput::Elements((per_topic * 10) as u64));
        group.bench_with_input(
            BenchmarkId::new("per_topic", per_topic),
            &subscriber,
            |b, subscriber| {
                let context = subscriber.subscriber().context();
                b.iter(|| black_box(context.values_for_matching_topics()))
            },
        );
    }

    group.finish();
}

// ============================================================================
// Matchers
// ============================================================================

fn bench_matcher(c: &mut Criterion) {
    let mut group = c.benchmark_group("matcher");

    let set = TopicMatcher::for_topics((0..50).map(|i| Topic::<i32>::of(format!("t.{i}"))))
        .expect("non-empty");
    let pattern =
        TopicMatcher::for_topics_matching_pattern::<i32>(r"t\.[0-9]+").expect("valid pattern");

    for len in [4usize, 64, 512] {
        let topic = AnyTopic::new(format!("t.{}", "9".repeat(len)), TypeWitness::of::<i32>());
        group.bench_with_input(BenchmarkId::new("set", len), &topic, |b, topic| {
            b.iter(|| black_box(set.matches(topic)))
        });
        group.bench_with_input(BenchmarkId::new("pattern", len), &topic, |b, topic| {
            b.iter(|| black_box(pattern.matches(topic)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_publish_fan_out,
    bench_subscriber_registration,
    bench_values_for_matching_topics,
    bench_matcher
);
criterion_main!(benches);
