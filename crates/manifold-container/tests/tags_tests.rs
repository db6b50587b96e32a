//! Integration tests for tag aggregation and collection resolution

use std::sync::Arc;

use manifold_container::Container;
use manifold_domain::{ServiceResolverExt, TaggedServices};

#[test]
fn test_priority_descending_with_insertion_order_ties() {
    let container = Container::builder()
        .with_value("a", "a".to_string())
        .with_value("b", "b".to_string())
        .with_value("c", "c".to_string())
        .tag("handlers", "a", 10)
        .tag("handlers", "b", 10)
        .tag("handlers", "c", 20)
        .build();

    let handlers = container
        .get_as::<TaggedServices>("handlers")
        .expect("collection resolves");

    let order: Vec<String> = handlers
        .iter()
        .map(|service| {
            service
                .clone()
                .downcast::<String>()
                .expect("string member")
                .as_ref()
                .clone()
        })
        .collect();
    assert_eq!(order, vec!["c", "a", "b"]);
}

#[test]
fn test_collection_members_share_container_singletons() {
    let container = Container::builder()
        .with_factory("writer", |_| Ok(Arc::new(Vec::<u8>::new())))
        .tag("sinks", "writer", 0)
        .build();

    let direct = container.get("writer").expect("direct get");
    let sinks = container
        .get_as::<TaggedServices>("sinks")
        .expect("collection resolves");
    assert!(Arc::ptr_eq(&direct, sinks.get(0).expect("one member")));
}

#[test]
fn test_collection_is_frozen_after_first_access() {
    let container = Container::builder()
        .with_value("w1", 1u8)
        .tag("sinks", "w1", 0)
        .build();

    let first = container.get("sinks").expect("first access");
    let second = container.get("sinks").expect("second access");
    // Shared collection: resolved once, identical sequence afterwards.
    assert!(Arc::ptr_eq(&first, &second));

    // reset() drops the frozen collection like any other singleton; the
    // next access re-resolves a fresh sequence.
    container.reset();
    let after_reset = container.get("sinks").expect("access after reset");
    assert!(!Arc::ptr_eq(&first, &after_reset));
}

#[test]
fn test_collection_entry_metadata_is_preserved() {
    let container = Container::builder()
        .with_value("high", 0u8)
        .with_value("low", 0u8)
        .tag("jobs", "low", 1)
        .tag("jobs", "high", 5)
        .build();

    let jobs = container
        .get_as::<TaggedServices>("jobs")
        .expect("collection resolves");
    assert_eq!(jobs.tag(), "jobs");
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs.entries()[0].service_id, "high");
    assert_eq!(jobs.entries()[0].priority, 5);
    assert_eq!(jobs.entries()[1].service_id, "low");
}

#[test]
fn test_collection_fails_when_member_is_unknown() {
    let container = Container::builder().tag("handlers", "ghost", 0).build();
    assert!(container.get("handlers").is_err());
}

#[test]
fn test_distinct_tags_become_distinct_collections() {
    let container = Container::builder()
        .with_value("r", 0u8)
        .with_value("w", 0u8)
        .tag("readers", "r", 0)
        .tag("writers", "w", 0)
        .build();

    let readers = container
        .get_as::<TaggedServices>("readers")
        .expect("readers");
    let writers = container
        .get_as::<TaggedServices>("writers")
        .expect("writers");
    assert_eq!(readers.len(), 1);
    assert_eq!(writers.len(), 1);
}
