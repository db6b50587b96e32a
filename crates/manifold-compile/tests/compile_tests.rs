//! Integration tests for the compiler and its artifact

use std::sync::Arc;

use manifold_compile::Compiler;
use manifold_container::Container;
use manifold_domain::{
    shape_registry, DefinitionKind, Error, NamedFactoryFn, ParamBag, ParamShape, Result,
    ServiceInstance, ServiceResolver, ServiceResolverExt, ServiceShape, TaggedServices,
};
use serde_json::json;

fn clock_factory(_resolver: &dyn ServiceResolver) -> Result<ServiceInstance> {
    Ok(Arc::new("tick".to_string()))
}

struct Repository {
    conn: Arc<String>,
    cache_size: i64,
}

fn repository_shape(class: &'static str) -> ServiceShape {
    ServiceShape::new(class, |args| {
        let conn = args[0].service::<String>("Repository")?;
        let cache_size = args[1].as_i64().unwrap_or(0);
        Ok(Arc::new(Repository { conn, cache_size }))
    })
    .with_param(ParamShape::new("conn").inject_service("conn"))
    .with_param(ParamShape::new("cache_size").inject_param("repo.cache_size"))
}

#[test]
fn test_compiled_artifact_matches_runtime_behavior() {
    shape_registry().register(repository_shape("compile_tests.Repository"));

    let container = Container::builder()
        .with_value("conn", "postgres://localhost".to_string())
        .with_parameters(ParamBag::new(json!({ "repo": { "cache_size": 512 } })))
        .with_autowired("repo", "compile_tests.Repository")
        .with_named_factory("clock", "clock_factory", clock_factory as NamedFactoryFn)
        .with_alias("repository", "repo")
        .tag("repositories", "repo", 1)
        .build();

    let compiled = Compiler::compile(container.definitions()).expect("table compiles");

    // Same has() results over the table's ids.
    for id in ["conn", "repo", "clock", "repository", "repositories"] {
        assert!(compiled.has(id), "compiled artifact should know `{id}`");
        assert!(container.has(id));
    }
    assert!(!compiled.has("unknown"));

    // Same construction results.
    let repo = compiled
        .get_as::<Repository>("repo")
        .expect("compiled autowire");
    assert_eq!(*repo.conn, "postgres://localhost");
    assert_eq!(repo.cache_size, 512);

    let clock = compiled.get_as::<String>("clock").expect("named factory");
    assert_eq!(*clock, "tick");

    // Same singleton semantics: the alias converges on the target's entry.
    let direct = compiled.get("repo").expect("direct");
    let aliased = compiled.get("repository").expect("aliased");
    assert!(Arc::ptr_eq(&direct, &aliased));

    // Same NotFound behavior for unknown ids.
    match compiled.get("unknown").err() {
        Some(Error::NotFound { id }) => assert_eq!(id, "unknown"),
        other => panic!("expected NotFound, got {other:?}"),
    }

    // Collections keep the runtime ordering contract.
    let repositories = compiled
        .get_as::<TaggedServices>("repositories")
        .expect("collection");
    assert_eq!(repositories.len(), 1);
}

#[test]
fn test_closure_factory_rejected_once_among_supported() {
    shape_registry().register(repository_shape("compile_tests.RepositoryBatch"));

    let container = Container::builder()
        .with_value("conn", "postgres://localhost".to_string())
        .with_parameters(ParamBag::new(json!({ "repo": { "cache_size": 1 } })))
        .with_autowired("repo_a", "compile_tests.RepositoryBatch")
        .with_autowired("repo_b", "compile_tests.RepositoryBatch")
        .with_autowired("repo_c", "compile_tests.RepositoryBatch")
        .with_factory("runtime_only", |_| Ok(Arc::new(0u8)))
        .build();

    match Compiler::compile(container.definitions()) {
        Err(Error::CompileUnsupported { rejected }) => {
            assert_eq!(rejected.len(), 1);
            assert_eq!(rejected[0].id, "runtime_only");
            assert_eq!(rejected[0].kind, DefinitionKind::Factory);
        }
        other => panic!("expected CompileUnsupported, got {other:?}"),
    }
}

#[test]
fn test_rejection_cascades_through_aliases_and_collections() {
    let container = Container::builder()
        .with_factory("closure_svc", |_| Ok(Arc::new(0u8)))
        .with_alias("alias_to_closure", "closure_svc")
        .with_value("fine", 1u8)
        .tag("mixed", "fine", 2)
        .tag("mixed", "closure_svc", 1)
        .build();

    match Compiler::compile(container.definitions()) {
        Err(Error::CompileUnsupported { rejected }) => {
            let ids: Vec<&str> = rejected.iter().map(|r| r.id.as_str()).collect();
            assert_eq!(ids, vec!["alias_to_closure", "closure_svc", "mixed"]);
            let alias = &rejected[0];
            assert_eq!(alias.kind, DefinitionKind::Alias);
            assert!(alias.reason.contains("closure_svc"));
        }
        other => panic!("expected CompileUnsupported, got {other:?}"),
    }
}

#[test]
fn test_alias_cycle_rejected_at_compile_time() {
    let container = Container::builder()
        .with_alias("a", "b")
        .with_alias("b", "a")
        .build();

    match Compiler::compile(container.definitions()) {
        Err(Error::CompileUnsupported { rejected }) => {
            assert_eq!(rejected.len(), 2);
            assert!(rejected.iter().all(|r| r.reason.contains("cycle")));
        }
        other => panic!("expected CompileUnsupported, got {other:?}"),
    }
}

#[test]
fn test_unknown_autowire_shape_rejected() {
    let container = Container::builder()
        .with_autowired("ghost", "compile_tests.NeverRegistered")
        .build();

    match Compiler::compile(container.definitions()) {
        Err(Error::CompileUnsupported { rejected }) => {
            assert_eq!(rejected.len(), 1);
            assert_eq!(rejected[0].kind, DefinitionKind::Autowire);
            assert!(rejected[0].reason.contains("compile_tests.NeverRegistered"));
        }
        other => panic!("expected CompileUnsupported, got {other:?}"),
    }
}

#[test]
fn test_compiled_singleton_and_reset_semantics() {
    fn buffer_factory(_resolver: &dyn ServiceResolver) -> Result<ServiceInstance> {
        Ok(Arc::new(Vec::<u8>::new()))
    }

    let container = Container::builder()
        .with_named_factory("buffer", "buffer_factory", buffer_factory as NamedFactoryFn)
        .build();

    let compiled = Compiler::compile(container.definitions()).expect("compiles");

    let first = compiled.get("buffer").expect("first");
    let second = compiled.get("buffer").expect("second");
    assert!(Arc::ptr_eq(&first, &second));

    compiled.reset();
    let after_reset = compiled.get("buffer").expect("after reset");
    assert!(!Arc::ptr_eq(&first, &after_reset));
}

#[test]
fn test_compiled_cycle_detection_matches_runtime() {
    shape_registry().register(
        ServiceShape::new("compile_tests.SelfLoop", |args| {
            let inner = args[0].service::<()>("SelfLoop")?;
            Ok(inner)
        })
        .with_param(ParamShape::new("inner").inject_service("self_loop")),
    );

    let container = Container::builder()
        .with_autowired("self_loop", "compile_tests.SelfLoop")
        .build();

    let compiled = Compiler::compile(container.definitions()).expect("compiles");
    match compiled.get("self_loop").err() {
        Some(Error::CircularDependency { chain }) => {
            assert_eq!(chain, vec!["self_loop", "self_loop"]);
        }
        other => panic!("expected CircularDependency, got {other:?}"),
    }
}

#[test]
fn test_stale_artifact_detection() {
    let container = Container::builder().with_value("flag", true).build();
    let compiled = Compiler::compile(container.definitions()).expect("compiles");
    assert!(!compiled.is_stale(container.definitions()));

    let mut overrides = std::collections::HashMap::new();
    overrides.insert(
        "flag".to_string(),
        manifold_domain::Definition::Value(manifold_domain::ValueDefinition::new(false)),
    );
    let changed = container.with(overrides);
    assert!(compiled.is_stale(changed.definitions()));
}

#[test]
fn test_compiled_param_ladder_runs_at_resolution_time() {
    shape_registry().register(repository_shape("compile_tests.RepositoryLate"));

    let bag = ParamBag::new(json!({ "repo": { "cache_size": 16 } }));
    let container = Container::builder()
        .with_value("conn", "postgres://localhost".to_string())
        .with_parameters(bag)
        .with_autowired("repo", "compile_tests.RepositoryLate")
        .build();

    let compiled = Compiler::compile(container.definitions()).expect("compiles");

    // Post-load override lands because bag lookups stay runtime decisions.
    let bag = compiled
        .get_as::<ParamBag>(manifold_domain::PARAM_BAG_ID)
        .expect("bag compiled as value");
    bag.set("repo.cache_size", json!(99));

    let repo = compiled
        .get_as::<Repository>("repo")
        .expect("compiled autowire");
    assert_eq!(repo.cache_size, 99);
}
