//! Unit tests for the definition model

use std::sync::Arc;

use manifold_domain::{
    AliasDefinition, AutowireDefinition, Definition, DefinitionKind, FactoryCallable,
    FactoryDefinition, TagEntry, TaggedDefinition, ValueDefinition,
};

#[test]
fn test_value_definitions_are_always_shared() {
    let def = Definition::Value(ValueDefinition::new(42u32));
    assert!(def.is_shared());
    assert_eq!(def.kind(), DefinitionKind::Value);
}

#[test]
fn test_factory_shared_by_default() {
    let def = Definition::Factory(FactoryDefinition::new(FactoryCallable::closure(|_| {
        Ok(Arc::new(1u8))
    })));
    assert!(def.is_shared());
}

#[test]
fn test_factory_prototype_flag() {
    let def = Definition::Factory(
        FactoryDefinition::new(FactoryCallable::closure(|_| Ok(Arc::new(1u8))))
            .with_shared(false),
    );
    assert!(!def.is_shared());
    assert_eq!(def.kind(), DefinitionKind::Factory);
}

#[test]
fn test_autowire_prototype_flag() {
    let shared = Definition::Autowire(AutowireDefinition::new("Service"));
    let prototype = Definition::Autowire(AutowireDefinition::new("Service").with_shared(false));
    assert!(shared.is_shared());
    assert!(!prototype.is_shared());
}

#[test]
fn test_tagged_always_shared() {
    let def = Definition::Tagged(TaggedDefinition::new(
        "handlers",
        vec![TagEntry {
            service_id: "a".to_string(),
            priority: 1,
        }],
    ));
    assert!(def.is_shared());
    assert_eq!(def.kind(), DefinitionKind::Tagged);
}

#[test]
fn test_alias_never_caches_under_own_id() {
    let def = Definition::Alias(AliasDefinition::new("target"));
    assert!(!def.is_shared());
    assert_eq!(def.kind(), DefinitionKind::Alias);
}

#[test]
fn test_kind_display() {
    assert_eq!(DefinitionKind::Autowire.to_string(), "autowire");
    assert_eq!(DefinitionKind::Tagged.to_string(), "tagged");
}

#[test]
fn test_named_factory_invokes_function() {
    fn make_token(_resolver: &dyn manifold_domain::ServiceResolver) -> manifold_domain::Result<manifold_domain::ServiceInstance> {
        Ok(Arc::new("token".to_string()))
    }

    struct NoServices;
    impl manifold_domain::ServiceResolver for NoServices {
        fn has(&self, _id: &str) -> bool {
            false
        }
        fn get(&self, id: &str) -> manifold_domain::Result<manifold_domain::ServiceInstance> {
            Err(manifold_domain::Error::not_found(id))
        }
    }

    let callable = FactoryCallable::named("make_token", make_token);
    let instance = callable.invoke(&NoServices).expect("factory runs");
    let token = instance.downcast::<String>().expect("string payload");
    assert_eq!(*token, "token");
}
