//! Container builder
//!
//! Accumulates definitions, tagged registrations, the parameter bag, and an
//! optional delegate, then freezes everything into a [`Container`]. Every
//! registration method overwrites silently on id collision; last write
//! wins, which is the contract of the definition table rather than an
//! accident of map semantics.

use std::collections::HashMap;
use std::sync::Arc;

use manifold_domain::{
    AliasDefinition, AutowireDefinition, Definition, FactoryCallable, FactoryDefinition,
    NamedFactoryFn, ParamBag, Result, ServiceInstance, ServiceResolver, ValueDefinition,
    PARAM_BAG_ID,
};
use tracing::{debug, info};

use crate::container::Container;
use crate::module::ServiceModule;
use crate::tags::TagRegistry;

/// Staged state for a container under construction
#[derive(Default)]
pub struct ContainerBuilder {
    definitions: HashMap<String, Definition>,
    tags: TagRegistry,
    parameters: Option<ParamBag>,
    delegate: Option<Arc<dyn ServiceResolver>>,
}

impl ContainerBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition under an id (last write wins)
    pub fn register(mut self, id: impl Into<String>, definition: Definition) -> Self {
        self.definitions.insert(id.into(), definition);
        self
    }

    /// Register a fixed value, wrapped as a shared instance
    pub fn with_value<T: Send + Sync + 'static>(self, id: impl Into<String>, value: T) -> Self {
        self.register(id, Definition::Value(ValueDefinition::new(value)))
    }

    /// Register an already reference-counted instance
    pub fn with_instance(self, id: impl Into<String>, instance: ServiceInstance) -> Self {
        self.register(id, Definition::Value(ValueDefinition::from_instance(instance)))
    }

    /// Register a shared factory closure
    pub fn with_factory<F>(self, id: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&dyn ServiceResolver) -> Result<ServiceInstance> + Send + Sync + 'static,
    {
        self.register(
            id,
            Definition::Factory(FactoryDefinition::new(FactoryCallable::closure(factory))),
        )
    }

    /// Register a prototype factory closure, re-invoked on every `get`
    pub fn with_prototype_factory<F>(self, id: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&dyn ServiceResolver) -> Result<ServiceInstance> + Send + Sync + 'static,
    {
        self.register(
            id,
            Definition::Factory(
                FactoryDefinition::new(FactoryCallable::closure(factory)).with_shared(false),
            ),
        )
    }

    /// Register a shared factory by named function reference
    ///
    /// Named factories survive ahead-of-time compilation; closures do not.
    pub fn with_named_factory(
        self,
        id: impl Into<String>,
        name: &'static str,
        func: NamedFactoryFn,
    ) -> Self {
        self.register(
            id,
            Definition::Factory(FactoryDefinition::new(FactoryCallable::named(name, func))),
        )
    }

    /// Register a shared autowired service for a declared class
    pub fn with_autowired(self, id: impl Into<String>, class: impl Into<String>) -> Self {
        self.register(id, Definition::Autowire(AutowireDefinition::new(class)))
    }

    /// Register a prototype autowired service
    ///
    /// Parameter resolution re-runs in full on every `get`.
    pub fn with_prototype_autowired(
        self,
        id: impl Into<String>,
        class: impl Into<String>,
    ) -> Self {
        self.register(
            id,
            Definition::Autowire(AutowireDefinition::new(class).with_shared(false)),
        )
    }

    /// Register an alias forwarding to another id
    pub fn with_alias(self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.register(alias, Definition::Alias(AliasDefinition::new(target)))
    }

    /// Append a tagged service registration
    ///
    /// Folded into one collection definition per tag at build time, named
    /// by the tag. A tag name colliding with an explicit definition follows
    /// the same last-write-wins rule: the folded collection, inserted at
    /// build time, wins.
    pub fn tag(
        mut self,
        tag: impl Into<String>,
        service_id: impl Into<String>,
        priority: i32,
    ) -> Self {
        self.tags.append(tag, service_id, priority);
        self
    }

    /// Attach the parameter bag, registered under [`PARAM_BAG_ID`]
    pub fn with_parameters(mut self, parameters: ParamBag) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Attach a delegate container consulted for ids with no local
    /// definition
    pub fn with_delegate(mut self, delegate: Arc<dyn ServiceResolver>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    /// Merge one registration unit: its definitions, then its tags
    pub fn with_module(mut self, module: &dyn ServiceModule) -> Self {
        let services = module.services();
        debug!(
            "Registering module '{}' with {} service(s)",
            module.name(),
            services.len()
        );
        self.definitions.extend(services);
        module.tags(&mut self.tags);
        self
    }

    /// Merge every module auto-registered through the distributed slice
    pub fn with_registered_modules(mut self) -> Self {
        for module in crate::module::registered_modules() {
            self = self.with_module(module.as_ref());
        }
        self
    }

    /// Freeze the staged state into a container
    ///
    /// Inserts the parameter-bag definition, folds the tag registry into
    /// collection definitions, and hands the table to the container. The
    /// table is immutable from here on; scoped overrides go through
    /// [`Container::with`].
    pub fn build(self) -> Container {
        let mut definitions = self.definitions;

        if let Some(parameters) = self.parameters {
            definitions.insert(
                PARAM_BAG_ID.to_string(),
                Definition::Value(ValueDefinition::from_instance(Arc::new(parameters))),
            );
        }

        for tagged in self.tags.finalize() {
            definitions.insert(tagged.tag.clone(), Definition::Tagged(tagged));
        }

        info!("Built container with {} definition(s)", definitions.len());
        Container::from_parts(definitions, self.delegate)
    }
}

impl std::fmt::Debug for ContainerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("definitions", &self.definitions.len())
            .field("tags", &self.tags.len())
            .field("has_parameters", &self.parameters.is_some())
            .field("has_delegate", &self.delegate.is_some())
            .finish()
    }
}
