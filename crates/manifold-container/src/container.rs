//! Interpreted resolution engine
//!
//! The container owns three pieces of state: the definition table, frozen
//! at build time; the singleton cache, populated lazily; and the in-flight
//! resolution stack used for cycle detection. Scoped overriding goes
//! through [`Container::with`], which layers a fresh table over the parent
//! and starts with an empty cache.
//!
//! ## Concurrency
//!
//! The container is `Send + Sync`. Cycle stacks are per thread, so
//! concurrent resolutions of different ids never block each other beyond a
//! short shard lock. Two threads racing on the same uncached shared id may
//! both construct; the cache keeps the first insert, so every caller still
//! observes one identical instance.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use manifold_domain::{
    Definition, Error, ResolutionStack, Result, ServiceInstance, ServiceResolver,
    TaggedDefinition, TaggedServices,
};
use tracing::debug;

use crate::autowire::ParameterResolver;
use crate::builder::ContainerBuilder;

/// Service container: definition table, singleton cache, resolution stack
pub struct Container {
    definitions: Arc<HashMap<String, Definition>>,
    singletons: DashMap<String, ServiceInstance>,
    resolving: ResolutionStack,
    delegate: Option<Arc<dyn ServiceResolver>>,
}

impl Container {
    /// Start building a container
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub(crate) fn from_parts(
        definitions: HashMap<String, Definition>,
        delegate: Option<Arc<dyn ServiceResolver>>,
    ) -> Self {
        Self {
            definitions: Arc::new(definitions),
            singletons: DashMap::new(),
            resolving: ResolutionStack::new(),
            delegate,
        }
    }

    /// Whether the id is known: cached singleton, local definition, or
    /// delegate knowledge, checked in that order
    ///
    /// The cache is checked first because a singleton may outlive its
    /// definition in reset-then-redefine sequences; the cache stays
    /// authoritative for ids it holds.
    pub fn has(&self, id: &str) -> bool {
        if self.singletons.contains_key(id) || self.definitions.contains_key(id) {
            return true;
        }
        self.delegate.as_ref().is_some_and(|d| d.has(id))
    }

    /// Resolve the id to an instance
    ///
    /// Cached singletons return directly with no resolution work. Ids with
    /// no local definition forward to the delegate when it reports
    /// knowledge; delegate-owned instances are returned verbatim and never
    /// cached locally. Everything else resolves through the definition,
    /// guarded by the cycle stack, and shared results enter the singleton
    /// cache.
    pub fn get(&self, id: &str) -> Result<ServiceInstance> {
        if let Some(cached) = self.singletons.get(id) {
            return Ok(cached.value().clone());
        }

        let Some(definition) = self.definitions.get(id) else {
            if let Some(delegate) = &self.delegate {
                if delegate.has(id) {
                    return delegate.get(id);
                }
            }
            return Err(Error::not_found(id));
        };

        let guard = self.resolving.enter(id)?;
        let result = self.resolve_definition(id, definition);
        drop(guard);

        let instance = result?;
        if definition.is_shared() {
            let cached = self
                .singletons
                .entry(id.to_string())
                .or_insert(instance)
                .value()
                .clone();
            return Ok(cached);
        }
        Ok(instance)
    }

    /// Produce an independent scoped container
    ///
    /// The child layers `overrides` over this container's table (override
    /// wins on id collision) and starts with an empty singleton cache, so
    /// overridden and untouched services alike resolve fresh in the scope.
    /// The delegate reference is shared with the parent.
    pub fn with(&self, overrides: HashMap<String, Definition>) -> Container {
        let mut definitions = (*self.definitions).clone();
        definitions.extend(overrides);
        Container {
            definitions: Arc::new(definitions),
            singletons: DashMap::new(),
            resolving: ResolutionStack::new(),
            delegate: self.delegate.clone(),
        }
    }

    /// Clear the singleton cache
    ///
    /// Definitions and the delegate reference are untouched; the next `get`
    /// for a shared id reconstructs through the full resolution path and
    /// caches the new result.
    pub fn reset(&self) {
        self.singletons.clear();
    }

    /// Whether the id currently has a cached singleton
    pub fn is_cached(&self, id: &str) -> bool {
        self.singletons.contains_key(id)
    }

    /// The definition registered under the id, if any
    pub fn definition(&self, id: &str) -> Option<&Definition> {
        self.definitions.get(id)
    }

    /// All locally defined ids, sorted
    pub fn definition_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.definitions.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// The full definition table, for compilation and diagnostics
    pub fn definitions(&self) -> &HashMap<String, Definition> {
        &self.definitions
    }

    fn resolve_definition(&self, id: &str, definition: &Definition) -> Result<ServiceInstance> {
        debug!("Resolving service '{}' ({})", id, definition.kind());
        match definition {
            Definition::Value(def) => Ok(def.value.clone()),
            Definition::Factory(def) => def.callable.invoke(self),
            Definition::Autowire(def) => ParameterResolver::new().resolve(&def.class, self),
            Definition::Tagged(def) => self.resolve_tagged(def),
            Definition::Alias(def) => self.get(&def.target),
        }
    }

    fn resolve_tagged(&self, definition: &TaggedDefinition) -> Result<ServiceInstance> {
        let mut services = Vec::with_capacity(definition.entries.len());
        for entry in &definition.entries {
            services.push(self.get(&entry.service_id)?);
        }
        Ok(Arc::new(TaggedServices::new(
            definition.tag.clone(),
            definition.entries.clone(),
            services,
        )))
    }
}

impl ServiceResolver for Container {
    fn has(&self, id: &str) -> bool {
        Container::has(self, id)
    }

    fn get(&self, id: &str) -> Result<ServiceInstance> {
        Container::get(self, id)
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("definitions", &self.definitions.len())
            .field("cached", &self.singletons.len())
            .field("has_delegate", &self.delegate.is_some())
            .finish()
    }
}
