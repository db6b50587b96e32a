//! Service definition model
//!
//! A [`Definition`] describes how to produce one named service instance.
//! The variant set is closed: containers and the compiler match on it
//! exhaustively instead of dispatching on strings, the same discipline the
//! rest of the engine applies to provider-style lookups.
//!
//! Ids are plain strings. Within one definition table an id is unique and
//! re-registration overwrites silently; last write wins. That rule is part
//! of the contract, not an accident of map semantics, and the builder
//! documents it on every registration method.

use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::ports::{ServiceInstance, ServiceResolver};

/// How to produce one named service instance
#[derive(Clone)]
pub enum Definition {
    /// A fixed, pre-built payload; always shared
    Value(ValueDefinition),
    /// A stored callable invoked with the active resolver
    Factory(FactoryDefinition),
    /// Reflective-style construction driven by a declared shape
    Autowire(AutowireDefinition),
    /// An ordered, priority-sorted collection of tagged services
    Tagged(TaggedDefinition),
    /// A transparent forward to another id
    Alias(AliasDefinition),
}

impl Definition {
    /// Which variant this definition is, for diagnostics and compile reports
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Self::Value(_) => DefinitionKind::Value,
            Self::Factory(_) => DefinitionKind::Factory,
            Self::Autowire(_) => DefinitionKind::Autowire,
            Self::Tagged(_) => DefinitionKind::Tagged,
            Self::Alias(_) => DefinitionKind::Alias,
        }
    }

    /// Whether the resolved instance is cached for the container lifetime
    ///
    /// Values and tagged collections are always shared. Aliases report
    /// false: they never cache under their own id, the target's cache entry
    /// is the single authority for instance identity.
    pub fn is_shared(&self) -> bool {
        match self {
            Self::Value(_) | Self::Tagged(_) => true,
            Self::Factory(def) => def.shared,
            Self::Autowire(def) => def.shared,
            Self::Alias(_) => false,
        }
    }
}

impl std::fmt::Debug for Definition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(_) => f.write_str("Definition::Value"),
            Self::Factory(def) => f
                .debug_struct("Definition::Factory")
                .field("callable", &def.callable)
                .field("shared", &def.shared)
                .finish(),
            Self::Autowire(def) => f
                .debug_struct("Definition::Autowire")
                .field("class", &def.class)
                .field("shared", &def.shared)
                .finish(),
            Self::Tagged(def) => f
                .debug_struct("Definition::Tagged")
                .field("tag", &def.tag)
                .field("entries", &def.entries)
                .finish(),
            Self::Alias(def) => f
                .debug_struct("Definition::Alias")
                .field("target", &def.target)
                .finish(),
        }
    }
}

/// Definition variant discriminant
///
/// Serializable so compile rejection reports can be emitted as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    /// Fixed payload
    Value,
    /// Stored callable
    Factory,
    /// Shape-driven construction
    Autowire,
    /// Ordered tagged collection
    Tagged,
    /// Forward to another id
    Alias,
}

impl std::fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value => write!(f, "value"),
            Self::Factory => write!(f, "factory"),
            Self::Autowire => write!(f, "autowire"),
            Self::Tagged => write!(f, "tagged"),
            Self::Alias => write!(f, "alias"),
        }
    }
}

/// Fixed-payload definition
#[derive(Clone)]
pub struct ValueDefinition {
    /// The pre-built instance returned on every resolution
    pub value: ServiceInstance,
}

impl ValueDefinition {
    /// Wrap an owned value as a shared instance
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            value: Arc::new(value),
        }
    }

    /// Wrap an already reference-counted instance
    pub fn from_instance(value: ServiceInstance) -> Self {
        Self { value }
    }
}

/// Signature of a statically-named factory function
pub type NamedFactoryFn = fn(&dyn ServiceResolver) -> Result<ServiceInstance>;

/// The callable stored by a factory definition
///
/// Two sub-variants, mirroring the interpreted/compiled container split: a
/// runtime closure works everywhere except ahead-of-time compilation, while
/// a statically-named function reference survives compilation. The compiler
/// matches on this enum and rejects the closure sub-case; it does not
/// special-case any language feature.
#[derive(Clone)]
pub enum FactoryCallable {
    /// An arbitrary runtime closure; rejected by the compiler
    Closure(Arc<dyn Fn(&dyn ServiceResolver) -> Result<ServiceInstance> + Send + Sync>),
    /// A named function reference the compiler can carry into the artifact
    Named {
        /// Stable name used in diagnostics and fingerprints
        name: &'static str,
        /// The factory function
        func: NamedFactoryFn,
    },
}

impl FactoryCallable {
    /// Wrap a runtime closure
    pub fn closure<F>(f: F) -> Self
    where
        F: Fn(&dyn ServiceResolver) -> Result<ServiceInstance> + Send + Sync + 'static,
    {
        Self::Closure(Arc::new(f))
    }

    /// Wrap a named function reference
    pub fn named(name: &'static str, func: NamedFactoryFn) -> Self {
        Self::Named { name, func }
    }

    /// Invoke the callable against the active resolver
    pub fn invoke(&self, resolver: &dyn ServiceResolver) -> Result<ServiceInstance> {
        match self {
            Self::Closure(f) => f(resolver),
            Self::Named { func, .. } => func(resolver),
        }
    }
}

impl std::fmt::Debug for FactoryCallable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closure(_) => f.write_str("FactoryCallable::Closure"),
            Self::Named { name, .. } => write!(f, "FactoryCallable::Named({name})"),
        }
    }
}

/// Factory definition: a stored callable plus sharing mode
#[derive(Clone, Debug)]
pub struct FactoryDefinition {
    /// The callable invoked with the container as its sole argument
    pub callable: FactoryCallable,
    /// Whether the first result is cached (defaults to true)
    pub shared: bool,
}

impl FactoryDefinition {
    /// Create a shared factory definition
    pub fn new(callable: FactoryCallable) -> Self {
        Self {
            callable,
            shared: true,
        }
    }

    /// Switch the sharing mode
    pub fn with_shared(mut self, shared: bool) -> Self {
        self.shared = shared;
        self
    }
}

/// Autowire definition: construct by declared shape
#[derive(Clone, Debug)]
pub struct AutowireDefinition {
    /// Target class name, the addressing key into the shape registry
    pub class: String,
    /// Whether the constructed instance is cached (defaults to true)
    ///
    /// Prototype autowires re-run full parameter resolution on every call;
    /// resolved arguments are never reused from a prior call.
    pub shared: bool,
}

impl AutowireDefinition {
    /// Create a shared autowire definition for the given class
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            shared: true,
        }
    }

    /// Switch the sharing mode
    pub fn with_shared(mut self, shared: bool) -> Self {
        self.shared = shared;
        self
    }
}

/// One member of a tagged collection
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TagEntry {
    /// The member service id, resolved through the owning container
    pub service_id: String,
    /// Collection ordering priority; higher resolves earlier
    pub priority: i32,
}

/// Tagged-collection definition
///
/// Entries are stored in final resolution order: priority descending, ties
/// broken by original registration order. The registry finalization step
/// guarantees that ordering; this type just preserves it.
#[derive(Clone, Debug)]
pub struct TaggedDefinition {
    /// The tag name, which doubles as the collection's service id
    pub tag: String,
    /// Ordered members
    pub entries: Vec<TagEntry>,
}

impl TaggedDefinition {
    /// Create a tagged definition from pre-ordered entries
    pub fn new(tag: impl Into<String>, entries: Vec<TagEntry>) -> Self {
        Self {
            tag: tag.into(),
            entries,
        }
    }
}

/// Alias definition: transparent forward to another id
///
/// Resolving an alias participates in the cycle-detection stack under the
/// alias's own id, so an alias chain that loops back to itself is detected
/// like any other cycle.
#[derive(Clone, Debug)]
pub struct AliasDefinition {
    /// The id this alias forwards to
    pub target: String,
}

impl AliasDefinition {
    /// Create an alias to the given target id
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

/// The resolved form of a tagged collection
///
/// Holds the member instances in final order together with the entry
/// metadata they were resolved from. The collection is frozen on first
/// access: members registered into a scope after that point are not picked
/// up until the owning cache entry is dropped (see the container docs).
pub struct TaggedServices {
    tag: String,
    entries: Vec<TagEntry>,
    services: Vec<ServiceInstance>,
}

impl TaggedServices {
    /// Assemble a resolved collection; `services` aligns with `entries`
    pub fn new(tag: impl Into<String>, entries: Vec<TagEntry>, services: Vec<ServiceInstance>) -> Self {
        Self {
            tag: tag.into(),
            entries,
            services,
        }
    }

    /// The tag this collection was aggregated from
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Entry metadata in resolution order
    pub fn entries(&self) -> &[TagEntry] {
        &self.entries
    }

    /// Number of member services
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the collection has no members
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Member instance at the given position
    pub fn get(&self, index: usize) -> Option<&ServiceInstance> {
        self.services.get(index)
    }

    /// Iterate member instances in priority order
    pub fn iter(&self) -> impl Iterator<Item = &ServiceInstance> {
        self.services.iter()
    }
}

impl std::fmt::Debug for TaggedServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaggedServices")
            .field("tag", &self.tag)
            .field("entries", &self.entries)
            .finish()
    }
}
