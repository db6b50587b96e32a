//! Static dispatch plans
//!
//! A [`ServicePlan`] is the compiled form of one accepted definition:
//! every dynamic decision the interpreted container would make has been
//! taken ahead of time, leaving only execution. Parameter-bag lookups stay
//! runtime decisions by design, since bag overrides may change between
//! compilation and resolution; the plan pins the full fallback ladder
//! instead.

use manifold_domain::{ConstructFn, NamedFactoryFn, ServiceInstance, TagEntry};
use serde_json::Value;

/// Compiled construction logic for one service id
#[derive(Clone)]
pub enum ServicePlan {
    /// Return the stored payload
    Value(ServiceInstance),
    /// Invoke a named factory function
    Factory {
        /// Stable factory name, for diagnostics
        name: &'static str,
        /// The factory function
        func: NamedFactoryFn,
        /// Whether the result is cached
        shared: bool,
    },
    /// Run a constructor shape over pre-planned arguments
    Construct {
        /// The declaring class, for diagnostics
        class: String,
        /// One plan per constructor parameter, in declared order
        args: Vec<ArgPlan>,
        /// The shape's construct function
        construct: ConstructFn,
        /// Whether the result is cached
        shared: bool,
    },
    /// Resolve an ordered tagged collection
    Collection {
        /// The tag name
        tag: String,
        /// Members in final resolution order
        entries: Vec<TagEntry>,
    },
    /// Forward to another id
    Alias {
        /// The forwarding target
        target: String,
    },
}

impl ServicePlan {
    /// Whether execution results are cached under the plan's id
    ///
    /// Mirrors the interpreted sharing rules: values and collections are
    /// always shared, aliases never cache under their own id.
    pub fn is_shared(&self) -> bool {
        match self {
            Self::Value(_) | Self::Collection { .. } => true,
            Self::Factory { shared, .. } | Self::Construct { shared, .. } => *shared,
            Self::Alias { .. } => false,
        }
    }
}

impl std::fmt::Debug for ServicePlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(_) => f.write_str("ServicePlan::Value"),
            Self::Factory { name, shared, .. } => f
                .debug_struct("ServicePlan::Factory")
                .field("name", name)
                .field("shared", shared)
                .finish(),
            Self::Construct {
                class, args, shared, ..
            } => f
                .debug_struct("ServicePlan::Construct")
                .field("class", class)
                .field("args", args)
                .field("shared", shared)
                .finish(),
            Self::Collection { tag, entries } => f
                .debug_struct("ServicePlan::Collection")
                .field("tag", tag)
                .field("entries", entries)
                .finish(),
            Self::Alias { target } => f
                .debug_struct("ServicePlan::Alias")
                .field("target", target)
                .finish(),
        }
    }
}

/// Compiled resolution plan for one constructor parameter
#[derive(Clone, Debug)]
pub enum ArgPlan {
    /// Resolve a service id at execution time
    Service(String),
    /// Evaluate the parameter-bag ladder at execution time
    Param {
        /// Parameter name, for diagnostics
        name: String,
        /// Dot-separated bag key
        key: String,
        /// Hint-level fallback
        hint_default: Option<Value>,
        /// Whether an unanswered lookup fails instead of falling through
        required: bool,
        /// Declared default, consulted after the hint ladder
        declared_default: Option<Value>,
        /// Declared nullability, the final fallback
        nullable: bool,
    },
    /// Use a constant decided at compile time
    Const(Value),
    /// Pass the null argument
    Null,
}
