//! # Manifold
//!
//! A service-resolution engine: a registry mapping string ids to
//! constructible services, with on-demand dependency-graph resolution,
//! cycle detection, priority-ordered tagged collections, and an
//! ahead-of-time compiled dispatch form.
//!
//! ## Features
//!
//! - **Typed definitions**: a closed variant set (value, factory,
//!   autowire, tagged collection, alias) instead of open dynamic recipes
//! - **Shape-based autowiring**: constructor dependencies declared as
//!   data, resolved through a fixed priority ladder, cached process-wide
//! - **Deterministic tag aggregation**: priority-descending collections
//!   with stable insertion-order ties
//! - **Scoped overriding**: request- or test-scoped child containers with
//!   independent singleton caches
//! - **Compiled containers**: a static dispatch artifact with batch
//!   rejection reporting and content-fingerprint invalidation
//!
//! ## Example
//!
//! ```
//! use manifold::prelude::*;
//! use std::sync::Arc;
//!
//! struct Connection {
//!     dsn: String,
//! }
//!
//! let container = Container::builder()
//!     .with_value("db", Connection { dsn: "postgres://localhost".into() })
//!     .with_factory("greeting", |resolver| {
//!         let db = resolver.get_as::<Connection>("db")?;
//!         Ok(Arc::new(format!("connected to {}", db.dsn)))
//!     })
//!     .build();
//!
//! let greeting = container.get_as::<String>("greeting").unwrap();
//! assert_eq!(*greeting, "connected to postgres://localhost");
//! ```
//!
//! ## Architecture
//!
//! The workspace follows a layered layout:
//!
//! - `domain` - definition model, constructor shapes, parameter bag,
//!   resolution ports and errors
//! - `container` - the interpreted runtime engine, builder, autowirer,
//!   tag registry, and registration modules
//! - `compile` - the ahead-of-time compiler and its dispatch artifact

/// Domain layer - definition model, shapes, ports, and errors
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use manifold_domain::*;
}

/// Runtime layer - container, builder, autowiring, tags, and modules
///
/// Re-exports from the container crate for convenience
pub mod container {
    pub use manifold_container::*;
}

/// Compile layer - static dispatch artifact and fingerprints
///
/// Re-exports from the compile crate for convenience
pub mod compile {
    pub use manifold_compile::*;
}

/// The high-traffic names in one import
pub mod prelude {
    pub use manifold_compile::{CompiledContainer, Compiler};
    pub use manifold_container::{Container, ContainerBuilder, ServiceModule, TagRegistry};
    pub use manifold_domain::{
        Definition, Error, ParamBag, ParamShape, Result, ServiceInstance, ServiceResolver,
        ServiceResolverExt, ServiceShape,
    };
}
