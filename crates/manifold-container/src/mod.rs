//! Manifold runtime layer
//!
//! The interpreted resolution engine: [`Container`] owns a definition
//! table, a lazily populated singleton cache, and the in-flight resolution
//! stack; [`ContainerBuilder`] assembles the table from direct
//! registrations and [`ServiceModule`] registration units; the
//! [`ParameterResolver`] drives shape-based autowiring; [`TagRegistry`]
//! aggregates tagged services into ordered collections.
//!
//! ## Resolution flow
//!
//! ```text
//! ServiceModule::services() + tags()      ContainerBuilder
//! ──────────────────────────────────      ────────────────
//! definitions, (tag, id, priority)   →    build()
//!                                              ↓
//!                                    TagRegistry::finalize()
//!                                              ↓
//!                                    Container { definitions }
//!                                              ↓
//!                        get(id) → cycle guard → definition → instance
//! ```

pub mod autowire;
pub mod builder;
pub mod container;
pub mod logging;
pub mod module;
pub mod tags;

pub use autowire::ParameterResolver;
pub use builder::ContainerBuilder;
pub use container::Container;
pub use logging::{init_logging, parse_log_level, LoggingConfig};
pub use module::{
    list_modules, registered_modules, ModuleEntry, ServiceModule, SERVICE_MODULES,
};
pub use tags::TagRegistry;
