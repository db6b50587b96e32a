//! Manifold domain layer
//!
//! Core types of the service-resolution engine: the closed [`Definition`]
//! model, declared constructor shapes for autowiring, the [`ParamBag`]
//! configuration store, the [`ServiceResolver`] port implemented by every
//! container flavor, and the shared cycle-detection stack.
//!
//! This crate is intentionally free of runtime wiring. The interpreted
//! container lives in `manifold-container`, the ahead-of-time compiler in
//! `manifold-compile`; both speak the vocabulary defined here.

pub mod constants;
pub mod definition;
pub mod error;
pub mod params;
pub mod ports;
pub mod resolution;
pub mod shape;

pub use constants::PARAM_BAG_ID;
pub use definition::{
    AliasDefinition, AutowireDefinition, Definition, DefinitionKind, FactoryCallable,
    FactoryDefinition, NamedFactoryFn, TagEntry, TaggedDefinition, TaggedServices, ValueDefinition,
};
pub use error::{Error, RejectedDefinition, Result};
pub use params::ParamBag;
pub use ports::{ServiceInstance, ServiceResolver, ServiceResolverExt};
pub use resolution::ResolutionStack;
pub use shape::{
    Argument, ConstructFn, InjectionHint, ParamShape, ServiceShape, ShapeEntry, ShapeRegistry,
    SERVICE_SHAPES, shape_registry,
};
