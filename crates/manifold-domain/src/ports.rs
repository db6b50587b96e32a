//! Resolution ports
//!
//! The [`ServiceResolver`] trait is the narrow contract every container
//! flavor implements: the interpreted runtime container, the compiled
//! artifact, and any delegate container supplied by an embedder. Factory
//! callables and the autowirer only ever see this trait, never a concrete
//! container type.

use std::any::Any;
use std::sync::Arc;

use crate::error::{Error, Result};

/// A resolved service instance
///
/// Services are reference-counted erased values. Typed access goes through
/// [`ServiceResolverExt::get_as`].
pub type ServiceInstance = Arc<dyn Any + Send + Sync>;

/// Lookup and resolution contract shared by all container flavors
///
/// A delegate container is any `Arc<dyn ServiceResolver>`; it is referenced,
/// never owned, and the local container never caches instances it returns.
pub trait ServiceResolver: Send + Sync {
    /// Whether the resolver knows the id (cached, defined, or via delegate)
    fn has(&self, id: &str) -> bool;

    /// Resolve the id to an instance
    ///
    /// Fails with [`Error::NotFound`] when no entry exists anywhere in the
    /// chain, [`Error::CircularDependency`] when the dependency graph
    /// re-enters an id already on the active resolution stack, or
    /// [`Error::UnresolvableParameter`] when autowiring cannot produce a
    /// constructor argument.
    fn get(&self, id: &str) -> Result<ServiceInstance>;
}

/// Typed convenience accessors for any [`ServiceResolver`]
pub trait ServiceResolverExt: ServiceResolver {
    /// Resolve an id and downcast the instance to `T`
    ///
    /// Fails with [`Error::TypeMismatch`] when the stored instance is not a
    /// `T`.
    fn get_as<T: Any + Send + Sync>(&self, id: &str) -> Result<Arc<T>> {
        self.get(id)?
            .downcast::<T>()
            .map_err(|_| Error::type_mismatch(id, std::any::type_name::<T>()))
    }
}

impl<R: ServiceResolver + ?Sized> ServiceResolverExt for R {}
