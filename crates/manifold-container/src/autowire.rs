//! Shape-driven autowiring
//!
//! Given an autowire target class, the [`ParameterResolver`] looks up the
//! declared constructor shape and resolves each parameter through a fixed
//! priority ladder, stopping at the first step that applies:
//!
//! 1. service injection hint, resolved through the container
//! 2. configuration-key injection hint, looked up in the parameter bag
//! 3. declared parameter type the container knows as a service id
//! 4. declared default value
//! 5. nullability
//!
//! A parameter no step can satisfy fails with `UnresolvableParameter`,
//! naming the parameter, its position, and the declaring class. Errors
//! raised while resolving a hinted service (including cycle reports)
//! propagate untouched so the diagnostic chain survives.
//!
//! Only shape metadata is cached, in the process-wide shape registry.
//! Prototype autowires re-enter this path on every call; resolved
//! arguments are never reused.

use std::sync::Arc;

use manifold_domain::{
    Argument, Error, InjectionHint, ParamBag, Result, ServiceInstance, ServiceResolver,
    ServiceResolverExt, ShapeRegistry, shape_registry, PARAM_BAG_ID, ParamShape,
};
use tracing::debug;

/// Resolves constructor parameters against a container
pub struct ParameterResolver {
    shapes: &'static ShapeRegistry,
}

impl ParameterResolver {
    /// Create a resolver backed by the process-wide shape registry
    pub fn new() -> Self {
        Self {
            shapes: shape_registry(),
        }
    }

    /// Construct an instance of `class` by resolving its declared shape
    pub fn resolve(&self, class: &str, resolver: &dyn ServiceResolver) -> Result<ServiceInstance> {
        let shape = self
            .shapes
            .lookup(class)
            .ok_or_else(|| Error::shape_not_found(class))?;

        debug!(
            "Autowiring '{}' with {} parameter(s)",
            class,
            shape.params().len()
        );

        let mut args = Vec::with_capacity(shape.params().len());
        for (position, param) in shape.params().iter().enumerate() {
            args.push(self.resolve_param(class, param, position, resolver)?);
        }
        shape.construct(args)
    }

    fn resolve_param(
        &self,
        class: &str,
        param: &ParamShape,
        position: usize,
        resolver: &dyn ServiceResolver,
    ) -> Result<Argument> {
        if let Some(hint) = &param.hint {
            match hint {
                InjectionHint::Service(id) => {
                    return resolver.get(id).map(Argument::Service);
                }
                InjectionHint::Param {
                    key,
                    default,
                    required,
                } => {
                    let Some(bag) = self.param_bag(resolver) else {
                        return Err(Error::unresolvable_parameter(
                            class,
                            &param.name,
                            position,
                            "no parameter bag is registered",
                        ));
                    };
                    if let Some(value) = bag.get(key) {
                        return Ok(Argument::Value(value));
                    }
                    if let Some(value) = default {
                        return Ok(Argument::Value(value.clone()));
                    }
                    if *required {
                        return Err(Error::unresolvable_parameter(
                            class,
                            &param.name,
                            position,
                            format!("required configuration key `{key}` is missing"),
                        ));
                    }
                    // Optional key absent: fall through to the declared
                    // default and nullability steps.
                }
            }
        }

        if let Some(type_id) = &param.type_id {
            if resolver.has(type_id) {
                return resolver.get(type_id).map(Argument::Service);
            }
        }

        if let Some(default) = &param.default {
            return Ok(Argument::Value(default.clone()));
        }

        if param.nullable {
            return Ok(Argument::Null);
        }

        Err(Error::unresolvable_parameter(
            class,
            &param.name,
            position,
            "no injection hint, known type, default, or nullability applies",
        ))
    }

    fn param_bag(&self, resolver: &dyn ServiceResolver) -> Option<Arc<ParamBag>> {
        resolver.get_as::<ParamBag>(PARAM_BAG_ID).ok()
    }
}

impl Default for ParameterResolver {
    fn default() -> Self {
        Self::new()
    }
}
