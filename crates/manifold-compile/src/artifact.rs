//! Compiled container artifact
//!
//! The artifact holds one [`ServicePlan`] per accepted id plus its own
//! singleton cache and resolution stack, and implements the same
//! [`ServiceResolver`] contract as the interpreted container. It is a
//! derived view of the definition table it was compiled from, never a
//! second source of truth: the stored fingerprint ties it to that table,
//! and [`CompiledContainer::is_stale`] must gate any reuse.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use manifold_domain::{
    Argument, Error, ParamBag, ResolutionStack, Result, ServiceInstance, ServiceResolver,
    ServiceResolverExt, TaggedServices, Definition, PARAM_BAG_ID,
};
use tracing::debug;

use crate::fingerprint::{fingerprint, Fingerprint};
use crate::plan::{ArgPlan, ServicePlan};

/// Static dispatch artifact produced by the compiler
pub struct CompiledContainer {
    plans: HashMap<String, ServicePlan>,
    singletons: DashMap<String, ServiceInstance>,
    resolving: ResolutionStack,
    fingerprint: Fingerprint,
}

impl CompiledContainer {
    pub(crate) fn new(plans: HashMap<String, ServicePlan>, fingerprint: Fingerprint) -> Self {
        Self {
            plans,
            singletons: DashMap::new(),
            resolving: ResolutionStack::new(),
            fingerprint,
        }
    }

    /// Whether the id has a plan or a cached singleton
    pub fn has(&self, id: &str) -> bool {
        self.singletons.contains_key(id) || self.plans.contains_key(id)
    }

    /// Resolve the id through its compiled plan
    ///
    /// Semantics match the interpreted container: cached singletons return
    /// directly, unknown ids fail with `NotFound`, cycles are detected
    /// under the same per-thread stack discipline, and shared results
    /// enter the cache.
    pub fn get(&self, id: &str) -> Result<ServiceInstance> {
        if let Some(cached) = self.singletons.get(id) {
            return Ok(cached.value().clone());
        }

        let Some(plan) = self.plans.get(id) else {
            return Err(Error::not_found(id));
        };

        let guard = self.resolving.enter(id)?;
        let result = self.execute(plan);
        drop(guard);

        let instance = result?;
        if plan.is_shared() {
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

    /// Clear the singleton cache; plans are untouched
    pub fn reset(&self) {
        self.singletons.clear();
    }

    /// The fingerprint of the table this artifact was compiled from
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Whether the artifact no longer matches the given table
    ///
    /// Reusing a stale artifact after definitions change is a correctness
    /// bug; recompile instead.
    pub fn is_stale(&self, definitions: &HashMap<String, Definition>) -> bool {
        fingerprint(definitions) != self.fingerprint
    }

    /// All compiled ids, sorted
    pub fn service_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.plans.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn execute(&self, plan: &ServicePlan) -> Result<ServiceInstance> {
        match plan {
            ServicePlan::Value(instance) => Ok(instance.clone()),
            ServicePlan::Factory { name, func, .. } => {
                debug!("Executing compiled factory '{}'", name);
                func(self)
            }
            ServicePlan::Construct {
                class,
                args,
                construct,
                ..
            } => {
                let mut resolved = Vec::with_capacity(args.len());
                for (position, arg) in args.iter().enumerate() {
                    resolved.push(self.execute_arg(class, arg, position)?);
                }
                construct(resolved)
            }
            ServicePlan::Collection { tag, entries } => {
                let mut services = Vec::with_capacity(entries.len());
                for entry in entries {
                    services.push(self.get(&entry.service_id)?);
                }
                Ok(Arc::new(TaggedServices::new(
                    tag.clone(),
                    entries.clone(),
                    services,
                )))
            }
            ServicePlan::Alias { target } => self.get(target),
        }
    }

    fn execute_arg(&self, class: &str, plan: &ArgPlan, position: usize) -> Result<Argument> {
        match plan {
            ArgPlan::Service(id) => self.get(id).map(Argument::Service),
            ArgPlan::Param {
                name,
                key,
                hint_default,
                required,
                declared_default,
                nullable,
            } => {
                let Ok(bag) = self.get_as::<ParamBag>(PARAM_BAG_ID) else {
                    return Err(Error::unresolvable_parameter(
                        class,
                        name,
                        position,
                        "no parameter bag is registered",
                    ));
                };
                if let Some(value) = bag.get(key) {
                    return Ok(Argument::Value(value));
                }
                if let Some(value) = hint_default {
                    return Ok(Argument::Value(value.clone()));
                }
                if *required {
                    return Err(Error::unresolvable_parameter(
                        class,
                        name,
                        position,
                        format!("required configuration key `{key}` is missing"),
                    ));
                }
                if let Some(value) = declared_default {
                    return Ok(Argument::Value(value.clone()));
                }
                if *nullable {
                    return Ok(Argument::Null);
                }
                Err(Error::unresolvable_parameter(
                    class,
                    name,
                    position,
                    "no injection hint, known type, default, or nullability applies",
                ))
            }
            ArgPlan::Const(value) => Ok(Argument::Value(value.clone())),
            ArgPlan::Null => Ok(Argument::Null),
        }
    }
}

impl ServiceResolver for CompiledContainer {
    fn has(&self, id: &str) -> bool {
        CompiledContainer::has(self, id)
    }

    fn get(&self, id: &str) -> Result<ServiceInstance> {
        CompiledContainer::get(self, id)
    }
}

impl std::fmt::Debug for CompiledContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledContainer")
            .field("plans", &self.plans.len())
            .field("cached", &self.singletons.len())
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}
