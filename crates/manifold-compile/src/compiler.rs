//! Definition-table compiler
//!
//! Scans the entire table before failing: every definition the compiler
//! cannot statically support is collected, with its kind and reason, into
//! one consolidated report. Compilation is a rare, boot-time,
//! developer-facing operation; piecemeal failures would make large
//! migrations unworkable.
//!
//! Support rules:
//!
//! - `Value` always compiles.
//! - `Factory` compiles only in its named-function sub-variant; runtime
//!   closures are rejected.
//! - `Autowire` compiles when the class has a registered shape and every
//!   parameter statically resolves to an argument plan.
//! - `Tagged` compiles when no member present in the table is itself
//!   rejected; `Alias` compiles when its (transitive) target is not
//!   rejected. Both are computed by fixpoint, so chains ending in a
//!   rejected definition reject too, and pure alias or collection cycles
//!   are rejected rather than compiled.
//! - Ids referenced but absent from the table stay compilable: the
//!   artifact reproduces the interpreted container's `NotFound` at
//!   resolution time.

use std::collections::HashMap;

use manifold_domain::{
    AutowireDefinition, Definition, Error, FactoryCallable, InjectionHint, RejectedDefinition,
    Result, shape_registry,
};
use tracing::{debug, info};

use crate::artifact::CompiledContainer;
use crate::fingerprint::fingerprint;
use crate::plan::{ArgPlan, ServicePlan};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Status {
    Supported,
    Rejected(String),
    Pending,
}

/// Compiles a frozen definition table into a static dispatch artifact
pub struct Compiler;

impl Compiler {
    /// Compile the table, failing once with the full rejection list
    ///
    /// The produced artifact is behaviorally equivalent to the interpreted
    /// container for every accepted id: same singleton semantics, same
    /// `has`/`get` results, same `NotFound` behavior for unknown ids.
    pub fn compile(definitions: &HashMap<String, Definition>) -> Result<CompiledContainer> {
        let mut status: HashMap<String, Status> = HashMap::new();
        let mut plans: HashMap<String, ServicePlan> = HashMap::new();

        for (id, definition) in definitions {
            let verdict = match definition {
                Definition::Value(def) => {
                    plans.insert(id.clone(), ServicePlan::Value(def.value.clone()));
                    Status::Supported
                }
                Definition::Factory(def) => match &def.callable {
                    FactoryCallable::Named { name, func } => {
                        plans.insert(
                            id.clone(),
                            ServicePlan::Factory {
                                name: *name,
                                func: *func,
                                shared: def.shared,
                            },
                        );
                        Status::Supported
                    }
                    FactoryCallable::Closure(_) => {
                        Status::Rejected("runtime closure factories cannot be compiled".to_string())
                    }
                },
                Definition::Autowire(def) => match Self::plan_autowire(def, definitions) {
                    Ok(plan) => {
                        plans.insert(id.clone(), plan);
                        Status::Supported
                    }
                    Err(reason) => Status::Rejected(reason),
                },
                Definition::Tagged(_) | Definition::Alias(_) => Status::Pending,
            };
            status.insert(id.clone(), verdict);
        }

        Self::settle_pending(definitions, &mut status);

        let mut rejected: Vec<RejectedDefinition> = definitions
            .iter()
            .filter_map(|(id, definition)| match status.get(id) {
                Some(Status::Rejected(reason)) => Some(RejectedDefinition {
                    id: id.clone(),
                    kind: definition.kind(),
                    reason: reason.clone(),
                }),
                _ => None,
            })
            .collect();
        rejected.sort_by(|a, b| a.id.cmp(&b.id));

        if !rejected.is_empty() {
            info!(
                "Compilation rejected {} of {} definition(s)",
                rejected.len(),
                definitions.len()
            );
            return Err(Error::compile_unsupported(rejected));
        }

        for (id, definition) in definitions {
            match definition {
                Definition::Tagged(def) => {
                    plans.insert(
                        id.clone(),
                        ServicePlan::Collection {
                            tag: def.tag.clone(),
                            entries: def.entries.clone(),
                        },
                    );
                }
                Definition::Alias(def) => {
                    plans.insert(
                        id.clone(),
                        ServicePlan::Alias {
                            target: def.target.clone(),
                        },
                    );
                }
                _ => {}
            }
        }

        info!("Compiled {} definition(s)", plans.len());
        Ok(CompiledContainer::new(plans, fingerprint(definitions)))
    }

    /// Resolve alias and collection support by fixpoint
    ///
    /// Each round settles every pending definition whose target or members
    /// are already decided; survivors of a stable round are cycles and
    /// reject.
    fn settle_pending(definitions: &HashMap<String, Definition>, status: &mut HashMap<String, Status>) {
        loop {
            let mut updates: Vec<(String, Status)> = Vec::new();

            for (id, definition) in definitions {
                if status.get(id) != Some(&Status::Pending) {
                    continue;
                }
                match definition {
                    Definition::Alias(def) => match status.get(&def.target) {
                        None | Some(Status::Supported) => {
                            updates.push((id.clone(), Status::Supported));
                        }
                        Some(Status::Rejected(_)) => {
                            updates.push((
                                id.clone(),
                                Status::Rejected(format!(
                                    "alias target `{}` is unsupported",
                                    def.target
                                )),
                            ));
                        }
                        Some(Status::Pending) => {}
                    },
                    Definition::Tagged(def) => {
                        let mut verdict = Some(Status::Supported);
                        for entry in &def.entries {
                            match status.get(&entry.service_id) {
                                None | Some(Status::Supported) => {}
                                Some(Status::Rejected(_)) => {
                                    verdict = Some(Status::Rejected(format!(
                                        "member `{}` is unsupported",
                                        entry.service_id
                                    )));
                                    break;
                                }
                                Some(Status::Pending) => {
                                    verdict = None;
                                    break;
                                }
                            }
                        }
                        if let Some(verdict) = verdict {
                            updates.push((id.clone(), verdict));
                        }
                    }
                    _ => {}
                }
            }

            if updates.is_empty() {
                break;
            }
            for (id, verdict) in updates {
                status.insert(id, verdict);
            }
        }

        for verdict in status.values_mut() {
            if *verdict == Status::Pending {
                *verdict =
                    Status::Rejected("alias or collection cycle cannot be compiled".to_string());
            }
        }
    }

    /// Plan an autowire definition, deciding the resolution ladder per
    /// parameter ahead of time
    fn plan_autowire(
        def: &AutowireDefinition,
        definitions: &HashMap<String, Definition>,
    ) -> std::result::Result<ServicePlan, String> {
        let Some(shape) = shape_registry().lookup(&def.class) else {
            return Err(format!("no registered shape for class `{}`", def.class));
        };

        debug!("Planning autowire for class '{}'", def.class);

        let mut args = Vec::with_capacity(shape.params().len());
        for (position, param) in shape.params().iter().enumerate() {
            if let Some(hint) = &param.hint {
                match hint {
                    InjectionHint::Service(id) => {
                        args.push(ArgPlan::Service(id.clone()));
                        continue;
                    }
                    InjectionHint::Param {
                        key,
                        default,
                        required,
                    } => {
                        // Bag lookups stay runtime decisions; the plan pins
                        // the full fallback ladder instead.
                        args.push(ArgPlan::Param {
                            name: param.name.clone(),
                            key: key.clone(),
                            hint_default: default.clone(),
                            required: *required,
                            declared_default: param.default.clone(),
                            nullable: param.nullable,
                        });
                        continue;
                    }
                }
            }

            if let Some(type_id) = &param.type_id {
                if definitions.contains_key(type_id) {
                    args.push(ArgPlan::Service(type_id.clone()));
                    continue;
                }
            }

            if let Some(default) = &param.default {
                args.push(ArgPlan::Const(default.clone()));
                continue;
            }

            if param.nullable {
                args.push(ArgPlan::Null);
                continue;
            }

            return Err(format!(
                "parameter `{}` (position {}) of `{}` is unresolvable",
                param.name, position, def.class
            ));
        }

        Ok(ServicePlan::Construct {
            class: def.class.clone(),
            args,
            construct: shape.construct_fn(),
            shared: def.shared,
        })
    }
}
