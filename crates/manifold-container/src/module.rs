//! Registration units
//!
//! A [`ServiceModule`] is one independent registration unit: it contributes
//! a map of definitions and, separately, tagged service registrations.
//! Modules are merged into a [`crate::ContainerBuilder`] before the
//! container is built.
//!
//! Modules can also auto-register at compile time through a linkme
//! distributed slice, the same discovery mechanism the shape registry
//! uses:
//!
//! ```ignore
//! #[linkme::distributed_slice(SERVICE_MODULES)]
//! static HTTP_MODULE: ModuleEntry = ModuleEntry {
//!     name: "http",
//!     description: "Router, dispatcher, and middleware stack",
//!     module: || Box::new(HttpModule),
//! };
//!
//! let container = Container::builder().with_registered_modules().build();
//! ```

use std::collections::HashMap;

use manifold_domain::Definition;

use crate::tags::TagRegistry;

/// One independent registration unit
pub trait ServiceModule: Send + Sync {
    /// Unit name, used in logs and diagnostics
    fn name(&self) -> &str;

    /// The definitions this unit contributes, keyed by service id
    fn services(&self) -> HashMap<String, Definition>;

    /// Tagged service registrations this unit contributes
    fn tags(&self, _registry: &mut TagRegistry) {}
}

/// Registry entry for compile-time module registration
pub struct ModuleEntry {
    /// Unique module name
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory for the module instance
    pub module: fn() -> Box<dyn ServiceModule>,
}

// Auto-collection via linkme distributed slices; modules submit entries at
// compile time.
#[linkme::distributed_slice]
pub static SERVICE_MODULES: [ModuleEntry] = [..];

/// Instantiate every auto-registered module
pub fn registered_modules() -> Vec<Box<dyn ServiceModule>> {
    SERVICE_MODULES.iter().map(|entry| (entry.module)()).collect()
}

/// List all auto-registered modules as (name, description) pairs
pub fn list_modules() -> Vec<(&'static str, &'static str)> {
    SERVICE_MODULES
        .iter()
        .map(|entry| (entry.name, entry.description))
        .collect()
}
