//! Declared constructor shapes
//!
//! Auto-registration system for autowirable classes. Rust has no runtime
//! constructor reflection, so the "introspected shape" of a class is
//! declared as data: an ordered parameter list with injection hints,
//! defaults, and nullability, plus a construct function that turns resolved
//! arguments into an instance.
//!
//! Shapes register two ways, both feeding one process-wide cache:
//!
//! ```ignore
//! // Compile-time, next to the type it describes:
//! #[linkme::distributed_slice(SERVICE_SHAPES)]
//! static MAILER_SHAPE: ShapeEntry = ShapeEntry {
//!     class: "Mailer",
//!     description: "SMTP mailer with transport and retry budget",
//!     shape: mailer_shape,
//! };
//!
//! fn mailer_shape() -> ServiceShape {
//!     ServiceShape::new("Mailer", |args| {
//!         let transport = args[0].service::<Transport>("Mailer")?;
//!         let retries = args[1].as_u64().unwrap_or(3);
//!         Ok(Arc::new(Mailer::new(transport, retries)))
//!     })
//!     .with_param(ParamShape::new("transport").typed("Transport"))
//!     .with_param(ParamShape::new("retries").inject_param_optional("mail.retries").with_default(json!(3)))
//! }
//!
//! // Or at runtime, for tests and embedders:
//! shape_registry().register(mailer_shape());
//! ```
//!
//! The cache is keyed by class identity and holds pure metadata, so it is
//! shared across container instances and across the process lifetime.

use std::any::Any;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::ports::ServiceInstance;

/// Per-parameter injection hint
#[derive(Clone, Debug)]
pub enum InjectionHint {
    /// Resolve a specific service id from the container
    Service(String),
    /// Look up a configuration key in the parameter bag
    Param {
        /// Dot-separated key into the bag
        key: String,
        /// Fallback used when the key is absent
        default: Option<Value>,
        /// Whether an absent key (with no fallback) fails resolution
        /// instead of falling through to the declared-default ladder steps
        required: bool,
    },
}

/// Declared shape of one constructor parameter
#[derive(Clone, Debug, Default)]
pub struct ParamShape {
    /// Parameter name, used in diagnostics
    pub name: String,
    /// Explicit injection hint, consulted before everything else
    pub hint: Option<InjectionHint>,
    /// Declared type identifier, resolved as a service id when the
    /// container knows it
    pub type_id: Option<String>,
    /// Declared default value
    pub default: Option<Value>,
    /// Whether the parameter accepts a null argument when nothing else
    /// applies
    pub nullable: bool,
}

impl ParamShape {
    /// Create a parameter shape with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Hint: resolve the given service id
    pub fn inject_service(mut self, id: impl Into<String>) -> Self {
        self.hint = Some(InjectionHint::Service(id.into()));
        self
    }

    /// Hint: look up a required configuration key
    pub fn inject_param(mut self, key: impl Into<String>) -> Self {
        self.hint = Some(InjectionHint::Param {
            key: key.into(),
            default: None,
            required: true,
        });
        self
    }

    /// Hint: look up a configuration key, falling back to the given value
    pub fn inject_param_or(mut self, key: impl Into<String>, default: Value) -> Self {
        self.hint = Some(InjectionHint::Param {
            key: key.into(),
            default: Some(default),
            required: true,
        });
        self
    }

    /// Hint: look up an optional configuration key
    ///
    /// When the key is absent the resolver falls through to the declared
    /// default and nullability steps instead of failing.
    pub fn inject_param_optional(mut self, key: impl Into<String>) -> Self {
        self.hint = Some(InjectionHint::Param {
            key: key.into(),
            default: None,
            required: false,
        });
        self
    }

    /// Declare the parameter type identifier
    pub fn typed(mut self, type_id: impl Into<String>) -> Self {
        self.type_id = Some(type_id.into());
        self
    }

    /// Declare a default value
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Mark the parameter nullable
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// A resolved constructor argument, handed to the construct function
#[derive(Clone, Debug)]
pub enum Argument {
    /// A service instance resolved from the container
    Service(ServiceInstance),
    /// A scalar or nested configuration value
    Value(Value),
    /// The null argument for a nullable parameter
    Null,
}

impl Argument {
    /// Downcast a service argument to `T`
    ///
    /// `class` is the declaring class, used in the error message when the
    /// argument is not a service of the requested type.
    pub fn service<T: Any + Send + Sync>(&self, class: &str) -> Result<Arc<T>> {
        match self {
            Self::Service(instance) => instance
                .clone()
                .downcast::<T>()
                .map_err(|_| Error::type_mismatch(class, std::any::type_name::<T>())),
            _ => Err(Error::type_mismatch(class, std::any::type_name::<T>())),
        }
    }

    /// The configuration value, when this argument carries one
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// String view of a value argument
    pub fn as_str(&self) -> Option<&str> {
        self.value().and_then(Value::as_str)
    }

    /// Signed integer view of a value argument
    pub fn as_i64(&self) -> Option<i64> {
        self.value().and_then(Value::as_i64)
    }

    /// Unsigned integer view of a value argument
    pub fn as_u64(&self) -> Option<u64> {
        self.value().and_then(Value::as_u64)
    }

    /// Float view of a value argument
    pub fn as_f64(&self) -> Option<f64> {
        self.value().and_then(Value::as_f64)
    }

    /// Boolean view of a value argument
    pub fn as_bool(&self) -> Option<bool> {
        self.value().and_then(Value::as_bool)
    }

    /// Whether this is the null argument
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Signature of a shape's construct function
///
/// A plain function pointer so shapes can live in statics; arguments arrive
/// in declared parameter order.
pub type ConstructFn = fn(Vec<Argument>) -> Result<ServiceInstance>;

/// Declared constructor shape of one autowirable class
#[derive(Clone, Debug)]
pub struct ServiceShape {
    class: String,
    params: Vec<ParamShape>,
    construct: ConstructFn,
}

impl ServiceShape {
    /// Create a shape for the given class with its construct function
    pub fn new(class: impl Into<String>, construct: ConstructFn) -> Self {
        Self {
            class: class.into(),
            params: Vec::new(),
            construct,
        }
    }

    /// Append a parameter declaration
    pub fn with_param(mut self, param: ParamShape) -> Self {
        self.params.push(param);
        self
    }

    /// The class this shape describes
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Declared parameters in constructor order
    pub fn params(&self) -> &[ParamShape] {
        &self.params
    }

    /// Invoke the construct function with resolved arguments
    pub fn construct(&self, args: Vec<Argument>) -> Result<ServiceInstance> {
        (self.construct)(args)
    }

    /// The raw construct function pointer, carried into compiled plans
    pub fn construct_fn(&self) -> ConstructFn {
        self.construct
    }
}

/// Registry entry for compile-time shape registration
///
/// Each autowirable class submits an entry via
/// `#[linkme::distributed_slice(SERVICE_SHAPES)]`; the shape itself is
/// built lazily on first lookup and memoized in the process-wide cache.
pub struct ShapeEntry {
    /// Unique class name
    pub class: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Builder for the shape metadata
    pub shape: fn() -> ServiceShape,
}

// Auto-collection via linkme distributed slices; classes submit entries at
// compile time.
#[linkme::distributed_slice]
pub static SERVICE_SHAPES: [ShapeEntry] = [..];

/// Process-wide cache of constructor shapes keyed by class identity
///
/// Pure metadata: safe to share across container instances and across the
/// process lifetime. Runtime registration overwrites silently, matching the
/// last-write-wins rule of the definition table.
pub struct ShapeRegistry {
    shapes: DashMap<String, Arc<ServiceShape>>,
}

impl ShapeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            shapes: DashMap::new(),
        }
    }

    /// Register a shape at runtime
    pub fn register(&self, shape: ServiceShape) {
        self.shapes.insert(shape.class().to_string(), Arc::new(shape));
    }

    /// Look up the shape for a class
    ///
    /// Consults the cache first, then the distributed slice, memoizing any
    /// slice-built shape so introspection never re-runs for the same class.
    pub fn lookup(&self, class: &str) -> Option<Arc<ServiceShape>> {
        if let Some(shape) = self.shapes.get(class) {
            return Some(Arc::clone(shape.value()));
        }

        for entry in SERVICE_SHAPES {
            if entry.class == class {
                let shape = Arc::new((entry.shape)());
                self.shapes.insert(class.to_string(), Arc::clone(&shape));
                return Some(shape);
            }
        }

        None
    }

    /// Whether a shape exists for the class
    pub fn contains(&self, class: &str) -> bool {
        self.shapes.contains_key(class) || SERVICE_SHAPES.iter().any(|e| e.class == class)
    }

    /// All known classes, sorted, from both registration paths
    pub fn classes(&self) -> Vec<String> {
        let mut classes: Vec<String> = self.shapes.iter().map(|e| e.key().clone()).collect();
        for entry in SERVICE_SHAPES {
            if !classes.iter().any(|c| c == entry.class) {
                classes.push(entry.class.to_string());
            }
        }
        classes.sort();
        classes
    }
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static SHAPE_REGISTRY: Lazy<ShapeRegistry> = Lazy::new(ShapeRegistry::new);

/// The process-wide shape registry
pub fn shape_registry() -> &'static ShapeRegistry {
    &SHAPE_REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn widget_shape() -> ServiceShape {
        ServiceShape::new("shape_tests.Widget", |args| {
            let label = args[0].as_str().unwrap_or("unnamed").to_string();
            Ok(Arc::new(label))
        })
        .with_param(ParamShape::new("label").with_default(json!("unnamed")))
    }

    #[test]
    fn test_param_shape_builder() {
        let param = ParamShape::new("pool")
            .typed("ConnectionPool")
            .with_default(json!(8))
            .nullable();
        assert_eq!(param.name, "pool");
        assert_eq!(param.type_id.as_deref(), Some("ConnectionPool"));
        assert_eq!(param.default, Some(json!(8)));
        assert!(param.nullable);
    }

    #[test]
    fn test_required_param_hint() {
        let param = ParamShape::new("dsn").inject_param("db.dsn");
        match param.hint {
            Some(InjectionHint::Param { key, required, default }) => {
                assert_eq!(key, "db.dsn");
                assert!(required);
                assert!(default.is_none());
            }
            other => panic!("unexpected hint: {other:?}"),
        }
    }

    #[test]
    fn test_registry_register_and_lookup() {
        let registry = ShapeRegistry::new();
        registry.register(widget_shape());

        let shape = registry.lookup("shape_tests.Widget").expect("shape registered");
        assert_eq!(shape.class(), "shape_tests.Widget");
        assert_eq!(shape.params().len(), 1);
        assert!(registry.lookup("shape_tests.Missing").is_none());
    }

    #[test]
    fn test_registry_overwrites_silently() {
        let registry = ShapeRegistry::new();
        registry.register(widget_shape());
        registry.register(ServiceShape::new("shape_tests.Widget", |_| {
            Ok(Arc::new("replacement".to_string()))
        }));

        let shape = registry.lookup("shape_tests.Widget").expect("shape registered");
        assert!(shape.params().is_empty());
    }

    #[test]
    fn test_argument_views() {
        let arg = Argument::Value(json!(42));
        assert_eq!(arg.as_i64(), Some(42));
        assert_eq!(arg.as_str(), None);
        assert!(!arg.is_null());
        assert!(Argument::Null.is_null());
    }
}
