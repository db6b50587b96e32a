//! Parameter bag
//!
//! An immutable-after-load scalar configuration store consulted during
//! autowiring. The bag is built once at boot from a JSON value tree; how
//! that tree is produced (files, environment, hardcoded test fixtures) is
//! the embedder's concern, not this engine's.
//!
//! `set` exists for override scenarios after load. Overrides live in a
//! separate map consulted before the base tree and are not part of the
//! steady-state contract.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::{Map, Value};

/// Scalar configuration store with dot-path lookup
///
/// ```
/// use manifold_domain::ParamBag;
/// use serde_json::json;
///
/// let bag = ParamBag::new(json!({ "db": { "host": "localhost", "port": 5432 } }));
/// assert_eq!(bag.get_str("db.host"), Some("localhost".to_string()));
/// assert_eq!(bag.get_i64("db.port"), Some(5432));
/// assert!(!bag.has("db.password"));
/// ```
pub struct ParamBag {
    base: Value,
    overrides: RwLock<HashMap<String, Value>>,
}

impl ParamBag {
    /// Create a bag from a loaded value tree
    ///
    /// Non-object roots are accepted; lookups simply miss.
    pub fn new(base: Value) -> Self {
        Self {
            base,
            overrides: RwLock::new(HashMap::new()),
        }
    }

    /// Create an empty bag
    pub fn empty() -> Self {
        Self::new(Value::Object(Map::new()))
    }

    /// Look up a dot-separated key
    ///
    /// Overrides set after load win over the base tree. Intermediate path
    /// segments must be objects; anything else misses.
    pub fn get(&self, key: &str) -> Option<Value> {
        let overrides = self
            .overrides
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(value) = overrides.get(key) {
            return Some(value.clone());
        }
        drop(overrides);

        let mut current = &self.base;
        for segment in key.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        Some(current.clone())
    }

    /// Whether the key resolves to a value
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// String value at the key
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|v| v.as_str().map(str::to_string))
    }

    /// Signed integer value at the key
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.as_i64())
    }

    /// Float value at the key
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.as_f64())
    }

    /// Boolean value at the key
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.as_bool())
    }

    /// Override a key after load
    ///
    /// The override is keyed by the full dot-path and shadows the base tree
    /// for that exact key only.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.overrides
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.into(), value);
    }
}

impl std::fmt::Debug for ParamBag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let overrides = self
            .overrides
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f.debug_struct("ParamBag")
            .field("base", &self.base)
            .field("overrides", &*overrides)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_lookup() {
        let bag = ParamBag::new(json!({ "app": { "cache": { "ttl": 60 } } }));
        assert_eq!(bag.get_i64("app.cache.ttl"), Some(60));
        assert!(bag.get("app.cache.size").is_none());
        assert!(bag.get("app.cache.ttl.deeper").is_none());
    }

    #[test]
    fn test_override_shadows_base() {
        let bag = ParamBag::new(json!({ "debug": false }));
        assert_eq!(bag.get_bool("debug"), Some(false));

        bag.set("debug", json!(true));
        assert_eq!(bag.get_bool("debug"), Some(true));
    }

    #[test]
    fn test_override_is_exact_key() {
        let bag = ParamBag::empty();
        bag.set("db.host", json!("replica"));
        assert_eq!(bag.get_str("db.host"), Some("replica".to_string()));
        assert!(bag.get("db").is_none());
    }
}
