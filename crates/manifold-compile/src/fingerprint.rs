//! Definition-table fingerprints
//!
//! A compiled artifact must be invalidated whenever its source table
//! changes, keyed by content rather than a manual flag. The fingerprint is
//! a SHA-256 digest over a canonical, sorted rendering of the table: id,
//! kind, and a payload descriptor per definition.
//!
//! Value payloads are described by instance identity, so swapping the
//! payload object behind an id changes the fingerprint; factory closures
//! are likewise identity-described. Fingerprints are for in-process
//! staleness checks against the live table, not for persistence across
//! builds.

use std::collections::HashMap;
use std::sync::Arc;

use manifold_domain::{Definition, FactoryCallable};
use sha2::{Digest, Sha256};

/// Content fingerprint of one definition table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// The hex digest
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the fingerprint of a definition table
pub fn fingerprint(definitions: &HashMap<String, Definition>) -> Fingerprint {
    let mut lines: Vec<String> = definitions
        .iter()
        .map(|(id, definition)| descriptor(id, definition))
        .collect();
    lines.sort();

    let mut hasher = Sha256::new();
    for line in &lines {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    Fingerprint(hex::encode(hasher.finalize()))
}

fn descriptor(id: &str, definition: &Definition) -> String {
    match definition {
        Definition::Value(def) => {
            format!("{id}=value:{:p}", Arc::as_ptr(&def.value))
        }
        Definition::Factory(def) => match &def.callable {
            FactoryCallable::Closure(callable) => format!(
                "{id}=factory:closure:{:p}:shared={}",
                Arc::as_ptr(callable),
                def.shared
            ),
            FactoryCallable::Named { name, .. } => {
                format!("{id}=factory:named:{name}:shared={}", def.shared)
            }
        },
        Definition::Autowire(def) => {
            format!("{id}=autowire:{}:shared={}", def.class, def.shared)
        }
        Definition::Tagged(def) => {
            let entries: Vec<String> = def
                .entries
                .iter()
                .map(|e| format!("{}@{}", e.service_id, e.priority))
                .collect();
            format!("{id}=tagged:{}:[{}]", def.tag, entries.join(","))
        }
        Definition::Alias(def) => format!("{id}=alias:{}", def.target),
    }
}
