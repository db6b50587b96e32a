//! Tag aggregation
//!
//! Registration units append `(tag, service id, priority)` triples before
//! the container is built. At finalize time every distinct tag becomes one
//! tagged-collection definition whose entries are sorted by priority
//! descending; the sort is stable, so equal priorities keep their original
//! append order and the resulting sequence is reproducible across runs.

use std::collections::BTreeMap;

use manifold_domain::{TagEntry, TaggedDefinition};

#[derive(Clone, Debug)]
struct TagRecord {
    tag: String,
    service_id: String,
    priority: i32,
}

/// Append-only accumulator of tagged service registrations
#[derive(Clone, Debug, Default)]
pub struct TagRegistry {
    records: Vec<TagRecord>,
}

impl TagRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tagged service registration
    ///
    /// Entries are never removed before finalize; append order is the tie
    /// break for equal priorities.
    pub fn append(
        &mut self,
        tag: impl Into<String>,
        service_id: impl Into<String>,
        priority: i32,
    ) {
        self.records.push(TagRecord {
            tag: tag.into(),
            service_id: service_id.into(),
            priority,
        });
    }

    /// Number of accumulated registrations
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fold the accumulated registrations into tagged definitions
    ///
    /// One definition per distinct tag, named by the tag, entries in final
    /// resolution order. Tags come out in deterministic (sorted) order.
    pub fn finalize(&self) -> Vec<TaggedDefinition> {
        let mut grouped: BTreeMap<String, Vec<TagEntry>> = BTreeMap::new();
        for record in &self.records {
            grouped.entry(record.tag.clone()).or_default().push(TagEntry {
                service_id: record.service_id.clone(),
                priority: record.priority,
            });
        }

        grouped
            .into_iter()
            .map(|(tag, mut entries)| {
                // Vec::sort_by is stable: ties keep append order.
                entries.sort_by(|a, b| b.priority.cmp(&a.priority));
                TaggedDefinition::new(tag, entries)
            })
            .collect()
    }
}
