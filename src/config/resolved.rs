//! Resolved model: definitions validated and indexed for runtime lookup.

use crate::config::{EntityDef, Link};
use std::collections::HashMap;

/// A parent/child pair with both ends resolved to their definitions.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedRelation {
    pub parent: &'static EntityDef,
    pub child: &'static EntityDef,
    pub segment: &'static str,
    pub link: Link,
}

#[derive(Clone, Debug)]
pub struct ResolvedModel {
    /// All tables, routed or not, in creation order.
    pub entities: Vec<&'static EntityDef>,
    pub entity_by_path: HashMap<&'static str, &'static EntityDef>,
    /// Unique by (parent path, child segment).
    pub relations: Vec<ResolvedRelation>,
}

impl ResolvedModel {
    pub fn entity_by_path(&self, path: &str) -> Option<&'static EntityDef> {
        self.entity_by_path.get(path).copied()
    }

    pub fn entity_by_table(&self, table: &str) -> Option<&'static EntityDef> {
        self.entities.iter().find(|e| e.table == table).copied()
    }

    pub fn relation(&self, parent_path: &str, segment: &str) -> Option<&ResolvedRelation> {
        self.relations
            .iter()
            .find(|r| r.parent.path == Some(parent_path) && r.segment == segment)
    }

    /// Routed entities in creation order.
    pub fn routed(&self) -> impl Iterator<Item = &'static EntityDef> + '_ {
        self.entities.iter().copied().filter(|e| e.path.is_some())
    }

    /// Relations whose parent is the given entity, sorted by segment.
    pub fn relations_of(&self, parent: &EntityDef) -> Vec<&ResolvedRelation> {
        let mut out: Vec<_> = self
            .relations
            .iter()
            .filter(|r| r.parent.table == parent.table)
            .collect();
        out.sort_by_key(|r| r.segment);
        out
    }
}
