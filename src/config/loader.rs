//! Build the resolved model from static definitions.

use crate::config::chinook::{ENTITIES, RELATIONS};
use crate::config::resolved::{ResolvedModel, ResolvedRelation};
use crate::config::{validate, EntityDef, RelationDef};
use crate::error::ConfigError;
use std::collections::HashMap;

/// Build resolved model from definitions (validates first).
pub fn resolve(
    entities: &'static [EntityDef],
    relations: &'static [RelationDef],
) -> Result<ResolvedModel, ConfigError> {
    validate(entities, relations)?;

    let by_table: HashMap<&str, &'static EntityDef> = entities.iter().map(|e| (e.table, e)).collect();
    let entity_by_path = entities
        .iter()
        .filter_map(|e| e.path.map(|p| (p, e)))
        .collect();

    let mut resolved = Vec::with_capacity(relations.len());
    for r in relations {
        let missing = |table: &str| ConfigError::MissingReference {
            kind: "routed table",
            id: table.to_string(),
        };
        let parent = *by_table.get(r.parent).ok_or_else(|| missing(r.parent))?;
        let child = *by_table.get(r.child).ok_or_else(|| missing(r.child))?;
        resolved.push(ResolvedRelation {
            parent,
            child,
            segment: r.segment,
            link: r.link,
        });
    }

    Ok(ResolvedModel {
        entities: entities.iter().collect(),
        entity_by_path,
        relations: resolved,
    })
}

impl ResolvedModel {
    /// The Chinook schema with its child-collection relations.
    pub fn chinook() -> Result<Self, ConfigError> {
        resolve(ENTITIES, RELATIONS)
    }
}
