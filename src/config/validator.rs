//! Model validation: referential integrity of definitions and route consistency.

use crate::config::{EntityDef, Link, PrimaryKey, RelationDef};
use crate::error::ConfigError;
use std::collections::{HashMap, HashSet};

pub fn validate(entities: &[EntityDef], relations: &[RelationDef]) -> Result<(), ConfigError> {
    let by_table: HashMap<&str, &EntityDef> = entities.iter().map(|e| (e.table, e)).collect();
    if by_table.len() != entities.len() {
        return Err(ConfigError::Validation("duplicate table name".into()));
    }

    let mut names = HashSet::new();
    let mut paths = HashSet::new();
    for e in entities {
        if !names.insert(e.name) {
            return Err(ConfigError::Validation(format!("duplicate entity name: {}", e.name)));
        }
        if let Some(path) = e.path {
            if !paths.insert(path) {
                return Err(ConfigError::DuplicatePathSegment(path.to_string()));
            }
            if e.pk().is_none() {
                return Err(ConfigError::InvalidPrimaryKey {
                    table: e.table.to_string(),
                    column: "routed entities need a single-column primary key".into(),
                });
            }
        }
        if let PrimaryKey::Composite(cols) = e.primary_key {
            for c in cols {
                if !e.has_column(c) {
                    return Err(ConfigError::InvalidPrimaryKey {
                        table: e.table.to_string(),
                        column: (*c).to_string(),
                    });
                }
            }
        }
        let mut columns = HashSet::new();
        for f in e.fields {
            if !columns.insert(f.column) || Some(f.column) == e.pk() {
                return Err(ConfigError::Validation(format!(
                    "duplicate column {}.{}",
                    e.table, f.column
                )));
            }
            if let Some(fk) = f.references {
                let target = by_table.get(fk.table).ok_or_else(|| ConfigError::MissingReference {
                    kind: "table",
                    id: fk.table.to_string(),
                })?;
                if !target.has_column(fk.column) {
                    return Err(ConfigError::MissingReference {
                        kind: "column",
                        id: format!("{}.{}", fk.table, fk.column),
                    });
                }
            }
        }
        for idx in e.indexes {
            if let Some(c) = idx.columns.iter().find(|c| !e.has_column(c)) {
                return Err(ConfigError::MissingReference {
                    kind: "index column",
                    id: format!("{}.{}", idx.name, c),
                });
            }
        }
    }

    let mut pairs = HashSet::new();
    for r in relations {
        let parent = routed(&by_table, r.parent)?;
        let child = routed(&by_table, r.child)?;
        if !pairs.insert((r.parent, r.segment)) {
            return Err(ConfigError::DuplicatePathSegment(format!("{}/{}", r.parent, r.segment)));
        }
        match r.link {
            Link::ForeignKey(column) => {
                if !child.has_column(column) {
                    return Err(ConfigError::MissingReference {
                        kind: "relation column",
                        id: format!("{}.{}", child.table, column),
                    });
                }
            }
            Link::Through {
                table,
                parent_column,
                child_column,
            } => {
                let join = by_table.get(table).ok_or_else(|| ConfigError::MissingReference {
                    kind: "join table",
                    id: table.to_string(),
                })?;
                for column in [parent_column, child_column] {
                    if !join.has_column(column) {
                        return Err(ConfigError::MissingReference {
                            kind: "relation column",
                            id: format!("{}.{}", table, column),
                        });
                    }
                }
                if parent.pk().is_none() || child.pk().is_none() {
                    return Err(ConfigError::Validation(format!(
                        "relation {}/{} needs keyed tables",
                        r.parent, r.segment
                    )));
                }
            }
        }
    }

    Ok(())
}

fn routed<'a>(by_table: &HashMap<&str, &'a EntityDef>, table: &str) -> Result<&'a EntityDef, ConfigError> {
    by_table
        .get(table)
        .copied()
        .filter(|e| e.path.is_some())
        .ok_or_else(|| ConfigError::MissingReference {
            kind: "routed table",
            id: table.to_string(),
        })
}
