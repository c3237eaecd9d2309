//! Builds parameterized INSERT, SELECT, UPDATE, DELETE from an entity definition.

use crate::config::{EntityDef, FieldDef, FieldKind, Link, ResolvedRelation};
use crate::sql::SqlValue;

/// Quote identifier for SQLite (safe: only from definitions or checked introspection).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: SqlValue) {
        self.params.push(v);
    }
}

fn primary_key(entity: &EntityDef) -> &'static str {
    // Routed entities are validated to have a single-column key.
    entity.pk().unwrap_or("rowid")
}

fn column_expr(prefix: &str, f: &FieldDef) -> String {
    let col = format!("{}{}", prefix, quoted(f.column));
    match f.kind {
        // NUMERIC affinity stores 1.00 as integer 1; always read back a real.
        FieldKind::Decimal => format!("CAST({} AS REAL)", col),
        _ => col,
    }
}

/// SELECT list aliased to API names: the key as "id", each field under its JSON name.
/// `table_alias` qualifies columns when the statement joins.
pub fn select_column_list(entity: &EntityDef, table_alias: Option<&str>) -> String {
    let prefix = table_alias.map(|a| format!("{}.", a)).unwrap_or_default();
    let mut cols = vec![format!("{}{} AS \"id\"", prefix, quoted(primary_key(entity)))];
    cols.extend(
        entity
            .fields
            .iter()
            .map(|f| format!("{} AS {}", column_expr(&prefix, f), quoted(f.name))),
    );
    cols.join(", ")
}

/// SELECT by primary key.
pub fn select_by_id(entity: &EntityDef, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.push_param(SqlValue::Integer(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ?",
        select_column_list(entity, None),
        quoted(entity.table),
        quoted(primary_key(entity))
    );
    q
}

/// One page ordered by primary key.
pub fn select_list(entity: &EntityDef, limit: i64, offset: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.push_param(SqlValue::Integer(limit));
    q.push_param(SqlValue::Integer(offset));
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {} LIMIT ? OFFSET ?",
        select_column_list(entity, None),
        quoted(entity.table),
        quoted(primary_key(entity))
    );
    q
}

pub fn count(entity: &EntityDef) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT COUNT(*) FROM {}", quoted(entity.table));
    q
}

/// FROM/WHERE shared by the child page and its count. Child table is aliased "main".
fn child_source(rel: &ResolvedRelation, parent_id: i64, q: &mut QueryBuf) -> String {
    q.push_param(SqlValue::Integer(parent_id));
    let child_table = quoted(rel.child.table);
    match rel.link {
        Link::ForeignKey(column) => format!("{} AS main WHERE main.{} = ?", child_table, quoted(column)),
        Link::Through {
            table,
            parent_column,
            child_column,
        } => format!(
            "{} AS main JOIN {} AS link ON link.{} = main.{} WHERE link.{} = ?",
            child_table,
            quoted(table),
            quoted(child_column),
            quoted(primary_key(rel.child)),
            quoted(parent_column)
        ),
    }
}

/// Page of children of one parent row, ordered by the child's key.
pub fn select_children(rel: &ResolvedRelation, parent_id: i64, limit: i64, offset: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let source = child_source(rel, parent_id, &mut q);
    q.push_param(SqlValue::Integer(limit));
    q.push_param(SqlValue::Integer(offset));
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY main.{} LIMIT ? OFFSET ?",
        select_column_list(rel.child, Some("main")),
        source,
        quoted(primary_key(rel.child))
    );
    q
}

pub fn count_children(rel: &ResolvedRelation, parent_id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let source = child_source(rel, parent_id, &mut q);
    q.sql = format!("SELECT COUNT(*) FROM {}", source);
    q
}

/// INSERT of the given fields; the key is assigned by SQLite.
pub fn insert(entity: &EntityDef, values: &[(&FieldDef, SqlValue)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let returning = select_column_list(entity, None);
    if values.is_empty() {
        q.sql = format!("INSERT INTO {} DEFAULT VALUES RETURNING {}", quoted(entity.table), returning);
        return q;
    }
    let mut cols = Vec::with_capacity(values.len());
    for (f, v) in values {
        cols.push(quoted(f.column));
        q.push_param(v.clone());
    }
    let placeholders = vec!["?"; cols.len()].join(", ");
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(entity.table),
        cols.join(", "),
        placeholders,
        returning
    );
    q
}

/// UPDATE by id: SET only the given fields. With nothing to set, selects the row instead.
pub fn update(entity: &EntityDef, id: i64, values: &[(&FieldDef, SqlValue)]) -> QueryBuf {
    if values.is_empty() {
        return select_by_id(entity, id);
    }
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(values.len());
    for (f, v) in values {
        sets.push(format!("{} = ?", quoted(f.column)));
        q.push_param(v.clone());
    }
    q.push_param(SqlValue::Integer(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ? RETURNING {}",
        quoted(entity.table),
        sets.join(", "),
        quoted(primary_key(entity)),
        select_column_list(entity, None)
    );
    q
}

/// DELETE by id, returning the deleted key.
pub fn delete(entity: &EntityDef, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let pk = quoted(primary_key(entity));
    q.push_param(SqlValue::Integer(id));
    q.sql = format!("DELETE FROM {} WHERE {} = ? RETURNING {}", quoted(entity.table), pk, pk);
    q
}
