//! Generic CRUD execution against SQLite.

use crate::config::{EntityDef, FieldKind, ResolvedRelation};
use crate::error::AppError;
use crate::service::validation::{parse_datetime, FieldValues, RENDERED_DATETIME};
use crate::sql::{
    bind, bind_scalar, count, count_children, delete, insert, select_by_id, select_children, select_list, update,
    QueryBuf,
};
use serde_json::{Map, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

pub struct CrudService;

impl CrudService {
    /// One page ordered by primary key, plus the total row count.
    pub async fn list(
        pool: &SqlitePool,
        entity: &EntityDef,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Value>, i64), AppError> {
        let rows = Self::query_many(pool, entity, &select_list(entity, limit, offset)).await?;
        let total = Self::query_count(pool, &count(entity)).await?;
        Ok((rows, total))
    }

    /// Fetch one row by primary key.
    pub async fn read(pool: &SqlitePool, entity: &EntityDef, id: i64) -> Result<Option<Value>, AppError> {
        Self::query_one(pool, entity, &select_by_id(entity, id)).await
    }

    /// Children of one parent row. A parent without children (or without a row) yields an empty page.
    pub async fn list_children(
        pool: &SqlitePool,
        relation: &ResolvedRelation,
        parent_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Value>, i64), AppError> {
        let page = select_children(relation, parent_id, limit, offset);
        let rows = Self::query_many(pool, relation.child, &page).await?;
        let total = Self::query_count(pool, &count_children(relation, parent_id)).await?;
        Ok((rows, total))
    }

    /// Insert one row in a transaction. Returns the created row.
    pub async fn create(pool: &SqlitePool, entity: &EntityDef, values: &FieldValues) -> Result<Value, AppError> {
        let q = insert(entity, values);
        let mut tx = pool.begin().await?;
        let row = Self::execute_returning_one_tx(&mut tx, entity, &q)
            .await?
            .ok_or_else(|| AppError::CreationFailed(format!("{} creation failed", entity.name)))?;
        tx.commit().await?;
        Ok(row)
    }

    /// Update the given fields of one row. Returns None when no row has that id.
    pub async fn update(
        pool: &SqlitePool,
        entity: &EntityDef,
        id: i64,
        values: &FieldValues,
    ) -> Result<Option<Value>, AppError> {
        let q = update(entity, id, values);
        let mut tx = pool.begin().await?;
        let row = Self::execute_returning_one_tx(&mut tx, entity, &q).await?;
        tx.commit().await?;
        Ok(row)
    }

    /// Delete one row by id. Returns whether a row was deleted.
    pub async fn delete(pool: &SqlitePool, entity: &EntityDef, id: i64) -> Result<bool, AppError> {
        let q = delete(entity, id);
        let mut tx = pool.begin().await?;
        tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
        let query = q.params.iter().fold(sqlx::query(&q.sql), bind);
        let deleted = query.fetch_optional(&mut *tx).await?.is_some();
        tx.commit().await?;
        Ok(deleted)
    }

    async fn query_one(pool: &SqlitePool, entity: &EntityDef, q: &QueryBuf) -> Result<Option<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let query = q.params.iter().fold(sqlx::query(&q.sql), bind);
        let row = query.fetch_optional(pool).await?;
        row.map(|r| row_to_json(entity, &r)).transpose()
    }

    async fn query_many(pool: &SqlitePool, entity: &EntityDef, q: &QueryBuf) -> Result<Vec<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let query = q.params.iter().fold(sqlx::query(&q.sql), bind);
        let rows = query.fetch_all(pool).await?;
        rows.iter().map(|r| row_to_json(entity, r)).collect()
    }

    async fn query_count(pool: &SqlitePool, q: &QueryBuf) -> Result<i64, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let query = q.params.iter().fold(sqlx::query_scalar::<_, i64>(&q.sql), bind_scalar);
        Ok(query.fetch_one(pool).await?)
    }

    async fn execute_returning_one_tx(
        tx: &mut SqliteConnection,
        entity: &EntityDef,
        q: &QueryBuf,
    ) -> Result<Option<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
        let query = q.params.iter().fold(sqlx::query(&q.sql), bind);
        let row = query.fetch_optional(&mut *tx).await?;
        row.map(|r| row_to_json(entity, &r)).transpose()
    }
}

/// Decode a row selected with the entity's aliased column list into its JSON representation.
fn row_to_json(entity: &EntityDef, row: &SqliteRow) -> Result<Value, AppError> {
    let mut map = Map::new();
    map.insert("id".into(), row.try_get::<Option<i64>, _>("id")?.into());
    for f in entity.fields {
        let v = match f.kind {
            FieldKind::Integer => row.try_get::<Option<i64>, _>(f.name)?.into(),
            FieldKind::Decimal => row
                .try_get::<Option<f64>, _>(f.name)?
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldKind::Text => row.try_get::<Option<String>, _>(f.name)?.into(),
            FieldKind::DateTime => row
                .try_get::<Option<String>, _>(f.name)?
                .map(|s| render_datetime(&s))
                .into(),
        };
        map.insert(f.name.to_string(), v);
    }
    Ok(Value::Object(map))
}

/// Stored `YYYY-MM-DD HH:MM:SS` becomes `YYYY-MM-DDTHH:MM:SS`; anything unparsable is returned as stored.
fn render_datetime(stored: &str) -> String {
    parse_datetime(stored)
        .map(|dt| dt.format(RENDERED_DATETIME).to_string())
        .unwrap_or_else(|| stored.to_string())
}
