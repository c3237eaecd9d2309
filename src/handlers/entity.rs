//! Entity CRUD handlers: create, list, read, replace, patch, delete, child collections.

use crate::config::{EntityDef, Operation};
use crate::error::AppError;
use crate::middleware::{DEFAULT_LIMIT, DEFAULT_OFFSET};
use crate::response::{success_many, success_one, success_one_ok};
use crate::service::{CrudService, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl Pagination {
    /// (limit, offset) as bound to SQL.
    pub fn limit_offset(&self) -> (i64, i64) {
        let clamp = |n: u64| i64::try_from(n).unwrap_or(i64::MAX);
        (
            clamp(self.limit.unwrap_or(DEFAULT_LIMIT)),
            clamp(self.offset.unwrap_or(DEFAULT_OFFSET)),
        )
    }
}

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str.parse().map_err(|_| AppError::BadRequest("invalid id".into()))
}

fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

fn entity_for(state: &AppState, path_segment: &str, op: Operation) -> Result<&'static EntityDef, AppError> {
    let entity = state
        .model
        .entity_by_path(path_segment)
        .ok_or_else(|| AppError::NotFound(format!("collection '{}' not found", path_segment)))?;
    if !entity.allows(op) {
        return Err(AppError::BadRequest(format!("{} not allowed", op.as_str())));
    }
    Ok(entity)
}

fn not_found(entity: &EntityDef) -> AppError {
    AppError::NotFound(format!("{} not found", entity.name))
}

pub async fn list(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(page): Query<Pagination>,
) -> Result<impl IntoResponse, AppError> {
    let entity = entity_for(&state, &collection, Operation::List)?;
    let (limit, offset) = page.limit_offset();
    let (rows, total) = CrudService::list(&state.pool, entity, limit, offset).await?;
    Ok(success_many(rows, total))
}

pub async fn create(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let entity = entity_for(&state, &collection, Operation::Create)?;
    let body = body_to_map(body)?;
    let values = RequestValidator::validate(entity, &body)?;
    let row = CrudService::create(&state.pool, entity, &values).await?;
    Ok(success_one(row))
}

pub async fn read(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let entity = entity_for(&state, &collection, Operation::Read)?;
    let id = parse_id(&id)?;
    let row = CrudService::read(&state.pool, entity, id)
        .await?
        .ok_or_else(|| not_found(entity))?;
    Ok(success_one_ok(row))
}

/// PUT: every field is rewritten; absent ones take their default.
pub async fn replace(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let entity = entity_for(&state, &collection, Operation::Update)?;
    let id = parse_id(&id)?;
    let body = body_to_map(body)?;
    let values = RequestValidator::validate(entity, &body)?;
    let row = CrudService::update(&state.pool, entity, id, &values)
        .await?
        .ok_or_else(|| not_found(entity))?;
    Ok(success_one_ok(row))
}

pub async fn patch(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let entity = entity_for(&state, &collection, Operation::Patch)?;
    let id = parse_id(&id)?;
    let body = body_to_map(body)?;
    let values = RequestValidator::validate_partial(entity, &body)?;
    let row = CrudService::update(&state.pool, entity, id, &values)
        .await?
        .ok_or_else(|| not_found(entity))?;
    Ok(success_one_ok(row))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let entity = entity_for(&state, &collection, Operation::Delete)?;
    let id = parse_id(&id)?;
    if !CrudService::delete(&state.pool, entity, id).await? {
        return Err(not_found(entity));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /{parent}/{id}/{segment}: only registered parent/child pairs are served.
pub async fn list_children(
    State(state): State<AppState>,
    Path((collection, id, segment)): Path<(String, String, String)>,
    Query(page): Query<Pagination>,
) -> Result<impl IntoResponse, AppError> {
    entity_for(&state, &collection, Operation::Read)?;
    let relation = state
        .model
        .relation(&collection, &segment)
        .ok_or_else(|| AppError::NotFound(format!("{} has no '{}' collection", collection, segment)))?;
    if !relation.child.allows(Operation::List) {
        return Err(AppError::BadRequest("list not allowed".into()));
    }
    let id = parse_id(&id)?;
    let (limit, offset) = page.limit_offset();
    let (rows, total) = CrudService::list_children(&state.pool, relation, id, limit, offset).await?;
    Ok(success_many(rows, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        assert_eq!(Pagination::default().limit_offset(), (10, 0));
        let p = Pagination {
            offset: Some(30),
            limit: Some(u64::MAX),
        };
        assert_eq!(p.limit_offset(), (i64::MAX, 30));
    }

    #[test]
    fn ids_must_be_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(AppError::BadRequest(_))));
    }
}
