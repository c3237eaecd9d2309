//! Full-text search handler.

use crate::error::AppError;
use crate::handlers::entity::Pagination;
use crate::response::success_many;
use crate::search::{SearchQuery, TextSearchManager};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub table_name: Option<String>,
    pub column_name: Option<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

/// GET /{scope}/search. The scope segment does not narrow the search; use `table_name` for that.
pub async fn search(
    State(state): State<AppState>,
    Path(_scope): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = Pagination {
        offset: params.offset,
        limit: params.limit,
    }
    .limit_offset();
    let q = SearchQuery {
        term: params
            .query
            .ok_or_else(|| AppError::Validation("query is required".into()))?,
        table_name: params.table_name,
        column_name: params.column_name,
        limit,
        offset,
    };
    let (hits, total) = TextSearchManager::search(&state.pool, &q).await?;
    Ok(success_many(hits, total))
}
