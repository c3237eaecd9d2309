//! Entity routes built from the resolved model.
//! Paths are parameterized; handlers resolve the entity and relation by segment.
//! Every parameter at the same position is named `collection` so the static `search` segment can share the tree.

use crate::handlers::entity::{create, delete, list, list_children, patch, read, replace};
use crate::handlers::search::search;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn entity_routes(state: AppState) -> Router {
    Router::new()
        .route("/:collection", get(list).post(create))
        .route("/:collection/", get(list).post(create))
        .route("/:collection/search", get(search))
        .route(
            "/:collection/:id",
            get(read).put(replace).patch(patch).delete(delete),
        )
        .route("/:collection/:id/:child", get(list_children))
        .with_state(state)
}
