//! Router assembly: service routes at the root, entity routes under `/api/v1`.

mod common;
mod entity;

pub use common::service_routes;
pub use entity::entity_routes;

use crate::middleware::response_metadata;
use crate::openapi::API_PREFIX;
use crate::state::AppState;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// The full application with tracing, CORS, response metadata and the body size limit.
pub fn app(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(service_routes(state.clone()))
        .nest(API_PREFIX, entity_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(axum::middleware::from_fn(response_metadata))
                .layer(RequestBodyLimitLayer::new(body_limit)),
        )
}
