//! Service routes outside `/api/v1`: liveness, readiness, build info and the OpenAPI document.

use crate::openapi::{openapi_json, API_PREFIX};
use crate::search::SEARCH_TABLE;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_index: Option<&'static str>,
}

#[derive(Serialize)]
struct BuildInfo {
    name: &'static str,
    version: &'static str,
    api: &'static str,
}

async fn health() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: "ok",
        database: None,
        search_index: None,
    })
}

/// 503 until the database answers and the full-text table exists.
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ServiceStatus>) {
    let index: Result<i64, _> = sqlx::query_scalar("SELECT count(*) FROM sqlite_master WHERE name = ?")
        .bind(SEARCH_TABLE)
        .fetch_one(&state.pool)
        .await;
    let (status, database, search_index) = match index {
        Ok(1) => (StatusCode::OK, "ok", "ok"),
        Ok(_) => (StatusCode::SERVICE_UNAVAILABLE, "ok", "missing"),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable", "unknown")
        }
    };
    let body = ServiceStatus {
        status: if status == StatusCode::OK { "ok" } else { "degraded" },
        database: Some(database),
        search_index: Some(search_index),
    };
    (status, Json(body))
}

async fn version() -> Json<BuildInfo> {
    Json(BuildInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        api: API_PREFIX,
    })
}

pub fn service_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .route("/openapi.json", get(openapi_json))
        .with_state(state)
}
