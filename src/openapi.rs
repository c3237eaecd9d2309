//! OpenAPI document generated from the resolved model and its relations.

use crate::config::{EntityDef, Operation, ResolvedModel};
use crate::state::AppState;
use axum::{extract::State, Json};
use utoipa::openapi::{
    path::{HttpMethod, OperationBuilder, ParameterBuilder, ParameterIn, PathItem, PathItemBuilder, PathsBuilder},
    response::{Response, ResponseBuilder},
    InfoBuilder, OpenApi, OpenApiBuilder, Required,
};

pub const API_PREFIX: &str = "/api/v1";

fn response(description: &str) -> Response {
    ResponseBuilder::new().description(description).build()
}

fn query_param(name: &str, description: &str) -> utoipa::openapi::path::Parameter {
    ParameterBuilder::new()
        .name(name)
        .parameter_in(ParameterIn::Query)
        .required(Required::False)
        .description(Some(description))
        .build()
}

fn path_param(name: &str) -> utoipa::openapi::path::Parameter {
    ParameterBuilder::new()
        .name(name)
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .build()
}

fn operation(id: String, tag: &str, summary: String) -> OperationBuilder {
    OperationBuilder::new()
        .operation_id(Some(id))
        .tags(Some(vec![tag.to_string()]))
        .summary(Some(summary))
}

fn paged(op: OperationBuilder) -> OperationBuilder {
    op.parameter(query_param("offset", "rows to skip (default 0)"))
        .parameter(query_param("limit", "page size (default 10)"))
}

fn collection_item(e: &EntityDef, path: &str) -> Option<PathItem> {
    let mut item = PathItemBuilder::new();
    let mut any = false;
    if e.allows(Operation::List) {
        let op = paged(operation(format!("list_{}", path), path, format!("List {}", path)))
            .response("200", response("one page of rows"));
        item = item.operation(HttpMethod::Get, op.build());
        any = true;
    }
    if e.allows(Operation::Create) {
        let op = operation(format!("create_{}", path), path, format!("Create a {}", e.name))
            .response("201", response("created"))
            .response("422", response("validation error"));
        item = item.operation(HttpMethod::Post, op.build());
        any = true;
    }
    any.then(|| item.build())
}

fn member_item(e: &EntityDef, path: &str) -> Option<PathItem> {
    let member = [
        (Operation::Read, HttpMethod::Get, "get", "200"),
        (Operation::Update, HttpMethod::Put, "replace", "200"),
        (Operation::Patch, HttpMethod::Patch, "patch", "200"),
        (Operation::Delete, HttpMethod::Delete, "delete", "204"),
    ];
    let mut item = PathItemBuilder::new();
    let mut any = false;
    for (op, method, verb, ok) in member {
        if !e.allows(op) {
            continue;
        }
        let built = operation(format!("{}_{}", verb, path), path, format!("{} a {}", verb, e.name))
            .parameter(path_param("id"))
            .response(ok, response("success"))
            .response("404", response(&format!("{} not found", e.name)))
            .build();
        item = item.operation(method, built);
        any = true;
    }
    any.then(|| item.build())
}

/// Document every routed collection, its registered child collections and search.
pub fn build_openapi(model: &ResolvedModel) -> OpenApi {
    let mut paths = PathsBuilder::new();
    for e in model.routed() {
        let Some(path) = e.path else { continue };
        if let Some(item) = collection_item(e, path) {
            paths = paths.path(format!("{}/{}", API_PREFIX, path), item);
        }
        if let Some(item) = member_item(e, path) {
            paths = paths.path(format!("{}/{}/{{id}}", API_PREFIX, path), item);
        }
        for rel in model.relations_of(e) {
            let op = paged(operation(
                format!("list_{}_{}", path, rel.segment),
                path,
                format!("List {} of a {}", rel.segment, e.name),
            ))
            .parameter(path_param("id"))
            .response("200", response("one page of child rows"));
            paths = paths.path(
                format!("{}/{}/{{id}}/{}", API_PREFIX, path, rel.segment),
                PathItem::new(HttpMethod::Get, op.build()),
            );
        }
    }

    let search = operation("search".into(), "search", "Full-text phrase search".into())
        .parameter(path_param("scope"))
        .parameter(query_param("query", "phrase to match"))
        .parameter(query_param("table_name", "restrict to one table"))
        .parameter(query_param("column_name", "restrict to one column"))
        .parameter(query_param("offset", "hits to skip (default 0)"))
        .parameter(query_param("limit", "page size (default 10)"))
        .response("200", response("matching index entries ordered by rank"))
        .response("422", response("empty query"))
        .build();
    paths = paths.path(
        format!("{}/{{scope}}/search", API_PREFIX),
        PathItem::new(HttpMethod::Get, search),
    );

    OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title(env!("CARGO_PKG_NAME"))
                .version(env!("CARGO_PKG_VERSION"))
                .build(),
        )
        .paths(paths.build())
        .build()
}

pub async fn openapi_json(State(state): State<AppState>) -> Json<OpenApi> {
    Json(build_openapi(&state.model))
}
