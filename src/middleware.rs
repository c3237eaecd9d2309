//! Response metadata: every enveloped JSON response gets `meta_data` with its status,
//! plus `location` for writes and pagination for lists.

use crate::response::MetaData;
use axum::{
    body::{to_bytes, Body},
    extract::{Query, Request},
    http::{header, HeaderValue, Method, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const DEFAULT_OFFSET: u64 = 0;
pub const DEFAULT_LIMIT: u64 = 10;

const PASSTHROUGH_PATHS: &[&str] = &["/openapi.json"];

/// What the metadata depends on from the request.
#[derive(Clone, Debug)]
pub struct RequestInfo {
    pub method: Method,
    pub uri: Uri,
    pub host: Option<String>,
}

impl RequestInfo {
    /// The request URL as the client addressed it.
    pub fn url(&self) -> String {
        match &self.host {
            Some(host) => format!("http://{}{}", host, self.uri),
            None => self.uri.to_string(),
        }
    }

    fn url_without_query(&self) -> String {
        match &self.host {
            Some(host) => format!("http://{}{}", host, self.uri.path()),
            None => self.uri.path().to_string(),
        }
    }

    fn last_segment(&self) -> &str {
        self.uri.path().trim_end_matches('/').rsplit('/').next().unwrap_or_default()
    }
}

pub async fn response_metadata(req: Request, next: Next) -> Response {
    let info = RequestInfo {
        method: req.method().clone(),
        uri: req.uri().clone(),
        host: req
            .headers()
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .map(str::to_owned),
    };
    let res = next.run(req).await;
    if PASSTHROUGH_PATHS.contains(&info.uri.path()) || !is_json(&res) {
        return res;
    }

    let (mut parts, body) = res.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::error!(error = %e, "failed to buffer response body");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    let body = match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) if map.contains_key("response") => map,
        _ => return Response::from_parts(parts, Body::from(bytes)),
    };

    let rewritten = build_response_data(&info, parts.status, body);
    let out = match serde_json::to_vec(&Value::Object(rewritten)) {
        Ok(out) => out,
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response body");
            return Response::from_parts(parts, Body::from(bytes));
        }
    };
    parts.headers.insert(header::CONTENT_LENGTH, HeaderValue::from(out.len()));
    Response::from_parts(parts, Body::from(out))
}

fn is_json(res: &Response) -> bool {
    res.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct == "application/json")
}

fn base_meta(status: StatusCode) -> Map<String, Value> {
    let meta = MetaData::for_status(status);
    let mut m = Map::new();
    m.insert("status_code".into(), meta.status_code.into());
    m.insert("status_message".into(), meta.status_message.into());
    m
}

/// Rewrites an enveloped body: sets `meta_data` by method and payload shape.
/// List bodies have their `total_count` moved into the metadata.
pub fn build_response_data(req: &RequestInfo, status: StatusCode, mut body: Map<String, Value>) -> Map<String, Value> {
    let mut meta = base_meta(status);
    let method = &req.method;
    if method == Method::POST {
        if let Some(id) = body.get("response").and_then(|r| r.get("id")) {
            meta.insert("location".into(), created_location(req, id).into());
        }
    } else if method == Method::PUT || method == Method::PATCH {
        meta.insert("location".into(), req.url().into());
    } else if method == Method::GET && body.get("response").is_some_and(Value::is_array) {
        let total = body.remove("total_count");
        if let Some(paged) = pagination_meta(req, total.as_ref(), status) {
            meta = paged;
        }
    }
    body.insert("meta_data".into(), Value::Object(meta));
    body
}

fn created_location(req: &RequestInfo, id: &Value) -> String {
    let mut url = req.url_without_query();
    if !url.ends_with('/') {
        url.push('/');
    }
    match id {
        Value::String(s) => url.push_str(s),
        other => url.push_str(&other.to_string()),
    }
    url
}

/// None when any input is unusable; callers fall back to base metadata.
fn pagination_meta(req: &RequestInfo, total: Option<&Value>, status: StatusCode) -> Option<Map<String, Value>> {
    let Query(params) = Query::<HashMap<String, String>>::try_from_uri(&req.uri).ok()?;
    let number = |key: &str, default: u64| match params.get(key) {
        Some(raw) => raw.trim().parse::<u64>().ok(),
        None => Some(default),
    };
    let offset = number("offset", DEFAULT_OFFSET)?;
    let limit = number("limit", DEFAULT_LIMIT)?;
    if limit == 0 {
        return None;
    }
    let total_count = match total {
        Some(t) => t.as_u64()?,
        None => 0,
    };
    let page = offset / limit + 1;
    let page_count = total_count.div_ceil(limit);

    let mut meta = base_meta(status);
    if page_count == 0 {
        meta.insert(
            "status_message".into(),
            format!("No {} found", req.last_segment()).into(),
        );
    }
    meta.insert("offset".into(), offset.into());
    meta.insert("limit".into(), limit.into());
    meta.insert("page".into(), page.into());
    meta.insert("page_count".into(), page_count.into());
    meta.insert("total_count".into(), total_count.into());
    Some(meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn req(method: Method, uri: &str) -> RequestInfo {
        RequestInfo {
            method,
            uri: uri.parse().unwrap(),
            host: Some("localhost:3000".into()),
        }
    }

    fn body(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn list_pagination_math() {
        let out = build_response_data(
            &req(Method::GET, "/api/v1/tracks?offset=20&limit=10"),
            StatusCode::OK,
            body(json!({"response": [{"id": 21}], "total_count": 25})),
        );
        assert!(out.get("total_count").is_none());
        assert_eq!(
            out["meta_data"],
            json!({
                "status_code": 200,
                "status_message": "Request fulfilled, document follows",
                "offset": 20,
                "limit": 10,
                "page": 3,
                "page_count": 3,
                "total_count": 25
            })
        );
    }

    #[test]
    fn defaults_apply_without_query() {
        let out = build_response_data(
            &req(Method::GET, "/api/v1/artists"),
            StatusCode::OK,
            body(json!({"response": [], "total_count": 11})),
        );
        assert_eq!(out["meta_data"]["page"], 1);
        assert_eq!(out["meta_data"]["page_count"], 2);
        assert_eq!(out["meta_data"]["offset"], 0);
        assert_eq!(out["meta_data"]["limit"], 10);
    }

    #[test]
    fn missing_total_counts_as_empty() {
        let out = build_response_data(
            &req(Method::GET, "/api/v1/genres?limit=5"),
            StatusCode::OK,
            body(json!({"response": []})),
        );
        assert_eq!(out["meta_data"]["total_count"], 0);
        assert_eq!(out["meta_data"]["page_count"], 0);
        assert_eq!(out["meta_data"]["limit"], 5);
        assert_eq!(out["meta_data"]["status_message"], "No genres found");
    }

    #[test]
    fn empty_list_names_the_collection() {
        let out = build_response_data(
            &req(Method::GET, "/api/v1/artists/7/albums/"),
            StatusCode::OK,
            body(json!({"response": [], "total_count": 0})),
        );
        assert_eq!(out["meta_data"]["status_message"], "No albums found");
        assert_eq!(out["meta_data"]["page_count"], 0);
    }

    #[test]
    fn unusable_paging_degrades_to_base_meta() {
        for uri in ["/api/v1/tracks?limit=0", "/api/v1/tracks?offset=abc"] {
            let out = build_response_data(
                &req(Method::GET, uri),
                StatusCode::OK,
                body(json!({"response": [], "total_count": 4})),
            );
            assert_eq!(out["meta_data"], json!({"status_code": 200, "status_message": "Request fulfilled, document follows"}));
        }
    }

    #[test]
    fn post_location_appends_created_id() {
        let out = build_response_data(
            &req(Method::POST, "/api/v1/artists?x=1"),
            StatusCode::CREATED,
            body(json!({"response": {"id": 276, "name": "New"}})),
        );
        assert_eq!(out["meta_data"]["location"], "http://localhost:3000/api/v1/artists/276");
        assert_eq!(out["meta_data"]["status_message"], "Document created, URL follows");

        let trailing = build_response_data(
            &req(Method::POST, "/api/v1/artists/"),
            StatusCode::CREATED,
            body(json!({"response": {"id": 5}})),
        );
        assert_eq!(trailing["meta_data"]["location"], "http://localhost:3000/api/v1/artists/5");
    }

    #[test]
    fn put_and_patch_location_is_request_url() {
        for method in [Method::PUT, Method::PATCH] {
            let out = build_response_data(
                &req(method, "/api/v1/genres/3"),
                StatusCode::OK,
                body(json!({"response": {"id": 3}})),
            );
            assert_eq!(out["meta_data"]["location"], "http://localhost:3000/api/v1/genres/3");
        }
    }

    #[test]
    fn get_one_has_base_meta_only() {
        let out = build_response_data(
            &req(Method::GET, "/api/v1/genres/3"),
            StatusCode::OK,
            body(json!({"response": {"id": 3}})),
        );
        assert_eq!(out["meta_data"], json!({"status_code": 200, "status_message": "Request fulfilled, document follows"}));
    }
}
