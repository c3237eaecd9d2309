//! Standard response envelope helpers.
//!
//! Handlers emit `{"meta_data": {...}, "response": ..., "total_count"?: n}`; the metadata
//! middleware then fills in location and pagination fields.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetaData {
    pub status_code: u16,
    pub status_message: String,
}

impl MetaData {
    pub fn for_status(status: StatusCode) -> Self {
        MetaData {
            status_code: status.as_u16(),
            status_message: status_description(status).to_string(),
        }
    }
}

/// Long-form status description. Unlisted codes fall back to the reason phrase.
pub fn status_description(status: StatusCode) -> &'static str {
    match status {
        StatusCode::OK => "Request fulfilled, document follows",
        StatusCode::CREATED => "Document created, URL follows",
        StatusCode::NO_CONTENT => "Request fulfilled, nothing follows",
        StatusCode::BAD_REQUEST => "Bad request syntax or unsupported method",
        StatusCode::NOT_FOUND => "Nothing matches the given URI",
        StatusCode::CONFLICT => "Request conflict",
        StatusCode::PAYLOAD_TOO_LARGE => "Entity is too large",
        StatusCode::INTERNAL_SERVER_ERROR => "Server got itself in trouble",
        StatusCode::SERVICE_UNAVAILABLE => "The server cannot process the request due to a high load",
        other => other.canonical_reason().unwrap_or_default(),
    }
}

#[derive(Serialize)]
pub struct SuccessOne<T> {
    pub meta_data: MetaData,
    pub response: T,
}

#[derive(Serialize)]
pub struct SuccessMany<T> {
    pub meta_data: MetaData,
    pub response: Vec<T>,
    pub total_count: i64,
}

pub fn success_one<T: Serialize>(response: T) -> (StatusCode, Json<SuccessOne<T>>) {
    one(StatusCode::CREATED, response)
}

pub fn success_one_ok<T: Serialize>(response: T) -> (StatusCode, Json<SuccessOne<T>>) {
    one(StatusCode::OK, response)
}

fn one<T: Serialize>(status: StatusCode, response: T) -> (StatusCode, Json<SuccessOne<T>>) {
    (
        status,
        Json(SuccessOne {
            meta_data: MetaData::for_status(status),
            response,
        }),
    )
}

/// A page of rows with the total across all pages.
pub fn success_many<T: Serialize>(response: Vec<T>, total_count: i64) -> (StatusCode, Json<SuccessMany<T>>) {
    (
        StatusCode::OK,
        Json(SuccessMany {
            meta_data: MetaData::for_status(StatusCode::OK),
            response,
            total_count,
        }),
    )
}
