use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");

/// A JSON array body plus its length in `X-Total-Count`.
pub fn with_total_count<T: Serialize>(data: Vec<T>) -> Response {
    let count = HeaderValue::from(data.len());
    ([(TOTAL_COUNT_HEADER, count)], Json(data)).into_response()
}

pub fn created<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}
