use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) | ApiError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(e) => {
                error!("Database error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Store failures surface their raw message
        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingParameter(param) => {
                ApiError::BadRequest(format!("Missing parameter: {}", param))
            }
            ValidationError::InvalidDate(..) => ApiError::InvalidParameter(err.to_string()),
            ValidationError::InvalidParameter(msg) => ApiError::InvalidParameter(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
