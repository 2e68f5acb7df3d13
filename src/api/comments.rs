use crate::{
    api::{created, error::ApiError, route::MatchQuery, with_total_count},
    db::comment,
    state::AppState,
    validation::{lenient_id, require_non_empty},
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentBody {
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub match_id: String,
    pub player_id: Option<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: String,
}

// GET /api/comments?matchId=
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MatchQuery>,
) -> Result<Response, ApiError> {
    let match_id = require_non_empty("matchId", params.match_id.as_deref().unwrap_or_default())?;
    let comments = comment::list_comments(&state.db_pool, &match_id).await?;
    Ok(with_total_count(comments))
}

// POST /api/comments
pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CommentBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let match_id = require_non_empty("matchId", &body.match_id)?;
    let author = require_non_empty("author", &body.author)?;
    let content = require_non_empty("content", &body.content)?;

    let created_comment = comment::create_comment(
        &state.db_pool,
        body.id.as_deref(),
        &match_id,
        body.player_id.as_deref(),
        &author,
        &content,
    )
    .await?;
    Ok(created(created_comment))
}

// DELETE /api/comments/{id}
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if comment::delete_comment(&state.db_pool, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("comment {}", id)))
    }
}
