use crate::{
    api::{created, error::ApiError, with_total_count},
    db::group,
    state::AppState,
    validation::{require_non_empty, validate_group_id},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupBody {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

// GET /api/groups
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let groups = group::list_groups(&state.db_pool).await?;
    Ok(with_total_count(groups))
}

// POST /api/groups
pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GroupBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let name = require_non_empty("name", &body.name)?;
    if let Some(id) = body.id.as_deref() {
        validate_group_id(id.trim())?;
    }

    let created_group = group::create_group(
        &state.db_pool,
        body.id.as_deref(),
        &name,
        body.description.as_deref(),
    )
    .await?;

    info!("Created group {}", created_group.id);
    Ok(created(created_group))
}

// GET /api/groups/{id}
pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    match group::get_group(&state.db_pool, &id).await? {
        Some(found) => Ok(Json(found).into_response()),
        None => Err(ApiError::NotFound(format!("group {}", id))),
    }
}

// PUT /api/groups/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<GroupBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let name = require_non_empty("name", &body.name)?;

    match group::update_group(&state.db_pool, &id, &name, body.description.as_deref()).await? {
        Some(updated) => Ok(Json(updated).into_response()),
        None => Err(ApiError::NotFound(format!("group {}", id))),
    }
}

// DELETE /api/groups/{id}
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if group::delete_group(&state.db_pool, &id).await? {
        info!("Deleted group {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("group {}", id)))
    }
}
