use crate::{
    api::{created, error::ApiError, route::GroupQuery, with_total_count},
    db::field,
    state::AppState,
    validation::{lenient_id, require_non_empty, validate_non_negative},
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
pub struct FieldBody {
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub group_id: String,
    #[serde(default)]
    pub name: String,
    pub address: Option<String>,
    pub hourly_rate: Option<f64>,
}

// GET /api/fields?groupId=
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GroupQuery>,
) -> Result<Response, ApiError> {
    let group_id = require_non_empty("groupId", params.group_id.as_deref().unwrap_or_default())?;
    let fields = field::list_fields(&state.db_pool, &group_id).await?;
    Ok(with_total_count(fields))
}

// POST /api/fields
pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Result<Json<FieldBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let group_id = require_non_empty("groupId", &body.group_id)?;
    let name = require_non_empty("name", &body.name)?;
    validate_non_negative("hourlyRate", body.hourly_rate)?;

    let created_field = field::create_field(
        &state.db_pool,
        body.id.as_deref(),
        &group_id,
        &name,
        body.address.as_deref(),
        body.hourly_rate,
    )
    .await?;
    Ok(created(created_field))
}

// DELETE /api/fields/{id}
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if field::delete_field(&state.db_pool, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("field {}", id)))
    }
}
