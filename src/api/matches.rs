use crate::{
    api::{created, error::ApiError, route::GroupQuery, with_total_count},
    db::game::{self, MatchInput},
    state::AppState,
    validation::{lenient_id, parse_date, require_non_empty, validate_match_status},
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchBody {
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub group_id: String,
    pub field_id: Option<String>,
    #[serde(default)]
    pub date: String,
    pub start_time: Option<String>,
    pub status: Option<String>,
    pub team_a_score: Option<i64>,
    pub team_b_score: Option<i64>,
    pub notes: Option<String>,
}

impl MatchBody {
    fn into_input(self) -> Result<MatchInput, ApiError> {
        let date = require_non_empty("date", &self.date)?;
        Ok(MatchInput {
            group_id: require_non_empty("groupId", &self.group_id)?,
            field_id: self.field_id.filter(|f| !f.trim().is_empty()),
            date: parse_date("date", &date)?,
            start_time: self.start_time,
            status: validate_match_status(self.status.as_deref())?,
            team_a_score: self.team_a_score,
            team_b_score: self.team_b_score,
            notes: self.notes,
        })
    }
}

// GET /api/matches?groupId=
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GroupQuery>,
) -> Result<Response, ApiError> {
    let group_id = require_non_empty("groupId", params.group_id.as_deref().unwrap_or_default())?;
    let matches = game::list_matches(&state.db_pool, &group_id).await?;
    Ok(with_total_count(matches))
}

// POST /api/matches
pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Result<Json<MatchBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let id = body.id.clone();
    let input = body.into_input()?;

    let created_match = game::create_match(&state.db_pool, id.as_deref(), &input).await?;
    info!("Scheduled match {} on {}", created_match.id, created_match.date);
    Ok(created(created_match))
}

// GET /api/matches/{id}
pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    match game::get_match(&state.db_pool, &id).await? {
        Some(found) => Ok(Json(found).into_response()),
        None => Err(ApiError::NotFound(format!("match {}", id))),
    }
}

// PUT /api/matches/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<MatchBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let input = body.into_input()?;

    match game::update_match(&state.db_pool, &id, &input).await? {
        Some(updated) => Ok(Json(updated).into_response()),
        None => Err(ApiError::NotFound(format!("match {}", id))),
    }
}

// DELETE /api/matches/{id}
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if game::delete_match(&state.db_pool, &id).await? {
        info!("Deleted match {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("match {}", id)))
    }
}
