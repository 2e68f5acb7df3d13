use crate::{
    api::{created, error::ApiError, route::GroupQuery, with_total_count},
    db::player::{self, PlayerInput},
    state::AppState,
    validation::{lenient_id, require_non_empty, validate_non_negative},
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
pub struct PlayerBody {
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub group_id: String,
    #[serde(default)]
    pub name: String,
    pub nickname: Option<String>,
    pub position: Option<String>,
    pub monthly_fee: Option<f64>,
    pub active: Option<bool>,
}

impl PlayerBody {
    fn into_input(self) -> Result<PlayerInput, ApiError> {
        validate_non_negative("monthlyFee", self.monthly_fee)?;
        Ok(PlayerInput {
            group_id: require_non_empty("groupId", &self.group_id)?,
            name: require_non_empty("name", &self.name)?,
            nickname: self.nickname,
            position: self.position,
            monthly_fee: self.monthly_fee,
            active: self.active.unwrap_or(true),
        })
    }
}

// GET /api/players?groupId=
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GroupQuery>,
) -> Result<Response, ApiError> {
    let group_id = require_non_empty("groupId", params.group_id.as_deref().unwrap_or_default())?;
    let players = player::list_players(&state.db_pool, &group_id).await?;
    Ok(with_total_count(players))
}

// POST /api/players
pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PlayerBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let id = body.id.clone();
    let input = body.into_input()?;

    let created_player = player::create_player(&state.db_pool, id.as_deref(), &input).await?;
    info!("Created player {} in group {}", created_player.id, created_player.group_id);
    Ok(created(created_player))
}

// PUT /api/players/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<PlayerBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let input = body.into_input()?;

    match player::update_player(&state.db_pool, &id, &input).await? {
        Some(updated) => Ok(Json(updated).into_response()),
        None => Err(ApiError::NotFound(format!("player {}", id))),
    }
}

// DELETE /api/players/{id}
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if player::delete_player(&state.db_pool, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("player {}", id)))
    }
}
