use crate::{
    api::{comments, error::ApiError, fields, groups, matches, players, transactions},
    state::AppState,
};
use axum::{
    extract::State,
    http::HeaderValue,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

// GET list endpoints scoped to a group
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupQuery {
    pub group_id: Option<String>,
}

// GET /api/comments query parameters
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchQuery {
    pub match_id: Option<String>,
}

// Create router with all routes
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let cors = cors_layer(app_state.config.cors_allowed_origin.as_deref());

    Router::new()
        .route("/api/health", get(health))
        .route("/api/groups", get(groups::list).post(groups::create))
        .route(
            "/api/groups/{id}",
            get(groups::show).put(groups::update).delete(groups::remove),
        )
        .route("/api/players", get(players::list).post(players::create))
        .route("/api/players/{id}", delete(players::remove).put(players::update))
        .route("/api/fields", get(fields::list).post(fields::create))
        .route("/api/fields/{id}", delete(fields::remove))
        .route("/api/matches", get(matches::list).post(matches::create))
        .route(
            "/api/matches/{id}",
            get(matches::show).put(matches::update).delete(matches::remove),
        )
        .route("/api/comments", get(comments::list).post(comments::create))
        .route("/api/comments/{id}", delete(comments::remove))
        .route(
            "/api/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route("/api/transactions/upsert_match", post(transactions::upsert_match))
        .route("/api/transactions/upsert_monthly", post(transactions::upsert_monthly))
        .route("/api/transactions/{id}", delete(transactions::remove))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(_)) => {
            warn!("CORS_ALLOWED_ORIGIN is not a valid header value, allowing any origin");
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}

// GET /api/health handler
async fn health(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    sqlx::query("SELECT 1").execute(&state.db_pool).await?;
    Ok(Json(json!({ "status": "ok" })))
}
