use crate::{
    api::{created, error::ApiError, with_total_count},
    db::{
        aggregate::{self, is_aggregate_id, MatchRevenue, MonthlyFee},
        transaction::{self, NewTransaction, TransactionFilter},
    },
    models::MonthlyOutcome,
    state::AppState,
    validation::{
        date_or_today, lenient_amount, lenient_id, parse_date, require_non_empty,
        validate_transaction_type,
    },
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

// GET /api/transactions query parameters
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsQuery {
    pub group_id: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub category: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBody {
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub group_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub date: Option<String>,
    pub category: Option<String>,
    pub related_match_id: Option<String>,
    pub player_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertMatchBody {
    #[serde(default, deserialize_with = "lenient_id")]
    pub group_id: String,
    #[serde(default, deserialize_with = "lenient_id")]
    pub match_id: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total_amount: f64,
    pub description: Option<String>,
    pub date: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertMonthlyBody {
    #[serde(default, deserialize_with = "lenient_id")]
    pub group_id: String,
    #[serde(default, deserialize_with = "lenient_id")]
    pub player_id: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    pub date: Option<String>,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn optional_date(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => Ok(Some(parse_date(name, value)?)),
        None => Ok(None),
    }
}

// GET /api/transactions?groupId=&from=&to=&category=
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionsQuery>,
) -> Result<Response, ApiError> {
    let filter = TransactionFilter {
        group_id: require_non_empty("groupId", params.group_id.as_deref().unwrap_or_default())?,
        from: optional_date("from", params.from.as_deref())?,
        to: optional_date("to", params.to.as_deref())?,
        category: params.category.filter(|c| !c.trim().is_empty()),
    };

    if let (Some(from), Some(to)) = (filter.from, filter.to) {
        if from > to {
            return Err(ApiError::InvalidParameter(
                "from must not be after to".to_string(),
            ));
        }
    }

    let transactions = transaction::list_transactions(&state.db_pool, &filter).await?;
    Ok(with_total_count(transactions))
}

// POST /api/transactions
pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TransactionBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;

    if let Some(id) = body.id.as_deref().map(str::trim) {
        if is_aggregate_id(id) {
            return Err(ApiError::InvalidParameter(format!(
                "id '{}' is reserved for aggregate rows",
                id
            )));
        }
    }

    let new = NewTransaction {
        id: body.id,
        group_id: require_non_empty("groupId", &body.group_id)?,
        description: require_non_empty("description", &body.description)?,
        amount: body.amount,
        kind: validate_transaction_type(&body.kind)?,
        date: date_or_today("date", body.date.as_deref(), today())?,
        category: body.category.filter(|c| !c.trim().is_empty()),
        related_match_id: body.related_match_id,
        player_id: body.player_id,
    };

    let created_transaction = transaction::create_transaction(&state.db_pool, &new).await?;
    info!(
        "Recorded {} of {} for group {}",
        created_transaction.kind, created_transaction.amount, created_transaction.group_id
    );
    Ok(created(created_transaction))
}

// DELETE /api/transactions/{id}
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if transaction::delete_transaction(&state.db_pool, &id).await? {
        info!("Deleted transaction {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("transaction {}", id)))
    }
}

// POST /api/transactions/upsert_match handler
pub async fn upsert_match(
    State(state): State<Arc<AppState>>,
    body: Result<Json<UpsertMatchBody>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = body?;

    let revenue = MatchRevenue {
        group_id: require_non_empty("groupId", &body.group_id)?,
        match_id: require_non_empty("matchId", &body.match_id)?,
        total_amount: body.total_amount,
        description: body.description,
        date: date_or_today("date", body.date.as_deref(), today())?,
    };

    aggregate::upsert_match_revenue(&state.db_pool, &revenue).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/transactions/upsert_monthly handler
pub async fn upsert_monthly(
    State(state): State<Arc<AppState>>,
    body: Result<Json<UpsertMonthlyBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body?;

    let fee = MonthlyFee {
        group_id: require_non_empty("groupId", &body.group_id)?,
        player_id: require_non_empty("playerId", &body.player_id)?,
        amount: body.amount,
        date: date_or_today("date", body.date.as_deref(), today())?,
    };

    let response = match aggregate::upsert_monthly_fee(&state.db_pool, &fee).await? {
        MonthlyOutcome::Recorded => json!({ "ok": true }),
        MonthlyOutcome::AlreadyPaid => json!({ "ok": true, "status": "already_paid" }),
    };
    Ok(Json(response))
}
