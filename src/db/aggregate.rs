//! Aggregate ledger rows: one mutable `transactions` row per period key.
//!
//! Match revenue is a last-write-wins replace. Monthly fees accumulate, with
//! each (row, player) pair counted once. The `transaction_contributions`
//! primary key enforces this inside the same store transaction that bumps
//! the amount, so concurrent contributions cannot double-count.

use chrono::{Datelike, NaiveDate};
use sqlx::AnyPool;
use tracing::{debug, info};

use crate::db::now_timestamp;
use crate::models::{
    MonthlyOutcome, TransactionType, CATEGORY_MATCH_REVENUE, CATEGORY_MONTHLY_FEE,
};
use crate::validation::first_of_month;

pub const MATCH_REVENUE_DESCRIPTION: &str = "Match revenue";
pub const MONTHLY_FEES_DESCRIPTION: &str = "Monthly fees";

#[derive(Debug, Clone)]
pub struct MatchRevenue {
    pub group_id: String,
    pub match_id: String,
    pub total_amount: f64,
    pub description: Option<String>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct MonthlyFee {
    pub group_id: String,
    pub player_id: String,
    pub amount: f64,
    pub date: NaiveDate,
}

pub const MATCH_AGGREGATE_PREFIX: &str = "match_agg_";
pub const MONTHLY_AGGREGATE_PREFIX: &str = "monthly_agg_";

pub fn match_aggregate_id(group_id: &str, match_id: &str) -> String {
    format!("{}{}_{}", MATCH_AGGREGATE_PREFIX, group_id, match_id)
}

/// Any date in the month maps to the same id.
pub fn monthly_aggregate_id(group_id: &str, date: NaiveDate) -> String {
    let period = first_of_month(date);
    format!(
        "{}{}_{}_{:02}",
        MONTHLY_AGGREGATE_PREFIX,
        group_id,
        period.year(),
        period.month()
    )
}

/// Ids in the aggregate namespace belong to the upserts below only.
pub fn is_aggregate_id(id: &str) -> bool {
    id.starts_with(MATCH_AGGREGATE_PREFIX) || id.starts_with(MONTHLY_AGGREGATE_PREFIX)
}

/// Inserts or fully replaces the match revenue row. Returns the row id.
pub async fn upsert_match_revenue(
    pool: &AnyPool,
    revenue: &MatchRevenue,
) -> Result<String, sqlx::Error> {
    let id = match_aggregate_id(&revenue.group_id, &revenue.match_id);
    let description = revenue
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(MATCH_REVENUE_DESCRIPTION);

    sqlx::query(
        "INSERT INTO transactions
            (id, group_id, description, amount, type, date, category, related_match_id, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         ON CONFLICT(id) DO UPDATE SET
            group_id = excluded.group_id,
            amount = excluded.amount,
            description = excluded.description,
            date = excluded.date,
            type = excluded.type,
            category = excluded.category,
            related_match_id = excluded.related_match_id,
            player_id = NULL",
    )
    .bind(&id)
    .bind(&revenue.group_id)
    .bind(description)
    .bind(revenue.total_amount)
    .bind(TransactionType::Income.as_str())
    .bind(revenue.date.to_string())
    .bind(CATEGORY_MATCH_REVENUE)
    .bind(&revenue.match_id)
    .bind(now_timestamp())
    .execute(pool)
    .await?;

    info!(
        "Match revenue {} set to {} for group {}",
        id, revenue.total_amount, revenue.group_id
    );
    Ok(id)
}

/// Adds a player's fee to the group's row for that month, once.
pub async fn upsert_monthly_fee(
    pool: &AnyPool,
    fee: &MonthlyFee,
) -> Result<MonthlyOutcome, sqlx::Error> {
    let id = monthly_aggregate_id(&fee.group_id, fee.date);
    let period = first_of_month(fee.date);
    let now = now_timestamp();

    let mut tx = pool.begin().await?;

    // A row under this id that is not a monthly aggregate has no
    // contributions, so it is taken over with its amount reset to 0.
    sqlx::query(
        "INSERT INTO transactions
            (id, group_id, description, amount, type, date, category, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         ON CONFLICT(id) DO UPDATE SET
            group_id = excluded.group_id,
            description = excluded.description,
            date = excluded.date,
            type = excluded.type,
            category = excluded.category,
            related_match_id = NULL,
            player_id = NULL,
            amount = CASE WHEN transactions.category = $9 THEN transactions.amount ELSE 0 END",
    )
    .bind(&id)
    .bind(&fee.group_id)
    .bind(MONTHLY_FEES_DESCRIPTION)
    .bind(0.0_f64)
    .bind(TransactionType::Income.as_str())
    .bind(period.to_string())
    .bind(CATEGORY_MONTHLY_FEE)
    .bind(&now)
    .bind(CATEGORY_MONTHLY_FEE)
    .execute(&mut *tx)
    .await?;

    let inserted = sqlx::query(
        "INSERT INTO transaction_contributions (transaction_id, player_id, amount, created_at)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT(transaction_id, player_id) DO NOTHING",
    )
    .bind(&id)
    .bind(&fee.player_id)
    .bind(fee.amount)
    .bind(&now)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if inserted == 0 {
        tx.rollback().await?;
        debug!("Player {} already counted in {}", fee.player_id, id);
        return Ok(MonthlyOutcome::AlreadyPaid);
    }

    sqlx::query("UPDATE transactions SET amount = amount + $1 WHERE id = $2")
        .bind(fee.amount)
        .bind(&id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(
        "Monthly fee of {} from player {} added to {}",
        fee.amount, fee.player_id, id
    );
    Ok(MonthlyOutcome::Recorded)
}
