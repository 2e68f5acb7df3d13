use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::{AnyPool, Row};

use crate::db::{now_timestamp, resolve_id};
use crate::models::{Transaction, TransactionType};

const SELECT_TRANSACTION: &str = "SELECT id, group_id, description, amount, type, date, category,
        related_match_id, player_id, created_at
    FROM transactions";

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub group_id: String,
    /// Inclusive lower bound on `date`.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on `date`.
    pub to: Option<NaiveDate>,
    pub category: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub id: Option<String>,
    pub group_id: String,
    pub description: String,
    pub amount: f64,
    pub kind: TransactionType,
    pub date: NaiveDate,
    pub category: Option<String>,
    pub related_match_id: Option<String>,
    pub player_id: Option<String>,
}

pub async fn create_transaction(
    pool: &AnyPool,
    new: &NewTransaction,
) -> Result<Transaction, sqlx::Error> {
    let id = resolve_id(new.id.as_deref());

    sqlx::query(
        "INSERT INTO transactions
            (id, group_id, description, amount, type, date, category, related_match_id, player_id, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(&id)
    .bind(&new.group_id)
    .bind(&new.description)
    .bind(new.amount)
    .bind(new.kind.as_str())
    .bind(new.date.to_string())
    .bind(new.category.as_deref())
    .bind(new.related_match_id.as_deref())
    .bind(new.player_id.as_deref())
    .bind(now_timestamp())
    .execute(pool)
    .await?;

    get_transaction(pool, &id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

pub async fn get_transaction(pool: &AnyPool, id: &str) -> Result<Option<Transaction>, sqlx::Error> {
    let sql = format!("{} WHERE id = $1", SELECT_TRANSACTION);
    let transaction = sqlx::query_as::<_, Transaction>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    let Some(mut transaction) = transaction else {
        return Ok(None);
    };
    transaction.paid_player_ids = contributor_ids(pool, id).await?;
    Ok(Some(transaction))
}

/// Lists a group's transactions, newest date first, with contributors attached.
pub async fn list_transactions(
    pool: &AnyPool,
    filter: &TransactionFilter,
) -> Result<Vec<Transaction>, sqlx::Error> {
    let mut sql = format!("{} WHERE group_id = $1", SELECT_TRANSACTION);
    let mut binds = vec![filter.group_id.clone()];

    if let Some(from) = filter.from {
        binds.push(from.to_string());
        sql.push_str(&format!(" AND date >= ${}", binds.len()));
    }
    if let Some(to) = filter.to {
        binds.push(to.to_string());
        sql.push_str(&format!(" AND date <= ${}", binds.len()));
    }
    if let Some(category) = &filter.category {
        binds.push(category.clone());
        sql.push_str(&format!(" AND category = ${}", binds.len()));
    }
    sql.push_str(" ORDER BY date DESC, created_at DESC, id");

    let mut query = sqlx::query_as::<_, Transaction>(&sql);
    for value in &binds {
        query = query.bind(value);
    }
    let mut transactions = query.fetch_all(pool).await?;

    let mut contributors = group_contributor_ids(pool, &filter.group_id).await?;
    for transaction in &mut transactions {
        if let Some(ids) = contributors.remove(&transaction.id) {
            transaction.paid_player_ids = ids;
        }
    }

    Ok(transactions)
}

/// Player ids counted in an aggregate row, in the order they contributed.
pub async fn contributor_ids(pool: &AnyPool, transaction_id: &str) -> Result<Vec<String>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT player_id FROM transaction_contributions
         WHERE transaction_id = $1
         ORDER BY created_at, player_id",
    )
    .bind(transaction_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| row.try_get::<String, _>("player_id"))
        .collect()
}

async fn group_contributor_ids(
    pool: &AnyPool,
    group_id: &str,
) -> Result<HashMap<String, Vec<String>>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT c.transaction_id, c.player_id
         FROM transaction_contributions c
         JOIN transactions t ON t.id = c.transaction_id
         WHERE t.group_id = $1
         ORDER BY c.created_at, c.player_id",
    )
    .bind(group_id)
    .fetch_all(pool)
    .await?;

    let mut by_transaction: HashMap<String, Vec<String>> = HashMap::new();
    for row in rows {
        let transaction_id: String = row.try_get("transaction_id")?;
        let player_id: String = row.try_get("player_id")?;
        by_transaction.entry(transaction_id).or_default().push(player_id);
    }
    Ok(by_transaction)
}

/// Returns false when no row had that id.
pub async fn delete_transaction(pool: &AnyPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
