use sqlx::AnyPool;

use crate::db::{now_timestamp, resolve_id};
use crate::models::Field;

pub async fn create_field(
    pool: &AnyPool,
    id: Option<&str>,
    group_id: &str,
    name: &str,
    address: Option<&str>,
    hourly_rate: Option<f64>,
) -> Result<Field, sqlx::Error> {
    let id = resolve_id(id);

    sqlx::query(
        "INSERT INTO fields (id, group_id, name, address, hourly_rate, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(&id)
    .bind(group_id)
    .bind(name)
    .bind(address)
    .bind(hourly_rate)
    .bind(now_timestamp())
    .execute(pool)
    .await?;

    sqlx::query_as::<_, Field>(
        "SELECT id, group_id, name, address, hourly_rate, created_at FROM fields WHERE id = $1",
    )
    .bind(&id)
    .fetch_one(pool)
    .await
}

pub async fn list_fields(pool: &AnyPool, group_id: &str) -> Result<Vec<Field>, sqlx::Error> {
    sqlx::query_as::<_, Field>(
        "SELECT id, group_id, name, address, hourly_rate, created_at
         FROM fields WHERE group_id = $1 ORDER BY name, id",
    )
    .bind(group_id)
    .fetch_all(pool)
    .await
}

/// Matches played there keep their row with `field_id` cleared.
pub async fn delete_field(pool: &AnyPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM fields WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
