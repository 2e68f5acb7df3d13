use sqlx::AnyPool;

use crate::db::{now_timestamp, resolve_id};
use crate::models::Group;

pub async fn create_group(
    pool: &AnyPool,
    id: Option<&str>,
    name: &str,
    description: Option<&str>,
) -> Result<Group, sqlx::Error> {
    let id = resolve_id(id);

    sqlx::query(
        "INSERT INTO sport_groups (id, name, description, created_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(&id)
    .bind(name)
    .bind(description)
    .bind(now_timestamp())
    .execute(pool)
    .await?;

    get_group(pool, &id).await?.ok_or(sqlx::Error::RowNotFound)
}

pub async fn get_group(pool: &AnyPool, id: &str) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>(
        "SELECT id, name, description, created_at FROM sport_groups WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_groups(pool: &AnyPool) -> Result<Vec<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>(
        "SELECT id, name, description, created_at FROM sport_groups ORDER BY name, id",
    )
    .fetch_all(pool)
    .await
}

pub async fn update_group(
    pool: &AnyPool,
    id: &str,
    name: &str,
    description: Option<&str>,
) -> Result<Option<Group>, sqlx::Error> {
    let result = sqlx::query("UPDATE sport_groups SET name = $1, description = $2 WHERE id = $3")
        .bind(name)
        .bind(description)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_group(pool, id).await
}

/// Players, fields, matches and transactions go with the group.
pub async fn delete_group(pool: &AnyPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sport_groups WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
