use sqlx::AnyPool;

use crate::db::{now_timestamp, resolve_id};
use crate::models::Player;

const SELECT_PLAYER: &str =
    "SELECT id, group_id, name, nickname, position, monthly_fee, active, created_at FROM players";

#[derive(Debug, Clone)]
pub struct PlayerInput {
    pub group_id: String,
    pub name: String,
    pub nickname: Option<String>,
    pub position: Option<String>,
    pub monthly_fee: Option<f64>,
    pub active: bool,
}

pub async fn create_player(
    pool: &AnyPool,
    id: Option<&str>,
    input: &PlayerInput,
) -> Result<Player, sqlx::Error> {
    let id = resolve_id(id);

    sqlx::query(
        "INSERT INTO players (id, group_id, name, nickname, position, monthly_fee, active, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(&id)
    .bind(&input.group_id)
    .bind(&input.name)
    .bind(input.nickname.as_deref())
    .bind(input.position.as_deref())
    .bind(input.monthly_fee)
    .bind(i64::from(input.active))
    .bind(now_timestamp())
    .execute(pool)
    .await?;

    get_player(pool, &id).await?.ok_or(sqlx::Error::RowNotFound)
}

pub async fn get_player(pool: &AnyPool, id: &str) -> Result<Option<Player>, sqlx::Error> {
    let sql = format!("{} WHERE id = $1", SELECT_PLAYER);
    sqlx::query_as::<_, Player>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_players(pool: &AnyPool, group_id: &str) -> Result<Vec<Player>, sqlx::Error> {
    let sql = format!("{} WHERE group_id = $1 ORDER BY name, id", SELECT_PLAYER);
    sqlx::query_as::<_, Player>(&sql)
        .bind(group_id)
        .fetch_all(pool)
        .await
}

pub async fn update_player(
    pool: &AnyPool,
    id: &str,
    input: &PlayerInput,
) -> Result<Option<Player>, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE players
         SET group_id = $1, name = $2, nickname = $3, position = $4, monthly_fee = $5, active = $6
         WHERE id = $7",
    )
    .bind(&input.group_id)
    .bind(&input.name)
    .bind(input.nickname.as_deref())
    .bind(input.position.as_deref())
    .bind(input.monthly_fee)
    .bind(i64::from(input.active))
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_player(pool, id).await
}

pub async fn delete_player(pool: &AnyPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM players WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
