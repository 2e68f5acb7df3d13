// Matches; the module is named `game` because `match` is a keyword

use chrono::NaiveDate;
use sqlx::AnyPool;

use crate::db::{now_timestamp, resolve_id};
use crate::models::{Match, MatchStatus};

const SELECT_MATCH: &str = "SELECT id, group_id, field_id, date, start_time, status,
        team_a_score, team_b_score, notes, created_at
    FROM matches";

#[derive(Debug, Clone)]
pub struct MatchInput {
    pub group_id: String,
    pub field_id: Option<String>,
    pub date: NaiveDate,
    pub start_time: Option<String>,
    pub status: MatchStatus,
    pub team_a_score: Option<i64>,
    pub team_b_score: Option<i64>,
    pub notes: Option<String>,
}

pub async fn create_match(
    pool: &AnyPool,
    id: Option<&str>,
    input: &MatchInput,
) -> Result<Match, sqlx::Error> {
    let id = resolve_id(id);

    sqlx::query(
        "INSERT INTO matches
            (id, group_id, field_id, date, start_time, status, team_a_score, team_b_score, notes, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(&id)
    .bind(&input.group_id)
    .bind(input.field_id.as_deref())
    .bind(input.date.to_string())
    .bind(input.start_time.as_deref())
    .bind(input.status.as_str())
    .bind(input.team_a_score)
    .bind(input.team_b_score)
    .bind(input.notes.as_deref())
    .bind(now_timestamp())
    .execute(pool)
    .await?;

    get_match(pool, &id).await?.ok_or(sqlx::Error::RowNotFound)
}

pub async fn get_match(pool: &AnyPool, id: &str) -> Result<Option<Match>, sqlx::Error> {
    let sql = format!("{} WHERE id = $1", SELECT_MATCH);
    sqlx::query_as::<_, Match>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Most recent first.
pub async fn list_matches(pool: &AnyPool, group_id: &str) -> Result<Vec<Match>, sqlx::Error> {
    let sql = format!(
        "{} WHERE group_id = $1 ORDER BY date DESC, start_time DESC, id",
        SELECT_MATCH
    );
    sqlx::query_as::<_, Match>(&sql)
        .bind(group_id)
        .fetch_all(pool)
        .await
}

pub async fn update_match(
    pool: &AnyPool,
    id: &str,
    input: &MatchInput,
) -> Result<Option<Match>, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE matches
         SET group_id = $1, field_id = $2, date = $3, start_time = $4, status = $5,
             team_a_score = $6, team_b_score = $7, notes = $8
         WHERE id = $9",
    )
    .bind(&input.group_id)
    .bind(input.field_id.as_deref())
    .bind(input.date.to_string())
    .bind(input.start_time.as_deref())
    .bind(input.status.as_str())
    .bind(input.team_a_score)
    .bind(input.team_b_score)
    .bind(input.notes.as_deref())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_match(pool, id).await
}

/// Comments on the match are removed with it.
pub async fn delete_match(pool: &AnyPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM matches WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
