use sqlx::AnyPool;

use crate::db::{now_timestamp, resolve_id};
use crate::models::Comment;

pub async fn create_comment(
    pool: &AnyPool,
    id: Option<&str>,
    match_id: &str,
    player_id: Option<&str>,
    author: &str,
    content: &str,
) -> Result<Comment, sqlx::Error> {
    let id = resolve_id(id);

    sqlx::query(
        "INSERT INTO comments (id, match_id, player_id, author, content, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(&id)
    .bind(match_id)
    .bind(player_id)
    .bind(author)
    .bind(content)
    .bind(now_timestamp())
    .execute(pool)
    .await?;

    sqlx::query_as::<_, Comment>(
        "SELECT id, match_id, player_id, author, content, created_at FROM comments WHERE id = $1",
    )
    .bind(&id)
    .fetch_one(pool)
    .await
}

pub async fn list_comments(pool: &AnyPool, match_id: &str) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        "SELECT id, match_id, player_id, author, content, created_at
         FROM comments WHERE match_id = $1 ORDER BY created_at, id",
    )
    .bind(match_id)
    .fetch_all(pool)
    .await
}

pub async fn delete_comment(pool: &AnyPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
