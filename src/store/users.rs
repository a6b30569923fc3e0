use sqlx::{FromRow, SqlitePool};

use super::StoreError;
use crate::models::UserTable;

#[derive(Debug, FromRow)]
pub struct LeaderboardRow {
    pub id: i64,
    pub username: String,
    pub tokens: i64,
    pub forecasts_count: i64,
}

pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<UserTable, StoreError> {
    let existing: Option<i64> =
        sqlx::query_scalar("SELECT id FROM users WHERE email = ?1 OR username = ?2")
            .bind(email)
            .bind(username)
            .fetch_optional(pool)
            .await?;

    if existing.is_some() {
        return Err(StoreError::UserExists);
    }

    let result = sqlx::query(
        r#"
        INSERT INTO users (username, email, password_hash)
        VALUES (?1, ?2, ?3)
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .execute(pool)
    .await?;

    get_user_by_id(pool, result.last_insert_rowid()).await
}

pub async fn get_user_by_id(pool: &SqlitePool, user_id: i64) -> Result<UserTable, StoreError> {
    sqlx::query_as::<_, UserTable>(
        r#"
        SELECT id, username, email, password_hash, tokens, created_at
        FROM users
        WHERE id = ?1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(StoreError::UserNotFound)
}

pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<UserTable, StoreError> {
    sqlx::query_as::<_, UserTable>(
        r#"
        SELECT id, username, email, password_hash, tokens, created_at
        FROM users
        WHERE email = ?1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?
    .ok_or(StoreError::UserNotFound)
}

/// 1 + the number of users holding strictly more tokens.
pub async fn rank(pool: &SqlitePool, user_id: i64) -> Result<i64, StoreError> {
    let rank: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) + 1
        FROM users
        WHERE tokens > (SELECT tokens FROM users WHERE id = ?1)
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(rank)
}

/// Top 50 users by token balance.
pub async fn leaderboard(pool: &SqlitePool) -> Result<Vec<LeaderboardRow>, StoreError> {
    let rows = sqlx::query_as::<_, LeaderboardRow>(
        r#"
        SELECT id, username, tokens,
            (SELECT COUNT(*) FROM forecasts WHERE user_id = users.id) AS forecasts_count
        FROM users
        ORDER BY tokens DESC
        LIMIT 50
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
