use sqlx::{FromRow, SqlitePool};

use super::markets::STATUS_ACTIVE;
use super::StoreError;

/// Flat fee debited from a user's balance for every forecast.
pub const FORECAST_COST: i64 = 10;

#[derive(Debug, FromRow)]
pub struct RecentForecastRow {
    pub probability: f64,
    pub created_at: String,
    pub username: String,
}

#[derive(Debug, FromRow)]
pub struct UserForecastRow {
    pub id: i64,
    pub market_id: i64,
    pub probability: f64,
    pub tokens_spent: i64,
    pub reward: i64,
    pub created_at: String,
    pub market_question: String,
    pub market_status: String,
    pub market_category: Option<String>,
}

/// Inserts a forecast and debits the fee in one transaction. The market
/// must exist and be active, and the user must hold at least the fee.
pub async fn submit_forecast(
    pool: &SqlitePool,
    user_id: i64,
    market_id: i64,
    probability: f64,
) -> Result<i64, StoreError> {
    let mut tx = pool.begin().await?;

    let status: Option<String> = sqlx::query_scalar("SELECT status FROM markets WHERE id = ?1")
        .bind(market_id)
        .fetch_optional(&mut *tx)
        .await?;

    let status = status.ok_or(StoreError::MarketNotFound)?;
    if status != STATUS_ACTIVE {
        return Err(StoreError::MarketNotActive);
    }

    let tokens: Option<i64> = sqlx::query_scalar("SELECT tokens FROM users WHERE id = ?1")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

    let tokens = tokens.ok_or(StoreError::UserNotFound)?;
    if tokens < FORECAST_COST {
        return Err(StoreError::InsufficientTokens);
    }

    let result = sqlx::query(
        r#"
        INSERT INTO forecasts (user_id, market_id, probability, tokens_spent)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(user_id)
    .bind(market_id)
    .bind(probability)
    .bind(FORECAST_COST)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE users SET tokens = tokens - ?1 WHERE id = ?2")
        .bind(FORECAST_COST)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(result.last_insert_rowid())
}

pub async fn probabilities_for_market(
    pool: &SqlitePool,
    market_id: i64,
) -> Result<Vec<f64>, StoreError> {
    let probabilities =
        sqlx::query_scalar("SELECT probability FROM forecasts WHERE market_id = ?1")
            .bind(market_id)
            .fetch_all(pool)
            .await?;
    Ok(probabilities)
}

/// The 10 most recent forecasts on a market, with forecaster names.
pub async fn recent_for_market(
    pool: &SqlitePool,
    market_id: i64,
) -> Result<Vec<RecentForecastRow>, StoreError> {
    let rows = sqlx::query_as::<_, RecentForecastRow>(
        r#"
        SELECT f.probability, f.created_at, u.username
        FROM forecasts f
        JOIN users u ON f.user_id = u.id
        WHERE f.market_id = ?1
        ORDER BY f.created_at DESC, f.id DESC
        LIMIT 10
        "#,
    )
    .bind(market_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn forecasts_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<UserForecastRow>, StoreError> {
    let rows = sqlx::query_as::<_, UserForecastRow>(
        r#"
        SELECT f.id, f.market_id, f.probability, f.tokens_spent, f.reward, f.created_at,
            m.question AS market_question,
            m.status AS market_status,
            m.category AS market_category
        FROM forecasts f
        JOIN markets m ON f.market_id = m.id
        WHERE f.user_id = ?1
        ORDER BY f.created_at DESC, f.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn count_for_user(pool: &SqlitePool, user_id: i64) -> Result<i64, StoreError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM forecasts WHERE user_id = ?1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Probabilities of the user's forecasts on resolved markets, feeding the
/// accuracy estimate.
pub async fn resolved_probabilities_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<f64>, StoreError> {
    let probabilities = sqlx::query_scalar(
        r#"
        SELECT f.probability
        FROM forecasts f
        JOIN markets m ON f.market_id = m.id
        WHERE f.user_id = ?1 AND m.status = 'resolved'
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(probabilities)
}
