use log::info;
use sqlx::SqlitePool;

use super::StoreError;
use crate::models::{ForecastTable, MarketTable};
use crate::scoring::{self, Outcome};

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_RESOLVED: &str = "resolved";

#[derive(Debug)]
pub struct ResolutionSummary {
    pub forecasts_rewarded: usize,
    pub tokens_paid: i64,
}

pub async fn list_active(pool: &SqlitePool) -> Result<Vec<MarketTable>, StoreError> {
    let markets = sqlx::query_as::<_, MarketTable>(
        r#"
        SELECT id, question, description, category, resolution_date, status, created_at
        FROM markets
        WHERE status = 'active'
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(markets)
}

pub async fn get_market_by_id(
    pool: &SqlitePool,
    market_id: i64,
) -> Result<MarketTable, StoreError> {
    sqlx::query_as::<_, MarketTable>(
        r#"
        SELECT id, question, description, category, resolution_date, status, created_at
        FROM markets
        WHERE id = ?1
        "#,
    )
    .bind(market_id)
    .fetch_optional(pool)
    .await?
    .ok_or(StoreError::MarketNotFound)
}

pub async fn create_market(
    pool: &SqlitePool,
    question: &str,
    description: Option<&str>,
    category: Option<&str>,
    resolution_date: Option<&str>,
) -> Result<MarketTable, StoreError> {
    let result = sqlx::query(
        r#"
        INSERT INTO markets (question, description, category, resolution_date)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(question)
    .bind(description)
    .bind(category)
    .bind(resolution_date)
    .execute(pool)
    .await?;

    get_market_by_id(pool, result.last_insert_rowid()).await
}

/// Resolves a market and pays out every forecast against it, all in one
/// transaction. A market can only be resolved once: anything but an
/// `active` status is rejected, so rewards are never paid twice.
pub async fn resolve_market(
    pool: &SqlitePool,
    market_id: i64,
    outcome: Outcome,
) -> Result<ResolutionSummary, StoreError> {
    let mut tx = pool.begin().await?;

    let status: Option<String> = sqlx::query_scalar("SELECT status FROM markets WHERE id = ?1")
        .bind(market_id)
        .fetch_optional(&mut *tx)
        .await?;

    let status = status.ok_or(StoreError::MarketNotFound)?;
    if status != STATUS_ACTIVE {
        return Err(StoreError::AlreadyResolved);
    }

    sqlx::query("UPDATE markets SET status = ?1 WHERE id = ?2")
        .bind(STATUS_RESOLVED)
        .bind(market_id)
        .execute(&mut *tx)
        .await?;

    let forecasts = sqlx::query_as::<_, ForecastTable>(
        r#"
        SELECT id, user_id, market_id, probability, tokens_spent, reward, created_at
        FROM forecasts
        WHERE market_id = ?1
        "#,
    )
    .bind(market_id)
    .fetch_all(&mut *tx)
    .await?;

    let mut tokens_paid = 0;
    for forecast in &forecasts {
        let reward = scoring::resolution_reward(forecast.probability, outcome);

        sqlx::query("UPDATE forecasts SET reward = ?1 WHERE id = ?2")
            .bind(reward)
            .bind(forecast.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE users SET tokens = tokens + ?1 WHERE id = ?2")
            .bind(reward)
            .bind(forecast.user_id)
            .execute(&mut *tx)
            .await?;

        tokens_paid += reward;
    }

    tx.commit().await?;

    info!(
        "Resolved market {} as {}: {} forecasts rewarded, {} tokens paid",
        market_id,
        outcome.as_str(),
        forecasts.len(),
        tokens_paid
    );

    Ok(ResolutionSummary {
        forecasts_rewarded: forecasts.len(),
        tokens_paid,
    })
}
