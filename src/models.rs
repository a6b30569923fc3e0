use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct UserTable {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub tokens: i64,
    pub created_at: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct MarketTable {
    pub id: i64,
    pub question: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub resolution_date: Option<String>,
    pub status: String,
    pub created_at: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct ForecastTable {
    pub id: i64,
    pub user_id: i64,
    pub market_id: i64,
    pub probability: f64,
    pub tokens_spent: i64,
    pub reward: i64,
    pub created_at: String,
}
