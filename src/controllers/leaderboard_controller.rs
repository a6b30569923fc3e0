use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::SqlitePool;

use crate::scoring;
use crate::store;
use crate::utils::responses::store_error_response;

#[get("/leaderboard")]
pub async fn get_leaderboard(pool: web::Data<SqlitePool>) -> impl Responder {
    let rows = match store::users::leaderboard(&pool).await {
        Ok(rows) => rows,
        Err(e) => return store_error_response(e),
    };

    let mut payload = Vec::with_capacity(rows.len());
    for row in &rows {
        let resolved =
            match store::forecasts::resolved_probabilities_for_user(&pool, row.id).await {
                Ok(p) => p,
                Err(e) => return store_error_response(e),
            };

        payload.push(json!({
            "id": row.id,
            "username": row.username,
            "tokens": row.tokens,
            "forecasts_count": row.forecasts_count,
            "accuracy": scoring::accuracy_estimate(&resolved)
        }));
    }

    HttpResponse::Ok().json(payload)
}
