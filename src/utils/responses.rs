use actix_web::HttpResponse;
use log::error;
use serde_json::json;

use crate::store::StoreError;

fn error_body(message: &str) -> serde_json::Value {
    json!({
        "status": "error",
        "message": message
    })
}

/// Maps store failures onto the HTTP statuses the API promises: 400 for
/// business-rule violations, 404 for unknown resources, 500 otherwise.
pub fn store_error_response(err: StoreError) -> HttpResponse {
    match err {
        StoreError::UserExists => HttpResponse::BadRequest().json(error_body("User already exists")),
        StoreError::UserNotFound => HttpResponse::NotFound().json(error_body("User not found")),
        StoreError::MarketNotFound => {
            HttpResponse::NotFound().json(error_body("Market not found"))
        }
        StoreError::MarketNotActive => {
            HttpResponse::BadRequest().json(error_body("Market is not active"))
        }
        StoreError::AlreadyResolved => {
            HttpResponse::BadRequest().json(error_body("Market is already resolved"))
        }
        StoreError::InsufficientTokens => {
            HttpResponse::BadRequest().json(error_body("Insufficient tokens"))
        }
        StoreError::Database(e) => {
            error!("database error: {}", e);
            HttpResponse::InternalServerError().json(error_body("Database error"))
        }
    }
}
