pub mod controllers;
pub mod db;
pub mod middleware;
pub mod models;
pub mod scoring;
pub mod store;
pub mod types;
pub mod utils;

use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::controllers::admin_controller::resolve_market;
use crate::controllers::forecast_controller::submit_forecast;
use crate::controllers::leaderboard_controller::get_leaderboard;
use crate::controllers::market_controller::{create_market, get_market_by_id, get_markets};
use crate::controllers::user_controller::{get_user, get_user_forecasts, login, logout, signup};
use crate::middleware::auth::AuthMiddleware;

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Public routes first, then everything behind the auth middleware.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(signup)
        .service(login)
        .service(get_markets)
        .service(get_market_by_id)
        .service(get_leaderboard)
        .route("/health", web::get().to(health))
        .service(
            web::scope("")
                .wrap(AuthMiddleware)
                .service(logout)
                .service(get_user_forecasts)
                .service(get_user)
                .service(submit_forecast)
                .service(create_market)
                .service(resolve_market),
        );
}
