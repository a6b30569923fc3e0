use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::models::MarketTable;
use crate::scoring;
use crate::store;
use crate::types::market_types::CreateMarketInput;
use crate::utils::jwt::extract_user_id;
use crate::utils::responses::store_error_response;

fn market_json(market: &MarketTable, crowd_prediction: i64, forecasts_count: usize) -> serde_json::Value {
    json!({
        "id": market.id,
        "question": market.question,
        "description": market.description,
        "category": market.category,
        "resolution_date": market.resolution_date,
        "status": market.status,
        "created_at": market.created_at,
        "crowd_prediction": crowd_prediction,
        "forecasts_count": forecasts_count
    })
}

#[get("/markets")]
pub async fn get_markets(pool: web::Data<SqlitePool>) -> impl Responder {
    let markets = match store::markets::list_active(&pool).await {
        Ok(m) => m,
        Err(e) => return store_error_response(e),
    };

    let mut payload = Vec::with_capacity(markets.len());
    for market in &markets {
        let probabilities =
            match store::forecasts::probabilities_for_market(&pool, market.id).await {
                Ok(p) => p,
                Err(e) => return store_error_response(e),
            };
        let (crowd_prediction, forecasts_count) = scoring::crowd_prediction(&probabilities);
        payload.push(market_json(market, crowd_prediction, forecasts_count));
    }

    HttpResponse::Ok().json(payload)
}

#[get("/markets/{id}")]
pub async fn get_market_by_id(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> impl Responder {
    let market_id = path.into_inner();

    let market = match store::markets::get_market_by_id(&pool, market_id).await {
        Ok(m) => m,
        Err(e) => return store_error_response(e),
    };

    let probabilities = match store::forecasts::probabilities_for_market(&pool, market_id).await {
        Ok(p) => p,
        Err(e) => return store_error_response(e),
    };
    let (crowd_prediction, forecasts_count) = scoring::crowd_prediction(&probabilities);

    let recent = match store::forecasts::recent_for_market(&pool, market_id).await {
        Ok(rows) => rows,
        Err(e) => return store_error_response(e),
    };

    let mut payload = market_json(&market, crowd_prediction, forecasts_count);
    payload["recent_forecasts"] = recent
        .iter()
        .map(|f| {
            json!({
                "probability": f.probability,
                "created_at": f.created_at,
                "username": f.username
            })
        })
        .collect();

    HttpResponse::Ok().json(payload)
}

#[post("/admin/markets")]
pub async fn create_market(
    pool: web::Data<SqlitePool>,
    http_req: HttpRequest,
    req: web::Json<CreateMarketInput>,
) -> impl Responder {
    if let Err(resp) = extract_user_id(&http_req) {
        return resp;
    }

    if let Err(e) = req.validate() {
        return HttpResponse::BadRequest().json(json!({
            "status": "error",
            "message": e.to_string()
        }));
    }

    let market = match store::markets::create_market(
        &pool,
        &req.question,
        req.description.as_deref(),
        req.category.as_deref(),
        req.resolution_date.as_deref(),
    )
    .await
    {
        Ok(m) => m,
        Err(e) => return store_error_response(e),
    };

    HttpResponse::Created().json(json!({
        "status": "success",
        "message": "Market created successfully",
        "market": market_json(&market, scoring::DEFAULT_CROWD_PREDICTION, 0)
    }))
}
