use actix_web::{post, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use sqlx::SqlitePool;

use crate::scoring::Outcome;
use crate::store;
use crate::types::market_types::ResolveMarketInput;
use crate::utils::jwt::extract_user_id;
use crate::utils::responses::store_error_response;

#[post("/admin/resolve-market")]
pub async fn resolve_market(
    pool: web::Data<SqlitePool>,
    http_req: HttpRequest,
    req: web::Json<ResolveMarketInput>,
) -> impl Responder {
    if let Err(resp) = extract_user_id(&http_req) {
        return resp;
    }

    let outcome = match Outcome::parse(&req.outcome) {
        Some(o) => o,
        None => {
            return HttpResponse::BadRequest().json(json!({
                "status": "error",
                "message": "Outcome must be 'yes' or 'no'"
            }))
        }
    };

    match store::markets::resolve_market(&pool, req.market_id, outcome).await {
        Ok(summary) => HttpResponse::Ok().json(json!({
            "status": "success",
            "message": "Market resolved successfully",
            "forecasts_rewarded": summary.forecasts_rewarded,
            "tokens_paid": summary.tokens_paid
        })),
        Err(e) => store_error_response(e),
    }
}
