use actix_web::{post, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::store;
use crate::types::forecast_types::SubmitForecastInput;
use crate::utils::jwt::extract_user_id;
use crate::utils::responses::store_error_response;

#[post("/forecast")]
pub async fn submit_forecast(
    pool: web::Data<SqlitePool>,
    http_req: HttpRequest,
    req: web::Json<SubmitForecastInput>,
) -> impl Responder {
    let user_id = match extract_user_id(&http_req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    if let Err(e) = req.validate() {
        return HttpResponse::BadRequest().json(json!({
            "status": "error",
            "message": e.to_string()
        }));
    }

    match store::forecasts::submit_forecast(&pool, user_id, req.market_id, req.probability).await {
        Ok(forecast_id) => HttpResponse::Created().json(json!({
            "status": "success",
            "message": "Forecast submitted successfully",
            "forecast_id": forecast_id
        })),
        Err(e) => store_error_response(e),
    }
}
