use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use bcrypt::{hash, verify, DEFAULT_COST};
use serde_json::json;
use sqlx::SqlitePool;
use std::env;
use validator::Validate;

use crate::scoring;
use crate::store::{self, StoreError};
use crate::types::auth_types::{LoginInput, SignUpInput};
use crate::utils::jwt::{create_jwt, extract_user_id};
use crate::utils::responses::store_error_response;

fn issue_token(user_id: i64) -> Result<String, HttpResponse> {
    let secret = env::var("JWT_SECRET").map_err(|_| {
        HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "JWT secret not configured"
        }))
    })?;

    create_jwt(user_id, &secret).map_err(|_| {
        HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Failed to issue token"
        }))
    })
}

#[post("/signup")]
pub async fn signup(pool: web::Data<SqlitePool>, req: web::Json<SignUpInput>) -> impl Responder {
    if let Err(e) = req.validate() {
        return HttpResponse::BadRequest().json(json!({
            "status": "error",
            "message": e.to_string()
        }));
    }

    let password_hash = match hash(&req.password, DEFAULT_COST) {
        Ok(h) => h,
        Err(_) => {
            return HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": "Failed to sign up user"
            }))
        }
    };

    let user =
        match store::users::create_user(&pool, &req.username, &req.email, &password_hash).await {
            Ok(u) => u,
            Err(e) => return store_error_response(e),
        };

    let token = match issue_token(user.id) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    HttpResponse::Created().json(json!({
        "status": "success",
        "message": "Account created successfully",
        "token": token,
        "user": {
            "id": user.id,
            "username": user.username,
            "email": user.email,
            "tokens": user.tokens
        }
    }))
}

#[post("/login")]
pub async fn login(pool: web::Data<SqlitePool>, req: web::Json<LoginInput>) -> impl Responder {
    if let Err(e) = req.validate() {
        return HttpResponse::BadRequest().json(json!({
            "status": "error",
            "message": e.to_string()
        }));
    }

    let user = match store::users::get_user_by_email(&pool, &req.email).await {
        Ok(u) => u,
        Err(StoreError::UserNotFound) => {
            return HttpResponse::Unauthorized().json(json!({
                "status": "error",
                "message": "Invalid credentials"
            }))
        }
        Err(e) => return store_error_response(e),
    };

    let is_valid = verify(&req.password, &user.password_hash).unwrap_or(false);
    if !is_valid {
        return HttpResponse::Unauthorized().json(json!({
            "status": "error",
            "message": "Invalid credentials"
        }));
    }

    let token = match issue_token(user.id) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Login successful",
        "token": token,
        "user": {
            "id": user.id,
            "username": user.username,
            "email": user.email,
            "tokens": user.tokens
        }
    }))
}

// Tokens are stateless, so there is nothing to revoke server-side; the
// client discards its token.
#[post("/logout")]
pub async fn logout(req: HttpRequest) -> impl Responder {
    if let Err(resp) = extract_user_id(&req) {
        return resp;
    }

    HttpResponse::Ok().json(json!({
        "status": "success",
        "message": "Logged out successfully"
    }))
}

#[get("/user")]
pub async fn get_user(pool: web::Data<SqlitePool>, req: HttpRequest) -> impl Responder {
    let user_id = match extract_user_id(&req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let user = match store::users::get_user_by_id(&pool, user_id).await {
        Ok(u) => u,
        Err(e) => return store_error_response(e),
    };

    let forecasts_count = match store::forecasts::count_for_user(&pool, user_id).await {
        Ok(c) => c,
        Err(e) => return store_error_response(e),
    };

    let resolved = match store::forecasts::resolved_probabilities_for_user(&pool, user_id).await {
        Ok(p) => p,
        Err(e) => return store_error_response(e),
    };

    let rank = match store::users::rank(&pool, user_id).await {
        Ok(r) => r,
        Err(e) => return store_error_response(e),
    };

    HttpResponse::Ok().json(json!({
        "id": user.id,
        "username": user.username,
        "email": user.email,
        "tokens": user.tokens,
        "forecasts_count": forecasts_count,
        "accuracy": scoring::accuracy_estimate(&resolved),
        "rank": rank
    }))
}

#[get("/user/forecasts")]
pub async fn get_user_forecasts(pool: web::Data<SqlitePool>, req: HttpRequest) -> impl Responder {
    let user_id = match extract_user_id(&req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let forecasts = match store::forecasts::forecasts_for_user(&pool, user_id).await {
        Ok(rows) => rows,
        Err(e) => return store_error_response(e),
    };

    let mut payload = Vec::with_capacity(forecasts.len());
    for forecast in &forecasts {
        let probabilities =
            match store::forecasts::probabilities_for_market(&pool, forecast.market_id).await {
                Ok(p) => p,
                Err(e) => return store_error_response(e),
            };
        let (crowd_prediction, _) = scoring::crowd_prediction(&probabilities);

        payload.push(json!({
            "id": forecast.id,
            "market_id": forecast.market_id,
            "market_question": forecast.market_question,
            "status": forecast.market_status,
            "category": forecast.market_category,
            "probability": forecast.probability,
            "tokens_spent": forecast.tokens_spent,
            "reward": forecast.reward,
            "created_at": forecast.created_at,
            "crowd_prediction": crowd_prediction
        }));
    }

    HttpResponse::Ok().json(payload)
}
