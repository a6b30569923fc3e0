use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpResponse};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use lytir_backend::utils::jwt::create_jwt;
use lytir_backend::{configure_routes, db, store};

const SECRET: &str = "test-secret";

async fn setup_pool() -> SqlitePool {
    std::env::set_var("JWT_SECRET", SECRET);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::init_schema(&pool).await.unwrap();
    pool
}

async fn seed_user(pool: &SqlitePool, username: &str) -> (i64, String) {
    let password_hash = bcrypt::hash("password123", 4).unwrap();
    let email = format!("{}@example.com", username);
    let user = store::users::create_user(pool, username, &email, &password_hash)
        .await
        .unwrap();
    let token = create_jwt(user.id, SECRET).unwrap();
    (user.id, token)
}

async fn seed_market(pool: &SqlitePool, question: &str) -> i64 {
    store::markets::create_market(pool, question, None, Some("Test"), Some("2026-12-31"))
        .await
        .unwrap()
        .id
}

macro_rules! init_app {
    ($pool:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($pool.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health_endpoint() {
    let pool = setup_pool().await;
    let app = init_app!(pool);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_signup_and_login() {
    let pool = setup_pool().await;
    let app = init_app!(pool);

    let req = test::TestRequest::post()
        .uri("/signup")
        .set_json(json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "password123"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["tokens"], 1000);

    // Duplicate email is rejected.
    let req = test::TestRequest::post()
        .uri("/signup")
        .set_json(json!({
            "username": "alice2",
            "email": "alice@example.com",
            "password": "password123"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Wrong password.
    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({
            "email": "alice@example.com",
            "password": "wrongpassword"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({
            "email": "alice@example.com",
            "password": "password123"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["email"], "alice@example.com");
}

#[actix_web::test]
async fn test_forecast_requires_auth() {
    let pool = setup_pool().await;
    let app = init_app!(pool);

    let req = test::TestRequest::post()
        .uri("/forecast")
        .set_json(json!({"market_id": 1, "probability": 50}))
        .to_request();

    let err = test::try_call_service(&app, req).await.err().unwrap();
    let resp = HttpResponse::from_error(err);
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_forecast_probability_out_of_range_rejected() {
    let pool = setup_pool().await;
    let (_, token) = seed_user(&pool, "bob").await;
    let market_id = seed_market(&pool, "Will it rain tomorrow?").await;
    let app = init_app!(pool);

    for probability in [101.0, 150.0, -5.0] {
        let req = test::TestRequest::post()
            .uri("/forecast")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .set_json(json!({"market_id": market_id, "probability": probability}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    // Boundaries are accepted.
    for probability in [0.0, 100.0] {
        let req = test::TestRequest::post()
            .uri("/forecast")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .set_json(json!({"market_id": market_id, "probability": probability}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }
}

#[actix_web::test]
async fn test_forecast_against_unknown_market_is_404() {
    let pool = setup_pool().await;
    let (_, token) = seed_user(&pool, "bob").await;
    let app = init_app!(pool);

    let req = test::TestRequest::post()
        .uri("/forecast")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({"market_id": 999, "probability": 50}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_forecast_with_insufficient_tokens_rejected() {
    let pool = setup_pool().await;
    let (user_id, token) = seed_user(&pool, "broke").await;
    let market_id = seed_market(&pool, "Will the bus be on time?").await;

    sqlx::query("UPDATE users SET tokens = 5 WHERE id = ?1")
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();

    let app = init_app!(pool);

    let req = test::TestRequest::post()
        .uri("/forecast")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({"market_id": market_id, "probability": 50}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Insufficient tokens");
}

#[actix_web::test]
async fn test_crowd_prediction_defaults_to_fifty() {
    let pool = setup_pool().await;
    let (_, token) = seed_user(&pool, "carol").await;
    let market_id = seed_market(&pool, "Will the harvest be good?").await;
    let app = init_app!(pool);

    let req = test::TestRequest::get()
        .uri(&format!("/markets/{}", market_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["crowd_prediction"], 50);
    assert_eq!(body["forecasts_count"], 0);

    let req = test::TestRequest::post()
        .uri("/forecast")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({"market_id": market_id, "probability": 80}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!("/markets/{}", market_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["crowd_prediction"], 80);
    assert_eq!(body["forecasts_count"], 1);
    assert_eq!(body["recent_forecasts"][0]["username"], "carol");
}

#[actix_web::test]
async fn test_resolution_pays_rewards() {
    let pool = setup_pool().await;
    let (_, token) = seed_user(&pool, "dave").await;
    let yes_market = seed_market(&pool, "Will the yes market resolve yes?").await;
    let no_market = seed_market(&pool, "Will the no market resolve yes?").await;
    let app = init_app!(pool);

    for market_id in [yes_market, no_market] {
        let req = test::TestRequest::post()
            .uri("/forecast")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .set_json(json!({"market_id": market_id, "probability": 80}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    // p=80, outcome yes -> reward 40.
    let req = test::TestRequest::post()
        .uri("/admin/resolve-market")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({"market_id": yes_market, "outcome": "yes"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["forecasts_rewarded"], 1);
    assert_eq!(body["tokens_paid"], 40);

    // p=80, outcome no -> reward 10.
    let req = test::TestRequest::post()
        .uri("/admin/resolve-market")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({"market_id": no_market, "outcome": "no"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["tokens_paid"], 10);

    // 1000 - 10 - 10 + 40 + 10 = 1030.
    let req = test::TestRequest::get()
        .uri("/user")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["tokens"], 1030);
    assert_eq!(body["forecasts_count"], 2);
    assert_eq!(body["rank"], 1);

    let req = test::TestRequest::get()
        .uri("/user/forecasts")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    let rewards: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["reward"].as_i64().unwrap())
        .collect();
    assert_eq!(rewards.len(), 2);
    assert!(rewards.contains(&40));
    assert!(rewards.contains(&10));
}

#[actix_web::test]
async fn test_resolved_market_rejects_forecasts_and_second_resolve() {
    let pool = setup_pool().await;
    let (_, token) = seed_user(&pool, "erin").await;
    let market_id = seed_market(&pool, "Will this market stay open?").await;
    let app = init_app!(pool);

    let req = test::TestRequest::post()
        .uri("/admin/resolve-market")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({"market_id": market_id, "outcome": "yes"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/markets/{}", market_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "resolved");

    // Forecasts against a resolved market are rejected.
    let req = test::TestRequest::post()
        .uri("/forecast")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({"market_id": market_id, "probability": 50}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // A second resolve must not double-pay.
    let req = test::TestRequest::post()
        .uri("/admin/resolve-market")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({"market_id": market_id, "outcome": "yes"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Resolved markets drop off the active listing.
    let req = test::TestRequest::get().uri("/markets").to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_resolve_with_invalid_outcome_rejected() {
    let pool = setup_pool().await;
    let (_, token) = seed_user(&pool, "frank").await;
    let market_id = seed_market(&pool, "Will the outcome be binary?").await;
    let app = init_app!(pool);

    let req = test::TestRequest::post()
        .uri("/admin/resolve-market")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({"market_id": market_id, "outcome": "maybe"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/admin/resolve-market")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({"market_id": 999, "outcome": "yes"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_leaderboard_orders_by_tokens() {
    let pool = setup_pool().await;
    let (_, rich_token) = seed_user(&pool, "rich").await;
    let (poor_id, _) = seed_user(&pool, "poor").await;
    let market_id = seed_market(&pool, "Will the leaderboard sort?").await;

    sqlx::query("UPDATE users SET tokens = 200 WHERE id = ?1")
        .bind(poor_id)
        .execute(&pool)
        .await
        .unwrap();

    let app = init_app!(pool);

    let req = test::TestRequest::post()
        .uri("/forecast")
        .insert_header(("Authorization", format!("Bearer {}", rich_token)))
        .set_json(json!({"market_id": market_id, "probability": 90}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/admin/resolve-market")
        .insert_header(("Authorization", format!("Bearer {}", rich_token)))
        .set_json(json!({"market_id": market_id, "outcome": "yes"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/leaderboard").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["username"], "rich");
    // 1000 - 10 + 45
    assert_eq!(rows[0]["tokens"], 1035);
    assert_eq!(rows[0]["forecasts_count"], 1);
    // Placeholder accuracy: 100 - |100 - 90| = 90.
    assert_eq!(rows[0]["accuracy"], 90);
    assert_eq!(rows[1]["username"], "poor");
}

#[actix_web::test]
async fn test_logout_acknowledges_authenticated_user() {
    let pool = setup_pool().await;
    let (_, token) = seed_user(&pool, "gwen").await;
    let app = init_app!(pool);

    let req = test::TestRequest::post()
        .uri("/logout")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Logged out successfully");
}
