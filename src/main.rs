use actix_web::{web, App, HttpServer};
use dotenvy::dotenv;
use log::info;
use std::env;

use lytir_backend::{configure_routes, db};

async fn run() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://lytir.db?mode=rwc".to_string());

    let pool = db::connect(&database_url)
        .await
        .expect("Failed to create SQLite pool");

    db::init_schema(&pool)
        .await
        .expect("Failed to initialize database schema");

    db::seed_markets(&pool)
        .await
        .expect("Failed to seed sample markets");

    info!("Connected to SQLite database");

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string());
    info!("Starting server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .configure(configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}

fn main() -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build Tokio runtime");
    runtime.block_on(run())
}
