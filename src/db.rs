use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT UNIQUE NOT NULL,
            email TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            tokens INTEGER NOT NULL DEFAULT 1000,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS markets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            question TEXT NOT NULL,
            description TEXT,
            category TEXT,
            resolution_date TEXT,
            status TEXT NOT NULL DEFAULT 'active',
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS forecasts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            market_id INTEGER NOT NULL,
            probability REAL NOT NULL,
            tokens_spent INTEGER NOT NULL DEFAULT 10,
            reward INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (user_id) REFERENCES users(id),
            FOREIGN KEY (market_id) REFERENCES markets(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Inserts the sample markets when the table is empty.
pub async fn seed_markets(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM markets")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        return Ok(());
    }

    let samples = [
        (
            "Will Ireland qualify for FIFA 2026?",
            "This market resolves YES if Ireland's national football team qualifies for the 2026 FIFA World Cup by the end of qualifying rounds.",
            "Sports",
            "2026-06-30",
        ),
        (
            "Will Sinn Féin win next election?",
            "This market resolves YES if Sinn Féin becomes the largest party in the next Irish general election.",
            "Politics",
            "2025-12-31",
        ),
        (
            "Will Irish tech startup IPO in 2025?",
            "This market resolves YES if any Irish-founded tech startup goes public in 2025.",
            "Tech",
            "2025-12-31",
        ),
    ];

    for (question, description, category, resolution_date) in samples {
        sqlx::query(
            r#"
            INSERT INTO markets (question, description, category, resolution_date)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(question)
        .bind(description)
        .bind(category)
        .bind(resolution_date)
        .execute(pool)
        .await?;
    }

    Ok(())
}
