//! Postgres fixtures for repository tests. These tests run against the
//! database named by `DATABASE_URL` and are skipped when it is unset.

use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

/// Migrated pool, or `None` when no test database is configured.
pub async fn database() -> Option<PgPool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping database test");
        return None;
    };
    let db = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("connect to test database");
    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("run migrations");
    Some(db)
}

pub async fn seed_customer(db: &PgPool) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO customers (email, password_hash, first_name, last_name)
        VALUES ($1, 'not-a-real-hash', 'Test', 'Customer')
        RETURNING id
        "#,
    )
    .bind(format!("{}@example.test", Uuid::new_v4()))
    .fetch_one(db)
    .await
    .expect("seed customer")
}

pub async fn seed_recipe(db: &PgPool) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO recipes (name, cuisine, difficulty, prep_time, cook_time, servings)
        VALUES ('Test Lasagne', 'Italian', 'Medium', 20, 45, 4)
        RETURNING id
        "#,
    )
    .fetch_one(db)
    .await
    .expect("seed recipe")
}
