//! Integration tests for the database infrastructure
//!
//! These tests verify that PostgreSQL is reachable and that the embedded
//! migrations produce the schema the favorites service relies on.

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use sqlx::Row;

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_migrations_enforce_unique_favorite_pair() -> Result<(), Box<dyn std::error::Error>> {
    let config = DatabaseConfig::from_env()?;
    let pool = init_pool(&config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    run_migrations(&pool).await?;
    // Applying twice must be a no-op.
    run_migrations(&pool).await?;

    let mut tx = pool.begin().await?;

    let user_id: i32 = sqlx::query_scalar(
        "INSERT INTO users (email, password) VALUES ('schema-test@example.com', 'x') RETURNING id",
    )
    .fetch_one(&mut *tx)
    .await?;

    let product_id: i32 = sqlx::query_scalar(
        "INSERT INTO products (name, price, stock) VALUES ('Tricou', 49.99, 3) RETURNING id",
    )
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO favorites (user_id, product_id) VALUES ($1, $2)")
        .bind(user_id)
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

    let duplicate = sqlx::query("INSERT INTO favorites (user_id, product_id) VALUES ($1, $2)")
        .bind(user_id)
        .bind(product_id)
        .execute(&mut *tx)
        .await;

    let err = duplicate.expect_err("duplicate favorite pair must be rejected");
    let db_err = err.as_database_error().expect("expected a database error");
    assert_eq!(db_err.constraint(), Some("favorites_user_product_key"));

    tx.rollback().await?;

    let row = sqlx::query("SELECT COUNT(*) AS n FROM favorites WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&pool)
        .await?;
    let n: i64 = row.get("n");
    assert_eq!(n, 0);

    Ok(())
}
