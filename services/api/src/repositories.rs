//! Repositories for favorite persistence

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::models::{AddOutcome, FavoriteRecord, ProductId, UserId};

pub mod memory;

/// Storage seam for the user-to-product favorite relation
///
/// Implementations must keep at most one row per `(user, product)` pair and
/// treat `add`/`remove` as idempotent.
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Product ids favorited by `user_id`, in insertion order
    async fn list_product_ids(&self, user_id: UserId) -> Result<Vec<i32>>;

    /// Insert the pair unless it already exists
    async fn add(&self, user_id: UserId, product_id: ProductId) -> Result<AddOutcome>;

    /// Delete the pair; returns whether a row was removed
    async fn remove(&self, user_id: UserId, product_id: ProductId) -> Result<bool>;
}

const FAVORITE_COLUMNS: &str = "id, user_id, product_id, created_at, updated_at";

/// PostgreSQL-backed favorite repository
#[derive(Clone)]
pub struct PgFavoriteRepository {
    pool: PgPool,
}

impl PgFavoriteRepository {
    /// Create a new favorite repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find<'e, E>(
        executor: E,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Option<FavoriteRecord>>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let record = sqlx::query_as::<_, FavoriteRecord>(&format!(
            "SELECT {FAVORITE_COLUMNS} FROM favorites WHERE user_id = $1 AND product_id = $2"
        ))
        .bind(user_id.get())
        .bind(product_id.get())
        .fetch_optional(executor)
        .await?;

        Ok(record)
    }
}

#[async_trait]
impl FavoriteStore for PgFavoriteRepository {
    async fn list_product_ids(&self, user_id: UserId) -> Result<Vec<i32>> {
        let ids = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT product_id
            FROM favorites
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn add(&self, user_id: UserId, product_id: ProductId) -> Result<AddOutcome> {
        let mut tx = self.pool.begin().await?;

        if let Some(existing) = Self::find(&mut *tx, user_id, product_id).await? {
            tx.commit().await?;
            return Ok(AddOutcome::Existing(existing));
        }

        let inserted = sqlx::query_as::<_, FavoriteRecord>(&format!(
            r#"
            INSERT INTO favorites (user_id, product_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, product_id) DO NOTHING
            RETURNING {FAVORITE_COLUMNS}
            "#
        ))
        .bind(user_id.get())
        .bind(product_id.get())
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = match inserted {
            Some(record) => AddOutcome::Created(record),
            None => {
                // A concurrent add committed the same pair between lookup and insert.
                info!(
                    "Favorite ({}, {}) inserted concurrently, returning existing row",
                    user_id, product_id
                );
                let existing = Self::find(&mut *tx, user_id, product_id)
                    .await?
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "favorite ({}, {}) conflicted but is not visible",
                            user_id,
                            product_id
                        )
                    })?;
                AddOutcome::Existing(existing)
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }

    async fn remove(&self, user_id: UserId, product_id: ProductId) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM favorites
            WHERE user_id = $1 AND product_id = $2
            "#,
        )
        .bind(user_id.get())
        .bind(product_id.get())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
