//! In-process favorite store for tests and database-less local runs

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::FavoriteStore;
use crate::models::{AddOutcome, FavoriteRecord, ProductId, UserId};

#[derive(Default)]
struct Inner {
    next_id: i32,
    rows: BTreeMap<(UserId, ProductId), FavoriteRecord>,
}

/// Favorite store held in memory
///
/// The map key plays the role of the `(user_id, product_id)` unique constraint.
#[derive(Default)]
pub struct InMemoryFavoriteStore {
    inner: Mutex<Inner>,
}

impl InMemoryFavoriteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored favorites across all users
    pub async fn len(&self) -> usize {
        self.inner.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl FavoriteStore for InMemoryFavoriteStore {
    async fn list_product_ids(&self, user_id: UserId) -> Result<Vec<i32>> {
        let inner = self.inner.lock().await;
        let mut rows: Vec<&FavoriteRecord> = inner
            .rows
            .iter()
            .filter(|((user, _), _)| *user == user_id)
            .map(|(_, record)| record)
            .collect();
        rows.sort_by_key(|record| record.id);

        Ok(rows.into_iter().map(|record| record.product_id).collect())
    }

    async fn add(&self, user_id: UserId, product_id: ProductId) -> Result<AddOutcome> {
        let mut inner = self.inner.lock().await;

        if let Some(existing) = inner.rows.get(&(user_id, product_id)) {
            return Ok(AddOutcome::Existing(existing.clone()));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let record = FavoriteRecord {
            id: inner.next_id,
            user_id: user_id.get(),
            product_id: product_id.get(),
            created_at: now,
            updated_at: now,
        };
        inner.rows.insert((user_id, product_id), record.clone());

        Ok(AddOutcome::Created(record))
    }

    async fn remove(&self, user_id: UserId, product_id: ProductId) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        Ok(inner.rows.remove(&(user_id, product_id)).is_some())
    }
}
