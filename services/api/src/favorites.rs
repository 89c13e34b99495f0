//! Favorites service: idempotent set-membership over user/product pairs
//!
//! `add` and `remove` behave as toggles that are safe to retry: adding an
//! existing favorite returns the stored row, removing a missing one succeeds.
//! Product ids are validated before the store is touched, so a malformed id
//! never changes state.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::{
    models::{AddOutcome, InvalidProductId, ProductId, UserId},
    repositories::FavoriteStore,
};

/// Errors produced by the favorites service
#[derive(Error, Debug)]
pub enum FavoriteError {
    /// The product id path segment is not a positive integer
    #[error(transparent)]
    InvalidArgument(#[from] InvalidProductId),

    /// The store failed unexpectedly
    #[error("{0}")]
    Store(anyhow::Error),
}

pub type FavoriteResult<T> = Result<T, FavoriteError>;

/// Favorites service shared across handlers
#[derive(Clone)]
pub struct FavoritesService {
    store: Arc<dyn FavoriteStore>,
}

impl FavoritesService {
    pub fn new(store: Arc<dyn FavoriteStore>) -> Self {
        Self { store }
    }

    /// Product ids favorited by `user_id`
    pub async fn list(&self, user_id: UserId) -> FavoriteResult<Vec<i32>> {
        self.store
            .list_product_ids(user_id)
            .await
            .map_err(FavoriteError::Store)
    }

    /// Favorite `product_id` for `user_id`, returning the existing row if present
    pub async fn add(&self, user_id: UserId, product_id: &str) -> FavoriteResult<AddOutcome> {
        let product_id: ProductId = product_id.parse()?;

        let outcome = self
            .store
            .add(user_id, product_id)
            .await
            .map_err(FavoriteError::Store)?;

        if outcome.is_created() {
            info!("User {} added product {} to favorites", user_id, product_id);
        }

        Ok(outcome)
    }

    /// Un-favorite `product_id` for `user_id`; absent pairs are not an error
    pub async fn remove(&self, user_id: UserId, product_id: &str) -> FavoriteResult<()> {
        let product_id: ProductId = product_id.parse()?;

        let removed = self
            .store
            .remove(user_id, product_id)
            .await
            .map_err(FavoriteError::Store)?;

        if removed {
            info!("User {} removed product {} from favorites", user_id, product_id);
        }

        Ok(())
    }
}
