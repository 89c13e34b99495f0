//! HTTP client for the favorites endpoints

use chrono::{DateTime, Utc};
use common::envelope::ApiResponse;
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{info, warn};

use crate::{
    cache::FavoriteSet,
    error::{ClientError, ClientResult},
};

/// A favorite row as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of adding a favorite
#[derive(Debug, Clone, PartialEq)]
pub struct Added {
    /// `false` when the product was already a favorite
    pub created: bool,
    pub favorite: Favorite,
}

/// Favorites API client authenticated with a bearer token
#[derive(Clone)]
pub struct FavoritesClient {
    http: Client,
    base_url: String,
    token: String,
}

impl FavoritesClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, token)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Product ids favorited by the token's user
    pub async fn list(&self) -> ClientResult<Vec<i32>> {
        let (_, ids) = self.send(Method::GET, "/favorites").await?;
        Ok(ids)
    }

    pub async fn add(&self, product_id: i32) -> ClientResult<Added> {
        let (status, favorite) = self
            .send(Method::POST, &format!("/favorites/{}", product_id))
            .await?;

        Ok(Added {
            created: status == StatusCode::CREATED,
            favorite,
        })
    }

    pub async fn remove(&self, product_id: i32) -> ClientResult<()> {
        let _: (StatusCode, serde_json::Value) = self
            .send(Method::DELETE, &format!("/favorites/{}", product_id))
            .await?;
        Ok(())
    }

    /// Fetch the server's favorites and reconcile `cache` with them
    pub async fn refresh(&self, cache: &mut FavoriteSet) -> ClientResult<()> {
        let ids = self.list().await?;
        cache.reconcile(ids);
        Ok(())
    }

    /// Flip membership of `product_id`, optimistically updating `cache`
    ///
    /// The cache is rolled back if the server call fails. Returns whether the
    /// product is a favorite afterwards.
    pub async fn toggle(&self, cache: &mut FavoriteSet, product_id: i32) -> ClientResult<bool> {
        let was_favorite = cache.contains(product_id);
        if was_favorite {
            cache.remove(product_id);
        } else {
            cache.insert(product_id);
        }

        let result = if was_favorite {
            self.remove(product_id).await
        } else {
            self.add(product_id).await.map(|_| ())
        };

        if let Err(e) = result {
            warn!("Failed to toggle favorite {}: {}", product_id, e);
            if was_favorite {
                cache.insert(product_id);
            } else {
                cache.remove(product_id);
            }
            return Err(e);
        }

        info!(
            "Product {} {} favorites",
            product_id,
            if was_favorite { "removed from" } else { "added to" }
        );
        Ok(!was_favorite)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> ClientResult<(StatusCode, T)> {
        let response = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthenticated);
        }

        let body: ApiResponse<serde_json::Value> = response.json().await?;
        if !status.is_success() || !body.success {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: body.message,
            });
        }

        Ok((status, serde_json::from_value(body.data)?))
    }
}
