//! Favorites client for the storefront API
//!
//! Mirrors server-side favorite membership into a client-local
//! [`FavoriteSet`], with optimistic toggling and explicit reconciliation on
//! fetch.
//!
//! ```rust,no_run
//! use client::{FavoriteSet, FavoritesClient};
//!
//! # async fn run() -> Result<(), client::ClientError> {
//! let api = FavoritesClient::new("http://localhost:3001", "<access token>");
//! let mut favorites = FavoriteSet::new();
//! api.refresh(&mut favorites).await?;
//! api.toggle(&mut favorites, 42).await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod error;

pub use cache::FavoriteSet;
pub use client::{Added, Favorite, FavoritesClient};
pub use error::{ClientError, ClientResult};
