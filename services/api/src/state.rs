//! Application state shared across handlers

use crate::{favorites::FavoritesService, middleware::JwtVerifier};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub favorites: FavoritesService,
    pub jwt: JwtVerifier,
}
