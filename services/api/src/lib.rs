//! Storefront API service
//!
//! Serves the favorites endpoints (`GET /favorites`,
//! `POST /favorites/:productId`, `DELETE /favorites/:productId`) behind JWT
//! bearer authentication.

pub mod config;
pub mod error;
pub mod favorites;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
