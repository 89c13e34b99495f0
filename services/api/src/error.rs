//! Custom error types for the API service

use axum::{
    Json,
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::envelope::{ApiResponse, Empty};
use thiserror::Error;
use tracing::error;

use crate::favorites::FavoriteError;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or invalid bearer credential
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unexpected store failure; `detail` is passed through to the client
    #[error("{message}: {detail}")]
    Store {
        message: &'static str,
        detail: String,
    },
}

impl ApiError {
    /// Map a favorites error, labelling store failures with `message`
    pub fn favorites(message: &'static str) -> impl FnOnce(FavoriteError) -> ApiError {
        move |err| match err {
            FavoriteError::InvalidArgument(_) => {
                ApiError::BadRequest("Product id is not valid".to_string())
            }
            FavoriteError::Store(source) => {
                error!("{}: {:#}", message, source);
                ApiError::Store {
                    message,
                    detail: source.to_string(),
                }
            }
        }
    }
}

/// Path segments that axum cannot decode (e.g. invalid UTF-8) are malformed ids
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Rejected product id path: {}", rejection);
        ApiError::BadRequest("Product id is not valid".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::failure("Unauthorized", Empty {})),
            )
                .into_response(),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure(msg, Empty {})),
            )
                .into_response(),
            ApiError::Store { message, detail } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::failure(message, detail)),
            )
                .into_response(),
        }
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
