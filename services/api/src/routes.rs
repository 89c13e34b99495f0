//! API service routes

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use common::envelope::{ApiResponse, Empty};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::{AuthUser, auth_middleware},
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/favorites", get(list_favorites))
        .route(
            "/favorites/:product_id",
            post(add_favorite).delete(remove_favorite),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

/// List the product ids favorited by the current user
pub async fn list_favorites(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let product_ids = state
        .favorites
        .list(user.id)
        .await
        .map_err(ApiError::favorites("Error retrieving favorites"))?;

    Ok(Json(ApiResponse::ok(
        "Favorites retrieved successfully",
        product_ids,
    )))
}

/// Add a product to the current user's favorites
///
/// Answers 201 when the favorite is created and 200 when it already existed.
pub async fn add_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Path(product_id), _): WithRejection<Path<String>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let outcome = state
        .favorites
        .add(user.id, &product_id)
        .await
        .map_err(ApiError::favorites("Error adding favorite"))?;

    let (status, message) = if outcome.is_created() {
        (StatusCode::CREATED, "Product added to favorites")
    } else {
        (StatusCode::OK, "Product already in favorites")
    };

    Ok((status, Json(ApiResponse::ok(message, outcome.into_record()))))
}

/// Remove a product from the current user's favorites
pub async fn remove_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Path(product_id), _): WithRejection<Path<String>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    state
        .favorites
        .remove(user.id, &product_id)
        .await
        .map_err(ApiError::favorites("Error removing favorite"))?;

    Ok(Json(ApiResponse::ok(
        "Product removed from favorites",
        Empty {},
    )))
}
