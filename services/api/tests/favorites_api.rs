//! End-to-end tests for the favorites endpoints
//!
//! The router is served on an ephemeral port with the in-memory store (or a
//! store that always fails) and an HS256 verifier, and driven over HTTP with
//! reqwest.

use std::sync::Arc;

use anyhow::Result;
use api::{
    AppState, create_router,
    favorites::FavoritesService,
    middleware::{Claims, JwtVerifier},
    models::{AddOutcome, ProductId, Role, UserId},
    repositories::{FavoriteStore, memory::InMemoryFavoriteStore},
};
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::StatusCode;
use serde_json::{Value, json};

const SECRET: &[u8] = b"integration-secret";

struct TestServer<S = InMemoryFavoriteStore> {
    base_url: String,
    store: Arc<S>,
    http: reqwest::Client,
}

impl TestServer {
    async fn start() -> Self {
        Self::serve(Arc::new(InMemoryFavoriteStore::new())).await
    }
}

impl<S: FavoriteStore + 'static> TestServer<S> {
    async fn serve(store: Arc<S>) -> Self {
        let state = AppState {
            favorites: FavoritesService::new(store.clone()),
            jwt: JwtVerifier::with_secret(SECRET),
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, create_router(state)).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            store,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut request = self.http.request(method, self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.unwrap();
        let status = response.status();
        let body = response.json::<Value>().await.unwrap();
        (status, body)
    }

    async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(reqwest::Method::GET, path, token).await
    }

    async fn post(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(reqwest::Method::POST, path, token).await
    }

    async fn delete(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(reqwest::Method::DELETE, path, token).await
    }
}

/// Store whose every call fails like an unreachable database
struct FailingStore;

#[async_trait]
impl FavoriteStore for FailingStore {
    async fn list_product_ids(&self, _: UserId) -> Result<Vec<i32>> {
        Err(anyhow::anyhow!("connection refused"))
    }

    async fn add(&self, _: UserId, _: ProductId) -> Result<AddOutcome> {
        Err(anyhow::anyhow!("connection refused"))
    }

    async fn remove(&self, _: UserId, _: ProductId) -> Result<bool> {
        Err(anyhow::anyhow!("connection refused"))
    }
}

fn now() -> u64 {
    chrono::Utc::now().timestamp() as u64
}

fn token_for(user_id: i32) -> String {
    token_with_exp(user_id, now() + 900)
}

fn token_with_exp(user_id: i32, exp: u64) -> String {
    let claims = Claims {
        sub: user_id,
        role: Role::User,
        iat: now(),
        exp,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET),
    )
    .unwrap()
}

#[tokio::test]
async fn test_health_check_needs_no_token() {
    let server = TestServer::start().await;

    let (status, body) = server.get("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "service": "api-service"}));
}

#[tokio::test]
async fn test_empty_favorites_list() {
    let server = TestServer::start().await;
    let token = token_for(1);

    let (status, body) = server.get("/favorites", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "message": "Favorites retrieved successfully",
            "data": []
        })
    );
}

#[tokio::test]
async fn test_add_twice_returns_created_then_ok() {
    let server = TestServer::start().await;
    let token = token_for(1);

    let (status, first) = server.post("/favorites/42", Some(&token)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["success"], json!(true));
    assert_eq!(first["message"], json!("Product added to favorites"));
    assert_eq!(first["data"]["user_id"], json!(1));
    assert_eq!(first["data"]["product_id"], json!(42));

    let (status, second) = server.post("/favorites/42", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["message"], json!("Product already in favorites"));
    assert_eq!(second["data"]["id"], first["data"]["id"]);

    let (status, list) = server.get("/favorites", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["data"], json!([42]));
    assert_eq!(server.store.len().await, 1);
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let server = TestServer::start().await;
    let token = token_for(1);

    server.post("/favorites/42", Some(&token)).await;

    for _ in 0..2 {
        let (status, body) = server.delete("/favorites/42", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "success": true,
                "message": "Product removed from favorites",
                "data": {}
            })
        );
    }

    let (_, list) = server.get("/favorites", Some(&token)).await;
    assert_eq!(list["data"], json!([]));
}

#[tokio::test]
async fn test_non_numeric_product_id_is_rejected_without_mutation() {
    let server = TestServer::start().await;
    let token = token_for(1);
    server.post("/favorites/7", Some(&token)).await;

    let expected = json!({
        "success": false,
        "message": "Product id is not valid",
        "data": {}
    });

    let (status, body) = server.post("/favorites/abc", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, expected);

    let (status, body) = server.delete("/favorites/abc", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, expected);

    let (status, _) = server.post("/favorites/0", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = server.post("/favorites/+7", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(server.store.len().await, 1);
    let (_, list) = server.get("/favorites", Some(&token)).await;
    assert_eq!(list["data"], json!([7]));
}

#[tokio::test]
async fn test_undecodable_product_id_segment_gets_envelope() {
    let server = TestServer::start().await;
    let token = token_for(1);
    let expected = json!({
        "success": false,
        "message": "Product id is not valid",
        "data": {}
    });

    // %FF decodes to a byte that is not valid UTF-8.
    let (status, body) = server.post("/favorites/%FF", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, expected);

    let (status, body) = server.delete("/favorites/%FF", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, expected);

    assert!(server.store.is_empty().await);
}

#[tokio::test]
async fn test_store_failures_return_error_envelope() {
    let server = TestServer::serve(Arc::new(FailingStore)).await;
    let token = token_for(1);

    let (status, body) = server.get("/favorites", Some(&token)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({
            "success": false,
            "message": "Error retrieving favorites",
            "data": "connection refused"
        })
    );

    let (status, body) = server.post("/favorites/42", Some(&token)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({
            "success": false,
            "message": "Error adding favorite",
            "data": "connection refused"
        })
    );

    let (status, body) = server.delete("/favorites/42", Some(&token)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({
            "success": false,
            "message": "Error removing favorite",
            "data": "connection refused"
        })
    );

    // Malformed ids are still rejected before the store is reached.
    let (status, _) = server.post("/favorites/abc", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_or_invalid_credentials_are_unauthorized() {
    let server = TestServer::start().await;
    let unauthorized = json!({
        "success": false,
        "message": "Unauthorized",
        "data": {}
    });

    let (status, body) = server.get("/favorites", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, unauthorized);

    let (status, _) = server.post("/favorites/42", Some("garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let expired = token_with_exp(1, now() - 3600);
    let (status, _) = server.delete("/favorites/42", Some(&expired)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert!(server.store.is_empty().await);
}

#[tokio::test]
async fn test_favorites_are_isolated_between_users() {
    let server = TestServer::start().await;
    let alice = token_for(1);
    let bob = token_for(2);

    server.post("/favorites/10", Some(&alice)).await;
    server.post("/favorites/11", Some(&alice)).await;
    server.post("/favorites/20", Some(&bob)).await;
    server.delete("/favorites/10", Some(&bob)).await;

    let (_, list) = server.get("/favorites", Some(&alice)).await;
    assert_eq!(list["data"], json!([10, 11]));

    let (_, list) = server.get("/favorites", Some(&bob)).await;
    assert_eq!(list["data"], json!([20]));
}
