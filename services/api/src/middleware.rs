//! Authentication middleware for JWT token validation

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    config::ServerConfig,
    error::ApiError,
    models::{Role, UserId},
    state::AppState,
};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: i32,
    /// User role
    #[serde(default)]
    pub role: Role,
    /// Issued at time
    #[serde(default)]
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Authenticated user information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: UserId,
    pub role: Role,
}

/// Verifies access tokens with a key built once at startup
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// Build a verifier from the service configuration
    ///
    /// `JWT_PUBLIC_KEY` selects RS256 and takes precedence over `JWT_SECRET`
    /// (HS256). The public key may be inline PEM or a path to a PEM file.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let public_key = config.jwt_public_key.as_deref().filter(|k| !k.is_empty());
        let secret = config.jwt_secret.as_deref().filter(|s| !s.is_empty());

        match (public_key, secret) {
            (Some(public_key), _) => {
                let pem = if public_key.starts_with("-----BEGIN") {
                    public_key.to_string()
                } else {
                    std::fs::read_to_string(public_key)
                        .map_err(|e| anyhow::anyhow!("Failed to read public key file: {}", e))?
                        .trim()
                        .to_string()
                };
                let decoding_key = DecodingKey::from_rsa_pem(pem.as_bytes())?;
                Ok(Self::new(decoding_key, Algorithm::RS256))
            }
            (None, Some(secret)) => Ok(Self::with_secret(secret.as_bytes())),
            (None, None) => anyhow::bail!("Either JWT_PUBLIC_KEY or JWT_SECRET must be set"),
        }
    }

    /// HS256 verifier over a shared secret
    pub fn with_secret(secret: &[u8]) -> Self {
        Self::new(DecodingKey::from_secret(secret), Algorithm::HS256)
    }

    fn new(decoding_key: DecodingKey, algorithm: Algorithm) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = true;

        Self {
            decoding_key,
            validation,
        }
    }

    /// Validate a token and resolve the user it was issued to
    pub fn verify(&self, token: &str) -> Result<AuthUser, ApiError> {
        let token_data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                warn!("Failed to validate token: {}", e);
                ApiError::Unauthorized
            })?;

        let claims = token_data.claims;
        let id = UserId::new(claims.sub).ok_or_else(|| {
            warn!("Token subject {} is not a valid user id", claims.sub);
            ApiError::Unauthorized
        })?;

        Ok(AuthUser {
            id,
            role: claims.role,
        })
    }
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(ApiError::Unauthorized)?;

    let user = state.jwt.verify(bearer.token())?;
    debug!("Authenticated user {} with role {:?}", user.id, user.role);

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or(ApiError::Unauthorized)
    }
}
