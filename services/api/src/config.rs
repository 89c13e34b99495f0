//! Service configuration loaded from the environment

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// API service configuration
///
/// # Environment Variables
/// - `BIND_ADDRESS`: Socket address to listen on (default: "0.0.0.0:3001")
/// - `RUN_MIGRATIONS`: Apply embedded migrations at startup (default: true)
/// - `JWT_PUBLIC_KEY`: RS256 public key (PEM format) or path to a PEM file
/// - `JWT_SECRET`: HS256 shared secret, used when no public key is set
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub run_migrations: bool,
    pub jwt_public_key: Option<String>,
    pub jwt_secret: Option<String>,
}

impl ServerConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bind_address", "0.0.0.0:3001")?
            .set_default("run_migrations", true)?
            .add_source(Environment::default())
            .build()?
            .try_deserialize()
    }
}
