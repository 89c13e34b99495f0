//! Client error types

use thiserror::Error;

/// Errors returned by the favorites client
#[derive(Error, Debug)]
pub enum ClientError {
    /// The server rejected the bearer credential
    #[error("Unauthenticated")]
    Unauthenticated,

    /// The server answered with `success: false`
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Transport failure or undecodable body
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// The envelope's `data` did not have the expected shape
    #[error("JSON deserialization error: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;
