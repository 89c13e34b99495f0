//! API models for identifiers, favorites and request context

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

/// Identifier of a registered user, always positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    /// Accepts only positive identifiers
    pub fn new(id: i32) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a product, always positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i32);

impl ProductId {
    pub fn new(id: i32) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A product id path segment that is not a positive integer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Product id is not valid: {0:?}")]
pub struct InvalidProductId(pub String);

impl FromStr for ProductId {
    type Err = InvalidProductId;

    /// Only plain ASCII digits are accepted; signs and whitespace are not.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidProductId(s.to_string()));
        }

        s.parse::<i32>()
            .ok()
            .and_then(ProductId::new)
            .ok_or_else(|| InvalidProductId(s.to_string()))
    }
}

/// User role carried in the access token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

/// A persisted favorite row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FavoriteRecord {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of an idempotent add
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// The pair did not exist and was inserted
    Created(FavoriteRecord),
    /// The pair already existed; nothing was written
    Existing(FavoriteRecord),
}

impl AddOutcome {
    pub fn record(&self) -> &FavoriteRecord {
        match self {
            AddOutcome::Created(record) | AddOutcome::Existing(record) => record,
        }
    }

    pub fn into_record(self) -> FavoriteRecord {
        match self {
            AddOutcome::Created(record) | AddOutcome::Existing(record) => record,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, AddOutcome::Created(_))
    }
}
