//! Remote configuration store contract and its implementations.
//!
//! DESIGN
//! ======
//! A store persists one serialized [`Configuration`] per user. `load` is an
//! atomic get-or-create: if the user has nothing stored yet, the supplied
//! default is persisted and returned. The serialized form is the JSON
//! produced by [`Configuration::encode`].
//!
//! ERROR HANDLING
//! ==============
//! Every failure is a [`StoreError`] carrying a stable [`ErrorCode`]. The
//! session converts failures into notifications; stores never retry.

pub mod memory;
pub mod postgres;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::{CodecError, Configuration};
use crate::resolve::ErrorCode;

pub use memory::{Fault, MemoryStore};
pub use postgres::PgStore;

/// Stable identity of a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("stored configuration is unreadable: {0}")]
    Codec(#[from] CodecError),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("permission denied for user {0}")]
    PermissionDenied(UserId),
}

impl ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Database(_) => "E_DATABASE",
            Self::Codec(_) => "E_CODEC",
            Self::Unavailable(_) => "E_UNAVAILABLE",
            Self::PermissionDenied(_) => "E_PERMISSION_DENIED",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Unavailable(_))
    }
}

/// Per-user configuration persistence.
#[async_trait::async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetch the stored configuration, creating it from `default` if absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store cannot be reached or the stored
    /// payload does not decode to the shape of `default`.
    async fn load(
        &self,
        user: &UserId,
        default: &Configuration,
    ) -> Result<Configuration, StoreError>;

    /// Replace the stored configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    async fn save(&self, user: &UserId, config: &Configuration) -> Result<(), StoreError>;
}
