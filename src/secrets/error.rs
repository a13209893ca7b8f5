//! Error type for secret resolution.

use thiserror::Error;

use crate::transport::BoxError;

use super::SecretKey;

/// Error returned by a [`SecretResolver`](super::SecretResolver).
#[derive(Debug, Error)]
pub enum SecretError {
    /// No value is configured for the key.
    #[error("secret '{key}' is not configured")]
    Missing {
        /// The key that was requested
        key: SecretKey,
    },

    /// The backing store failed.
    #[error("failed to read secret '{key}': {source}")]
    Backend {
        /// The key that was requested
        key: SecretKey,
        /// Underlying failure
        #[source]
        source: BoxError,
    },
}

impl SecretError {
    /// The key whose resolution failed.
    #[must_use]
    pub const fn key(&self) -> SecretKey {
        match self {
            Self::Missing { key } | Self::Backend { key, .. } => *key,
        }
    }
}
