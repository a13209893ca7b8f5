//! Access token providers.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use crate::secrets::mask;
use crate::transport::BoxError;

/// Error returned by a [`TokenProvider`].
#[derive(Debug, Error)]
pub enum TokenError {
    /// The provider has no token to hand out.
    #[error("access token is empty")]
    Empty,

    /// The provider failed to obtain a token.
    #[error("token provider failed: {0}")]
    Provider(#[source] BoxError),
}

/// Supplies the bearer token for Graph API calls.
///
/// Called once per logical call, before the first attempt, so rotating
/// providers can refresh between calls.
pub trait TokenProvider: Send + Sync {
    /// Returns the current access token.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError`] when no usable token is available.
    fn token(&self) -> impl Future<Output = Result<String, TokenError>> + Send;
}

impl<T: TokenProvider> TokenProvider for Arc<T> {
    fn token(&self) -> impl Future<Output = Result<String, TokenError>> + Send {
        (**self).token()
    }
}

/// A fixed, long-lived access token (e.g. a system user token).
#[derive(Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    /// Wraps `token`.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenProvider for StaticToken {
    async fn token(&self) -> Result<String, TokenError> {
        if self.token.trim().is_empty() {
            return Err(TokenError::Empty);
        }
        Ok(self.token.clone())
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StaticToken").field(&mask(&self.token)).finish()
    }
}
