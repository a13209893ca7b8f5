//! Error type for client calls.

use thiserror::Error;

use crate::context::ContextError;
use crate::error::GraphError;
use crate::transport::{ExecuteError, TransportError, is_transient};

use super::TokenError;

/// Error returned by [`Client`](super::Client) calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The access token could not be obtained.
    #[error("failed to get access token: {0}")]
    Token(#[from] TokenError),

    /// The access token cannot be sent as a header.
    #[error("access token contains characters not allowed in a header")]
    InvalidToken,

    /// The endpoint path does not form a valid URL.
    #[error("invalid endpoint '{path}': {source}")]
    InvalidEndpoint {
        /// Path relative to the versioned base URL
        path: String,
        /// Parse failure
        #[source]
        source: url::ParseError,
    },

    /// The request body could not be encoded.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The request failed before a response was accepted.
    #[error(transparent)]
    Execute(#[from] ExecuteError),

    /// The Graph API answered with an error status.
    #[error(transparent)]
    Api(#[from] GraphError),

    /// Reading the response body failed.
    #[error("failed to read response body: {0}")]
    Body(#[source] TransportError),

    /// The call context ended while the response was being read.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// The response body is not the expected JSON.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ClientError {
    /// The Graph error, if the API answered with an error status.
    #[must_use]
    pub const fn graph_error(&self) -> Option<&GraphError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the context error, if the call was canceled or timed out.
    #[must_use]
    pub const fn context_error(&self) -> Option<ContextError> {
        match self {
            Self::Context(err) => Some(*err),
            Self::Execute(err) => err.context_error(),
            _ => None,
        }
    }

    /// Returns true if repeating the whole call later might succeed.
    ///
    /// Covers retryable Graph statuses (429, 5xx except 501/505) and
    /// transient transport failures. Only worth acting on for idempotent
    /// calls, since the executor has already spent its own retries.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api(err) => err.is_retryable(),
            Self::Execute(ExecuteError::Transport(err)) | Self::Body(err) => is_transient(err),
            _ => false,
        }
    }
}
