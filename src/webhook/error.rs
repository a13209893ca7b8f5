//! Error types for webhook validation and parsing.

use thiserror::Error;

use crate::context::ContextError;
use crate::secrets::{SecretError, SecretKey};

/// Why a handshake or delivery failed authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The handshake carried no verify token.
    #[error("verify token is empty")]
    EmptyVerifyToken,

    /// The handshake token does not match the configured one.
    #[error("verify token mismatch")]
    VerifyTokenMismatch,

    /// The delivery has no body to verify.
    #[error("empty body")]
    EmptyBody,

    /// The signature header is missing the `sha256=` prefix or a digest.
    #[error("invalid signature header format")]
    InvalidSignatureFormat,

    /// The digest is not valid hex.
    #[error("invalid signature hex: {0}")]
    InvalidSignatureHex(#[from] hex::FromHexError),

    /// The digest does not match the body.
    #[error("signature mismatch")]
    SignatureMismatch,

    /// The secret needed for the check could not be resolved.
    #[error("failed to read {key} for {operation}: {source}")]
    Secret {
        /// Secret that was requested
        key: SecretKey,
        /// Check that needed it
        operation: &'static str,
        /// Resolver failure
        #[source]
        source: SecretError,
    },

    /// The call context ended before the secret was resolved.
    #[error("secret lookup interrupted: {0}")]
    Context(#[from] ContextError),
}

impl AuthError {
    /// Returns true if the failure is a configuration problem on our side
    /// rather than a bad request from the sender.
    #[must_use]
    pub const fn is_secret_error(&self) -> bool {
        matches!(self, Self::Secret { .. })
    }

    /// Returns the context error, if the check was canceled or timed out.
    #[must_use]
    pub const fn context_error(&self) -> Option<ContextError> {
        match self {
            Self::Context(err) => Some(*err),
            _ => None,
        }
    }
}

/// The delivery body is not a valid webhook payload.
#[derive(Debug, Error)]
#[error("invalid webhook payload: {0}")]
pub struct ParseError(#[from] serde_json::Error);
