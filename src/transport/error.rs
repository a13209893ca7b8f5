//! Error types for transport and execution failures.

use thiserror::Error;

use crate::context::ContextError;

/// Boxed error used as the source of opaque transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for a single raw network round trip.
///
/// Describes what went wrong without dictating recovery strategy; the
/// classifier in [`is_transient`](super::is_transient) decides whether a
/// failure is worth retrying.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    ///
    /// The source chain is kept intact so transient socket errors
    /// (reset, aborted, unreachable) can be recognized.
    #[error("Connection error: {0}")]
    Connection(#[source] BoxError),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// Host name resolution failed.
    ///
    /// Only custom transports report this; [`ReqwestClient`](super::ReqwestClient)
    /// surfaces resolver failures as [`Connection`](Self::Connection) with
    /// the I/O error in the source chain.
    #[error("DNS resolution failed for '{host}'")]
    Dns {
        /// Host that could not be resolved
        host: String,
        /// The resolver gave up waiting
        timeout: bool,
        /// The resolver reported a temporary condition
        temporary: bool,
    },

    /// The provided URL or request could not be built.
    ///
    /// This typically indicates a configuration error rather than
    /// a transient failure.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The connection was already closed locally.
    ///
    /// [`ReqwestClient`](super::ReqwestClient) reports hyper's closed
    /// connection condition here.
    #[error("Connection already closed")]
    Closed,

    /// The transport observed an explicit cancellation.
    ///
    /// Only custom transports report this. With
    /// [`ReqwestClient`](super::ReqwestClient) a call is canceled by
    /// dropping its future, which the executor observes as a
    /// [`ContextError`](crate::context::ContextError).
    #[error("Request canceled")]
    Canceled,

    /// Reading the response body failed.
    #[error("Failed to read response body: {0}")]
    Body(#[source] BoxError),

    /// Any other transport failure (TLS verification, protocol errors, ...).
    #[error("Transport error: {0}")]
    Other(#[source] BoxError),
}

/// Error type for a logical call run through the
/// [`Executor`](super::Executor).
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// A retry was required but the request body cannot be regenerated.
    #[error("request body is not rewindable; attach a rewind function to enable retries")]
    BodyNotRewindable,

    /// The rewind function failed to produce a fresh body.
    #[error("failed to rewind request body: {0}")]
    Rewind(#[source] std::io::Error),

    /// The transport failed and the failure was not retried (or retries ran out).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The call context was canceled or its deadline passed.
    #[error(transparent)]
    Context(#[from] ContextError),
}

impl ExecuteError {
    /// Returns the context error, if this failure came from cancellation or a deadline.
    #[must_use]
    pub const fn context_error(&self) -> Option<ContextError> {
        match self {
            Self::Context(err) => Some(*err),
            _ => None,
        }
    }

    /// Returns true if the call stopped because its deadline passed.
    #[must_use]
    pub const fn is_deadline_exceeded(&self) -> bool {
        matches!(self, Self::Context(ContextError::DeadlineExceeded))
    }

    /// Returns true if the call stopped because its context was canceled.
    #[must_use]
    pub const fn is_canceled(&self) -> bool {
        matches!(self, Self::Context(ContextError::Canceled))
    }
}
