//! Per-call cancellation and deadlines.
//!
//! A [`CallContext`] travels with every outbound call. It carries an
//! optional deadline and a cancellation token; child contexts inherit both,
//! so a parent deadline bounds every attempt and every backoff sleep made
//! on its behalf.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a [`CallContext`] stopped accepting work.
///
/// Returned verbatim by every operation that observes the context, so
/// callers can compare against it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The context was canceled explicitly.
    #[error("context canceled")]
    Canceled,

    /// The context's deadline passed.
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation and deadline scope for a logical call.
///
/// Cloning yields a handle to the same scope; use [`CallContext::child`],
/// [`CallContext::with_timeout`] or [`CallContext::with_deadline`] to derive
/// a narrower scope that is canceled together with its parent.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    token: CancellationToken,
}

impl CallContext {
    /// Creates a root context with no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Derives a child context sharing this context's deadline.
    ///
    /// Canceling the parent cancels the child; canceling the child leaves
    /// the parent untouched.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            deadline: self.deadline,
            token: self.token.child_token(),
        }
    }

    /// Derives a child context that expires after `timeout`.
    ///
    /// The effective deadline is the earlier of the parent's and the new one.
    /// A timeout too large to represent adds no deadline of its own.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.child(),
        }
    }

    /// Derives a child context that expires at `deadline`.
    ///
    /// The effective deadline is the earlier of the parent's and `deadline`.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let effective = self.deadline.map_or(deadline, |d| d.min(deadline));
        Self {
            deadline: Some(effective),
            token: self.token.child_token(),
        }
    }

    /// Cancels this context and every context derived from it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns the effective deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the underlying cancellation token.
    #[must_use]
    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Reports whether the context is already done.
    ///
    /// Cancellation wins over an expired deadline when both apply.
    #[must_use]
    pub fn err(&self) -> Option<ContextError> {
        if self.token.is_cancelled() {
            return Some(ContextError::Canceled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves once the context is canceled or its deadline passes.
    pub async fn done(&self) -> ContextError {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    () = self.token.cancelled() => ContextError::Canceled,
                    () = tokio::time::sleep_until(deadline) => ContextError::DeadlineExceeded,
                }
            }
            None => {
                self.token.cancelled().await;
                ContextError::Canceled
            }
        }
    }

    /// Runs `future` until it completes or the context is done.
    ///
    /// The future is dropped (and therefore aborted) when the context wins.
    ///
    /// # Errors
    ///
    /// Returns the [`ContextError`] that ended the context, either before the
    /// future started or while it was pending.
    pub async fn run<F: Future>(&self, future: F) -> Result<F::Output, ContextError> {
        if let Some(err) = self.err() {
            return Err(err);
        }
        tokio::select! {
            biased;
            err = self.done() => Err(err),
            output = future => Ok(output),
        }
    }
}
