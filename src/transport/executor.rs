//! Resilient request execution with bounded retries.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::context::{CallContext, ContextError};
use crate::time::{Sleeper, TokioSleeper};

use super::backoff::{JitterSource, ThreadRngJitter};
use super::classify::is_transient;
use super::{BodyRewind, ExecuteError, ExecutorConfig, HttpClient, HttpRequest, HttpResponse};

/// Runs one logical HTTP call with retries, backoff and cancellation.
///
/// Attempt 0 sends the request unchanged. A transient transport failure or
/// a response whose status the [`RetryPolicy`](super::RetryPolicy) accepts
/// triggers a retry while attempts remain: the failed response body is
/// drained, the request body is rewound, and the executor sleeps for the
/// jittered backoff before trying again. Retries are strictly sequential.
///
/// Any response that is not retried, including the last one when retries
/// run out, is returned as `Ok` whatever its status; decoding error
/// statuses is the caller's job.
///
/// # Type Parameters
///
/// - `C`: The HTTP client implementation (one round trip per call)
/// - `S`: The sleeper implementation for retry delays (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```no_run
/// use wacloud::context::CallContext;
/// use wacloud::transport::{Executor, HttpRequest, ReqwestClient};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let executor = Executor::new(ReqwestClient::new());
/// let ctx = CallContext::background().with_timeout(Duration::from_secs(10));
/// let url = url::Url::parse("https://graph.facebook.com/v20.0/me")?;
/// let response = executor.execute(&ctx, HttpRequest::get(url)).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Executor<C, S = TokioSleeper> {
    client: C,
    sleeper: S,
    config: ExecutorConfig,
    jitter: Arc<dyn JitterSource>,
}

impl<C> Executor<C, TokioSleeper> {
    /// Creates an executor with the default configuration.
    ///
    /// Uses [`TokioSleeper`] for delays and thread-local jitter.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self {
            client,
            sleeper: TokioSleeper,
            config: ExecutorConfig::default(),
            jitter: Arc::new(ThreadRngJitter),
        }
    }
}

impl<C, S> Executor<C, S> {
    /// Sets a custom sleeper for retry delays.
    ///
    /// This is primarily useful for testing to avoid actual delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> Executor<C, S2> {
        Executor {
            client: self.client,
            sleeper,
            config: self.config,
            jitter: self.jitter,
        }
    }

    /// Sets the retry configuration.
    #[must_use]
    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the jitter source used for backoff delays.
    #[must_use]
    pub fn with_jitter(mut self, jitter: impl JitterSource + 'static) -> Self {
        self.jitter = Arc::new(jitter);
        self
    }

    /// Returns the retry configuration.
    #[must_use]
    pub const fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }
}

impl<C: HttpClient, S: Sleeper> Executor<C, S> {
    /// Executes `request` under `ctx`.
    ///
    /// # Errors
    ///
    /// - [`ExecuteError::BodyNotRewindable`] when a retry is needed for a
    ///   request whose body has no rewind capability; no further network
    ///   call is made
    /// - [`ExecuteError::Rewind`] when the rewind function fails
    /// - [`ExecuteError::Transport`] for a non-transient transport failure, or
    ///   a transient one once retries are exhausted
    /// - [`ExecuteError::Context`] when `ctx` is canceled or its deadline
    ///   passes, during an attempt or a backoff sleep
    pub async fn execute(
        &self,
        ctx: &CallContext,
        request: HttpRequest,
    ) -> Result<HttpResponse, ExecuteError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
            rewind,
        } = request;
        let body_present = body.is_some();
        let needs_rewind = body.as_ref().is_some_and(|b| !b.is_empty());
        let mut body = body;
        let mut attempt: u32 = 0;

        loop {
            debug!(attempt, %method, %url, "Sending request");
            let attempt_request = HttpRequest {
                method: method.clone(),
                url: url.clone(),
                headers: headers.clone(),
                body: body.take(),
                rewind: None,
            };
            let sent = ctx.run(self.client.request(attempt_request)).await?;
            let retry_left = self.config.has_retry_after(attempt);

            match sent {
                Ok(response) => {
                    if !self.config.retry_policy.should_retry(response.status) {
                        return Ok(response.with_request(method, url));
                    }
                    if !retry_left {
                        debug!(attempt, status = response.status.as_u16(), "Retries exhausted");
                        return Ok(response.with_request(method, url));
                    }
                    warn!(attempt, status = response.status.as_u16(), "Retryable status, retrying");
                    release(ctx, response).await?;
                }
                Err(err) => {
                    if !retry_left || !is_transient(&err) {
                        return Err(err.into());
                    }
                    warn!(attempt, error = %err, "Transient transport error, retrying");
                }
            }

            body = rewind_body(body_present, needs_rewind, rewind.as_ref())?;
            let delay = self.config.delay_for_retry(attempt, self.jitter.as_ref());
            debug!(attempt, delay_ms = delay.as_millis(), "Backing off");
            ctx.run(self.sleeper.sleep(delay)).await?;
            attempt += 1;
        }
    }
}

/// Drains a response that is about to be retried so its connection can be reused.
async fn release(ctx: &CallContext, response: HttpResponse) -> Result<(), ContextError> {
    if let Err(err) = ctx.run(response.body.drain()).await? {
        debug!(error = %err, "Failed to drain response body");
    }
    Ok(())
}

/// Produces the body for the next attempt.
fn rewind_body(
    body_present: bool,
    needs_rewind: bool,
    rewind: Option<&BodyRewind>,
) -> Result<Option<Vec<u8>>, ExecuteError> {
    if !needs_rewind {
        return Ok(body_present.then(Vec::new));
    }
    let rewind = rewind.ok_or(ExecuteError::BodyNotRewindable)?;
    rewind.rewind().map(Some).map_err(ExecuteError::Rewind)
}
