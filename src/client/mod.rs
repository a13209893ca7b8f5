//! Graph API client facade.
//!
//! [`Client`] ties the validated configuration, an access token provider
//! and the retrying [`Executor`] together: it builds versioned Graph URLs,
//! injects the `Authorization` and `User-Agent` headers, bounds each call
//! by the configured timeout, and turns error responses into
//! [`GraphError`](crate::error::GraphError)s.

mod error;
mod token;


pub use error::ClientError;
pub use token::{StaticToken, TokenError, TokenProvider};

use http::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use http::{HeaderValue, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::ValidatedConfig;
use crate::context::CallContext;
use crate::error::read_error;
use crate::time::{Sleeper, TokioSleeper};
use crate::transport::{Executor, HttpClient, HttpRequest, HttpResponse, JitterSource};

/// Authenticated Graph API client.
///
/// # Type Parameters
///
/// - `C`: The HTTP client implementation
/// - `T`: The access token provider
/// - `S`: The sleeper used between retries (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```no_run
/// use wacloud::client::{Client, StaticToken};
/// use wacloud::config::ValidatedConfig;
/// use wacloud::context::CallContext;
/// use wacloud::transport::ReqwestClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ValidatedConfig::load(std::path::Path::new("wacloud.toml"))?;
/// let client = Client::new(config, ReqwestClient::new(), StaticToken::new("EAAG..."));
///
/// let phone: serde_json::Value = client
///     .call_json(&CallContext::background(), http::Method::GET, "106540352242922", None::<&()>)
///     .await?;
/// println!("{phone}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client<C, T, S = TokioSleeper> {
    config: ValidatedConfig,
    executor: Executor<C, S>,
    token: T,
}

impl<C, T> Client<C, T, TokioSleeper> {
    /// Creates a client whose retry behavior follows `config`.
    #[must_use]
    pub fn new(config: ValidatedConfig, http: C, token: T) -> Self {
        let executor = Executor::new(http).with_config(config.executor_config());
        Self {
            config,
            executor,
            token,
        }
    }
}

impl<C, T, S> Client<C, T, S> {
    /// Sets a custom sleeper for retry delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> Client<C, T, S2> {
        Client {
            config: self.config,
            executor: self.executor.with_sleeper(sleeper),
            token: self.token,
        }
    }

    /// Sets the jitter source used for backoff delays.
    #[must_use]
    pub fn with_jitter(mut self, jitter: impl JitterSource + 'static) -> Self {
        self.executor = self.executor.with_jitter(jitter);
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    /// Returns the executor.
    #[must_use]
    pub const fn executor(&self) -> &Executor<C, S> {
        &self.executor
    }

    /// Builds `{base_url}/{version}/{path}`.
    ///
    /// `path` may carry a query string.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEndpoint`] if the result is not a valid URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        let base = self.config.base_url.as_str().trim_end_matches('/');
        let raw = format!(
            "{base}/{}/{}",
            self.config.version,
            path.trim_start_matches('/')
        );
        Url::parse(&raw).map_err(|source| ClientError::InvalidEndpoint {
            path: path.to_string(),
            source,
        })
    }
}

impl<C: HttpClient, T: TokenProvider, S: Sleeper> Client<C, T, S> {
    /// Sends `request` with authentication, under the configured timeout.
    ///
    /// Error statuses are returned as responses; see
    /// [`call_json`](Self::call_json) for typed errors.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Token`] / [`ClientError::InvalidToken`] when no
    ///   usable token is available
    /// - [`ClientError::Execute`] when the executor gives up
    pub async fn execute(
        &self,
        ctx: &CallContext,
        request: HttpRequest,
    ) -> Result<HttpResponse, ClientError> {
        let ctx = ctx.with_timeout(self.config.timeout);
        self.send(&ctx, request).await
    }

    /// Calls `path` and decodes a JSON response.
    ///
    /// The optional `body` is sent as JSON and can be replayed on retries.
    /// The timeout covers every attempt plus reading the response.
    ///
    /// # Errors
    ///
    /// Everything [`execute`](Self::execute) returns, plus:
    /// - [`ClientError::Api`] for a non-2xx response
    /// - [`ClientError::Body`] / [`ClientError::Context`] while reading
    /// - [`ClientError::Decode`] if the body is not the expected JSON
    pub async fn call_json<B, R>(
        &self,
        ctx: &CallContext,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let request = match body {
            Some(body) => HttpRequest::json(method, url, body).map_err(ClientError::Encode)?,
            None => HttpRequest::new(method, url),
        }
        .with_header(ACCEPT, HeaderValue::from_static("application/json"));

        let ctx = ctx.with_timeout(self.config.timeout);
        let response = self.send(&ctx, request).await?;

        if !response.is_success() {
            let err = ctx.run(read_error(response)).await?;
            debug!(error = %err, "Graph API call failed");
            return Err(ClientError::Api(err));
        }

        let bytes = ctx
            .run(response.body.bytes())
            .await?
            .map_err(ClientError::Body)?;
        serde_json::from_slice(&bytes).map_err(ClientError::Decode)
    }

    async fn send(
        &self,
        ctx: &CallContext,
        mut request: HttpRequest,
    ) -> Result<HttpResponse, ClientError> {
        let token = ctx.run(self.token.token()).await??;
        let mut authorization = HeaderValue::try_from(format!("Bearer {token}"))
            .map_err(|_| ClientError::InvalidToken)?;
        authorization.set_sensitive(true);

        request.headers.insert(AUTHORIZATION, authorization);
        request
            .headers
            .insert(USER_AGENT, self.config.user_agent.clone());

        Ok(self.executor.execute(ctx, request).await?)
    }
}
