//! Request and response values plus the one-round-trip client seam.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;

use super::{ResponseBody, TransportError};

type RewindFn = dyn Fn() -> std::io::Result<Vec<u8>> + Send + Sync;

/// Capability to regenerate a request body for a retry attempt.
///
/// A request either carries one of these or it does not; the executor
/// checks for its presence before every retry instead of attempting to
/// re-read a consumed body.
#[derive(Clone)]
pub struct BodyRewind(Arc<RewindFn>);

impl BodyRewind {
    /// Creates a rewind capability from a function producing a fresh body.
    pub fn new<F>(rewind: F) -> Self
    where
        F: Fn() -> std::io::Result<Vec<u8>> + Send + Sync + 'static,
    {
        Self(Arc::new(rewind))
    }

    /// Creates a rewind capability that replays a buffered copy of `body`.
    #[must_use]
    pub fn from_bytes(body: &[u8]) -> Self {
        let body: Arc<[u8]> = Arc::from(body);
        Self::new(move || Ok(body.to_vec()))
    }

    /// Produces a fresh copy of the body.
    ///
    /// # Errors
    ///
    /// Returns whatever I/O error the underlying function reports.
    pub fn rewind(&self) -> std::io::Result<Vec<u8>> {
        (self.0)()
    }
}

impl fmt::Debug for BodyRewind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BodyRewind(..)")
    }
}

/// One outbound Graph API call, before any attempt is made.
///
/// The body travels separately from its [`BodyRewind`] capability: a body
/// attached with [`HttpRequest::with_body`] is sent once and cannot be
/// retried, while [`HttpRequest::with_rewindable_body`] also keeps a copy
/// the executor can replay.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: http::Method,
    pub url: url::Url,
    pub headers: http::HeaderMap,
    /// Body for the first attempt
    pub body: Option<Vec<u8>>,
    /// Regenerates the body for later attempts
    pub rewind: Option<BodyRewind>,
}

impl HttpRequest {
    /// A request without headers or body.
    #[must_use]
    pub fn new(method: http::Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: http::HeaderMap::new(),
            body: None,
            rewind: None,
        }
    }

    /// Shorthand for `new(Method::GET, url)`.
    #[must_use]
    pub fn get(url: url::Url) -> Self {
        Self::new(http::Method::GET, url)
    }

    /// Shorthand for `new(Method::POST, url)`.
    #[must_use]
    pub fn post(url: url::Url) -> Self {
        Self::new(http::Method::POST, url)
    }

    /// Creates a request with a JSON body that can be replayed on retries.
    ///
    /// Sets `Content-Type: application/json`.
    ///
    /// # Errors
    ///
    /// Returns an error if `body` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(
        method: http::Method,
        url: url::Url,
        body: &T,
    ) -> Result<Self, serde_json::Error> {
        let encoded = serde_json::to_vec(body)?;
        Ok(Self::new(method, url)
            .with_header(
                http::header::CONTENT_TYPE,
                http::HeaderValue::from_static("application/json"),
            )
            .with_rewindable_body(encoded))
    }

    /// Sets a one-shot request body.
    ///
    /// Without a rewind capability a non-empty body cannot be retried.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the request body and keeps a copy for replaying it on retries.
    #[must_use]
    pub fn with_rewindable_body(mut self, body: Vec<u8>) -> Self {
        self.rewind = Some(BodyRewind::from_bytes(&body));
        self.body = Some(body);
        self
    }

    /// Sets the function used to regenerate the body on retries.
    #[must_use]
    pub fn with_rewind(mut self, rewind: BodyRewind) -> Self {
        self.rewind = Some(rewind);
        self
    }

    /// Appends a header value, keeping any existing values for `name`.
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Returns true if the request carries a non-empty body.
    #[must_use]
    pub fn has_body(&self) -> bool {
        self.body.as_ref().is_some_and(|body| !body.is_empty())
    }

    /// Returns true if the body (if any) can be regenerated for a retry.
    #[must_use]
    pub fn is_rewindable(&self) -> bool {
        !self.has_body() || self.rewind.is_some()
    }
}

/// Method and URL of the request that produced a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    /// HTTP method used in the request
    pub method: http::Method,
    /// Fully resolved URL that was requested
    pub url: url::Url,
}

/// An HTTP response received from a server.
///
/// The body is a stream owned by whoever holds the response: read it with
/// [`ResponseBody::bytes`], or release it with [`ResponseBody::drain`] so
/// the underlying connection can be reused. Dropping it also releases it.
#[derive(Debug)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: http::StatusCode,
    /// Response headers
    pub headers: http::HeaderMap,
    /// Response body (streamed)
    pub body: ResponseBody,
    /// The request this response answers, when known
    pub request: Option<RequestLine>,
}

impl HttpResponse {
    /// Creates a new HTTP response.
    #[must_use]
    pub const fn new(status: http::StatusCode, headers: http::HeaderMap, body: ResponseBody) -> Self {
        Self {
            status,
            headers,
            body,
            request: None,
        }
    }

    /// Creates a response with a fully buffered body.
    #[must_use]
    pub fn from_bytes(
        status: http::StatusCode,
        headers: http::HeaderMap,
        body: impl Into<Bytes>,
    ) -> Self {
        Self::new(status, headers, ResponseBody::from_bytes(body))
    }

    /// Records the request that produced this response.
    #[must_use]
    pub fn with_request(mut self, method: http::Method, url: url::Url) -> Self {
        self.request = Some(RequestLine { method, url });
        self
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Takes the body out of the response, leaving an empty one behind.
    ///
    /// Lets callers read the body while keeping status and headers around,
    /// e.g. to build an error from both.
    pub fn take_body(&mut self) -> ResponseBody {
        std::mem::take(&mut self.body)
    }
}

/// A single HTTP round trip.
///
/// Implementations never retry on their own; the
/// [`Executor`](super::Executor) layers retries on top. Cancellation
/// happens by dropping the returned future.
///
/// # Example
///
/// ```ignore
/// use wacloud::transport::{HttpClient, HttpRequest, HttpResponse, TransportError};
///
/// struct MockClient;
///
/// impl HttpClient for MockClient {
///     async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, TransportError> {
///         Ok(HttpResponse::from_bytes(http::StatusCode::OK, http::HeaderMap::new(), "ok"))
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Sends `req` once.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no response status was received.
    /// Error statuses are `Ok` responses.
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, TransportError>> + Send;
}
