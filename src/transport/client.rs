//! Production HTTP client implementation using reqwest.

use tokio_stream::StreamExt;

use super::{HttpClient, HttpRequest, HttpResponse, ResponseBody, TransportError};

/// Production HTTP client using reqwest.
///
/// This is a thin wrapper around `reqwest::Client` that implements
/// the [`HttpClient`] trait. It inherits reqwest's default configuration
/// including connection pooling. No global timeout is set; deadlines come
/// from the [`CallContext`](crate::context::CallContext) of each call so
/// response bodies can still be streamed.
///
/// # Example
///
/// ```no_run
/// use wacloud::transport::{ReqwestClient, HttpClient, HttpRequest};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::new();
/// let url = Url::parse("https://graph.facebook.com/v20.0/me")?;
/// let response = client.request(HttpRequest::get(url)).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates an HTTP client with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Creates an HTTP client from an existing reqwest client.
    ///
    /// Useful when you need custom configuration (proxies, TLS, etc.).
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = req.method.clone();
        let mut builder = self
            .inner
            .request(req.method, req.url.as_str())
            .headers(req.headers);

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_send_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().clone();
        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(map_body_error));

        let body = ResponseBody::from_stream(chunks);

        Ok(HttpResponse::new(status, headers, body).with_request(method, url))
    }
}

fn map_send_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if hyper_cause(&err).is_some_and(hyper::Error::is_closed) {
        TransportError::Closed
    } else if err.is_builder() {
        TransportError::InvalidUrl(err.to_string())
    } else if err.is_connect() {
        TransportError::Connection(Box::new(err))
    } else {
        TransportError::Other(Box::new(err))
    }
}

/// First hyper error in the source chain of `err`.
pub(super) fn hyper_cause<'a>(
    err: &'a (dyn std::error::Error + 'static),
) -> Option<&'a hyper::Error> {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(hyper) = err.downcast_ref::<hyper::Error>() {
            return Some(hyper);
        }
        current = err.source();
    }
    None
}

fn map_body_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Body(Box::new(err))
    }
}
