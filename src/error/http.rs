//! Generic HTTP failure context.

use std::error::Error as StdError;
use std::fmt;

use http::{HeaderMap, Method, StatusCode};
use thiserror::Error;
use url::Url;

use crate::transport::{HttpResponse, is_retryable_status};

/// Response header carrying the platform trace id.
pub const TRACE_ID_HEADER: &str = "x-fb-trace-id";

const NIL_RESPONSE: &str = "<nil response>";

/// A non-2xx HTTP response, captured with enough context to log and debug.
///
/// The body should already be truncated by whoever read it
/// (see [`MAX_ERROR_BODY`](super::MAX_ERROR_BODY)).
#[derive(Debug, Clone, Error)]
pub struct HttpError {
    method: Option<Method>,
    url: Option<Url>,
    status: Option<StatusCode>,
    status_text: String,
    headers: HeaderMap,
    body: Vec<u8>,
    trace_id: Option<String>,
}

impl HttpError {
    /// Builds an error from a response and its (already read) body.
    ///
    /// A missing response yields a sentinel error with no status and the
    /// status text `<nil response>`.
    #[must_use]
    pub fn from_response(response: Option<&HttpResponse>, body: &[u8]) -> Self {
        let Some(response) = response else {
            return Self {
                method: None,
                url: None,
                status: None,
                status_text: NIL_RESPONSE.to_string(),
                headers: HeaderMap::new(),
                body: body.to_vec(),
                trace_id: None,
            };
        };

        let trace_id = response
            .headers
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Self {
            method: response.request.as_ref().map(|line| line.method.clone()),
            url: response.request.as_ref().map(|line| line.url.clone()),
            status: Some(response.status),
            status_text: response
                .status
                .canonical_reason()
                .unwrap_or_default()
                .to_string(),
            headers: response.headers.clone(),
            body: body.to_vec(),
            trace_id,
        }
    }

    /// HTTP method of the failed request, when known.
    #[must_use]
    pub const fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    /// URL of the failed request, when known.
    #[must_use]
    pub const fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Response status; `None` for the nil-response sentinel.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Reason phrase of the status.
    #[must_use]
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Response headers (may include rate-limit hints).
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw response body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Platform trace id, when the response carried one.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    pub(super) fn set_trace_id(&mut self, trace_id: String) {
        self.trace_id = Some(trace_id);
    }

    /// Returns true if the status suggests a retry might succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.status.is_some_and(is_retryable_status)
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = self.method.as_ref().map_or("", Method::as_str);
        let url = self.url.as_ref().map_or("", Url::as_str);
        let code = self.status.map_or(0, |status| status.as_u16());
        write!(f, "http {method} {url}: {code} {}", self.status_text)?;
        if let Some(trace_id) = &self.trace_id {
            write!(f, " (trace-id={trace_id})")?;
        }
        Ok(())
    }
}

/// Reports whether `err`, or any error in its source chain, is an
/// [`HttpError`] whose status is worth retrying (429, or 5xx except 501/505).
///
/// Works through [`GraphError`](super::GraphError) and any other wrapper that
/// exposes its cause via [`source`](StdError::source).
#[must_use]
pub fn is_retryable(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(http) = err.downcast_ref::<HttpError>() {
            return http.is_retryable();
        }
        current = err.source();
    }
    false
}
