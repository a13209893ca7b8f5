//! Graph API error envelope decoding.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::transport::HttpResponse;

use super::{HttpError, MAX_ERROR_BODY};

/// The fields of the Graph error envelope `{"error": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphErrorDetail {
    /// Human-readable description.
    pub message: String,
    /// Error category, e.g. `OAuthException`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Numeric error code.
    pub code: i64,
    /// Finer-grained code, when the platform sends one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_subcode: Option<i64>,
    /// Server-side trace id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fbtrace_id: Option<String>,
}

#[derive(Deserialize)]
struct Envelope {
    error: Option<GraphErrorDetail>,
}

/// A failed Graph API call.
///
/// Always wraps the generic [`HttpError`], which is also its
/// [`source`](std::error::Error::source). The decoded envelope is present
/// only when the body parsed as one; the raw body is kept either way.
#[derive(Debug, Clone, Error)]
pub struct GraphError {
    #[source]
    http: HttpError,
    detail: Option<GraphErrorDetail>,
}

impl GraphError {
    /// The underlying HTTP failure.
    #[must_use]
    pub const fn http(&self) -> &HttpError {
        &self.http
    }

    /// The decoded envelope, if the body contained one.
    #[must_use]
    pub const fn detail(&self) -> Option<&GraphErrorDetail> {
        self.detail.as_ref()
    }

    /// The raw response body, for audit when decoding failed.
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        self.http.body()
    }

    /// Trace id, preferring the one in the payload over the response header.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.http.trace_id()
    }

    /// Graph error code, when decoded.
    #[must_use]
    pub fn code(&self) -> Option<i64> {
        self.detail.as_ref().map(|detail| detail.code)
    }

    /// Returns true if the HTTP status suggests a retry might succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.http.is_retryable()
    }
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) if !detail.message.is_empty() => {
                write!(
                    f,
                    "graph error: {} (type={} code={}",
                    detail.message, detail.kind, detail.code
                )?;
                if let Some(subcode) = detail.error_subcode {
                    write!(f, " subcode={subcode}")?;
                }
                write!(f, "): {}", self.http)
            }
            _ => write!(f, "graph error: undecoded: {}", self.http),
        }
    }
}

/// Turns an error response and its body into a [`GraphError`].
///
/// Never fails: a body that is not a Graph envelope leaves the detail empty
/// and keeps the raw bytes, and a missing response produces the
/// nil-response sentinel [`HttpError`].
#[must_use]
pub fn decode_error(response: Option<&HttpResponse>, body: &[u8]) -> GraphError {
    let mut http = HttpError::from_response(response, body);
    let detail = match serde_json::from_slice::<Envelope>(body) {
        Ok(envelope) => envelope.error,
        Err(err) => {
            debug!(error = %err, "Error body is not a Graph envelope");
            None
        }
    };

    if let Some(trace_id) = detail
        .as_ref()
        .and_then(|detail| detail.fbtrace_id.as_ref())
        .filter(|trace_id| !trace_id.is_empty())
    {
        http.set_trace_id(trace_id.clone());
    }

    GraphError { http, detail }
}

/// Reads up to [`MAX_ERROR_BODY`] bytes of `response` and decodes them.
///
/// A body that cannot be read is treated as empty.
pub async fn read_error(mut response: HttpResponse) -> GraphError {
    let body = match response.take_body().bytes_limited(MAX_ERROR_BODY).await {
        Ok(body) => body,
        Err(err) => {
            debug!(error = %err, "Failed to read error body");
            Vec::new()
        }
    };
    decode_error(Some(&response), &body)
}
