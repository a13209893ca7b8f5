//! Classification of transient failures.
//!
//! Two independent questions are answered here: whether a transport
//! failure (no HTTP response at all) is worth retrying, and whether an
//! HTTP status code is.

use std::error::Error;
use std::io::ErrorKind;

use http::StatusCode;

use super::TransportError;
use super::client::hyper_cause;

/// Returns true if re-issuing the request after a delay may succeed.
///
/// Cancellation, closed connections, malformed requests and TLS/protocol
/// failures are permanent. Timeouts, temporary resolver failures, common
/// transient socket errors and truncated bodies are not.
#[must_use]
pub fn is_transient(err: &TransportError) -> bool {
    match err {
        TransportError::Canceled | TransportError::Closed | TransportError::InvalidUrl(_) => false,
        TransportError::Timeout => true,
        TransportError::Dns {
            timeout, temporary, ..
        } => *timeout || *temporary,
        TransportError::Connection(source)
        | TransportError::Body(source)
        | TransportError::Other(source) => has_transient_cause(&**source),
    }
}

/// Walks the source chain looking for a transient cause.
fn has_transient_cause(err: &(dyn Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            if is_transient_io_kind(io.kind()) {
                return true;
            }
        }
        if let Some(reqwest) = err.downcast_ref::<reqwest::Error>() {
            if reqwest.is_timeout() {
                return true;
            }
        }
        if let Some(hyper) = err.downcast_ref::<hyper::Error>() {
            if hyper.is_incomplete_message() || hyper.is_timeout() {
                return true;
            }
        }
        if let Some(transport) = err.downcast_ref::<TransportError>() {
            return is_transient(transport);
        }
        current = err.source();
    }
    false
}

const fn is_transient_io_kind(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::TimedOut
            | ErrorKind::HostUnreachable
            | ErrorKind::NetworkUnreachable
            | ErrorKind::UnexpectedEof
    )
}

/// Default status rule: 429 and every 5xx except 501 and 505.
///
/// 501 (Not Implemented) and 505 (HTTP Version Not Supported) describe
/// permanent server or protocol conditions, not load.
#[must_use]
pub fn is_retryable_status(status: StatusCode) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }
    status.is_server_error()
        && status != StatusCode::NOT_IMPLEMENTED
        && status != StatusCode::HTTP_VERSION_NOT_SUPPORTED
}
