//! Typed errors for Graph API responses with an error status.
//!
//! The [`Executor`](crate::transport::Executor) returns non-2xx responses as
//! ordinary values. Callers that want a typed error read the body (bounded by
//! [`MAX_ERROR_BODY`]) and turn it into a [`GraphError`], which wraps the
//! generic [`HttpError`] and carries the decoded error envelope when the
//! body has one.

mod graph;
mod http;


pub use graph::{GraphError, GraphErrorDetail, decode_error, read_error};
pub use http::{HttpError, TRACE_ID_HEADER, is_retryable};

/// Largest error body kept in memory when decoding an error response.
pub const MAX_ERROR_BODY: usize = 64 * 1024;
