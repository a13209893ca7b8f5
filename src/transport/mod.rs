//! Outbound HTTP layer for the Graph API.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`], [`BodyRewind`])
//! - Handling streamed HTTP responses ([`HttpResponse`], [`ResponseBody`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client implementation ([`ReqwestClient`])
//! - Classifying transient failures ([`is_transient`], [`is_retryable_status`])
//! - Exponential backoff with jitter ([`backoff`], [`JitterSource`])
//! - Executing calls with retries ([`Executor`], [`ExecutorConfig`], [`RetryPolicy`])

mod backoff;
mod body;
mod classify;
mod client;
mod error;
mod executor;
mod http;
mod retry;

#[cfg(test)]
mod body_tests;
#[cfg(test)]
mod classify_tests;
#[cfg(test)]
mod client_tests;
#[cfg(test)]
mod http_tests;

pub use backoff::{JitterSource, SeededJitter, ThreadRngJitter, backoff, exponential};
pub use body::ResponseBody;
pub use classify::{is_retryable_status, is_transient};
pub use client::ReqwestClient;
pub use error::{BoxError, ExecuteError, TransportError};
pub use executor::Executor;
pub use http::{BodyRewind, HttpClient, HttpRequest, HttpResponse, RequestLine};
pub use retry::{ExecutorConfig, RetryPolicy};
