//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

use crate::secrets::EnvSecrets;
use crate::transport::ExecutorConfig;

/// Default Graph API base URL.
pub const BASE_URL: &str = "https://graph.facebook.com";

/// Product token sent first in every `User-Agent` header.
pub const USER_AGENT: &str = concat!("wacloud/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout in seconds.
pub const TIMEOUT_SECS: u64 = 10;

/// Largest accepted per-request timeout in seconds (one hour).
pub const MAX_TIMEOUT_SECS: u64 = 3_600;

/// Default number of retries after the initial attempt.
pub const MAX_RETRIES: u32 = ExecutorConfig::DEFAULT_MAX_RETRIES;

/// Default base backoff in milliseconds.
pub const BASE_BACKOFF_MS: u64 = 200;

/// Default maximum backoff in milliseconds.
pub const MAX_BACKOFF_MS: u64 = 3_000;

/// Default environment variable holding the webhook verify token.
pub const VERIFY_TOKEN_ENV: &str = EnvSecrets::DEFAULT_VERIFY_TOKEN_VAR;

/// Default environment variable holding the app secret.
pub const APP_SECRET_ENV: &str = EnvSecrets::DEFAULT_APP_SECRET_VAR;

/// Default per-request timeout as Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_secs(TIMEOUT_SECS)
}

/// Default base backoff as Duration.
#[must_use]
pub const fn base_backoff() -> Duration {
    Duration::from_millis(BASE_BACKOFF_MS)
}

/// Default maximum backoff as Duration.
#[must_use]
pub const fn max_backoff() -> Duration {
    Duration::from_millis(MAX_BACKOFF_MS)
}
