//! Configuration errors.

use std::path::PathBuf;

use thiserror::Error;

/// Why a configuration could not be loaded, validated or written.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or contains unknown keys.
    #[error("malformed configuration: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// The template could not be written.
    #[error("cannot write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required key is absent or blank.
    ///
    /// `field` is one of the [`field`] constants.
    #[error("{field} is required ({hint})")]
    MissingRequired {
        field: &'static str,
        hint: &'static str,
    },

    /// Graph API version is not shaped like `v20.0`.
    #[error("graph.version '{value}' is not of the form vMAJOR.MINOR (e.g. v20.0)")]
    InvalidVersion { value: String },

    /// `graph.base_url` is not an absolute http(s) URL.
    #[error("graph.base_url '{url}' rejected: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A timeout or backoff value is zero.
    #[error("{field} rejected: {reason}")]
    InvalidDuration { field: &'static str, reason: String },

    /// Backoff bounds contradict each other.
    #[error("retry section rejected: {0}")]
    InvalidRetry(String),

    /// The user agent suffix cannot be sent as a header.
    #[error("graph.user_agent '{value}' rejected: {reason}")]
    InvalidUserAgent { value: String, reason: String },
}

/// Keys reported by [`ConfigError::MissingRequired`].
pub mod field {
    pub const VERSION: &str = "graph.version";
    pub const WABA_ID: &str = "graph.waba_id";
    pub const PHONE_NUMBER_ID: &str = "graph.phone_number_id";
    pub const VERIFY_TOKEN_ENV: &str = "secrets.verify_token_env";
    pub const APP_SECRET_ENV: &str = "secrets.app_secret_env";
}

impl ConfigError {
    #[must_use]
    pub(crate) const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }
}
