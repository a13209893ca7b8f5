//! Validated client configuration.
//!
//! This module contains the final, validated configuration used by the
//! [`Client`](crate::client::Client). All validation is performed during
//! construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use http::HeaderValue;
use url::Url;

use crate::secrets::{EnvSecrets, mask};
use crate::transport::ExecutorConfig;

use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the client.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_toml`], [`ValidatedConfig::parse`] or
/// [`ValidatedConfig::load`].
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    /// Graph API version, e.g. "v20.0"
    pub version: String,

    /// WhatsApp Business Account id
    pub waba_id: String,

    /// Phone number id
    pub phone_number_id: String,

    /// Graph API base URL
    pub base_url: Url,

    /// Complete User-Agent header value
    pub user_agent: HeaderValue,

    /// Per-request timeout, covering every attempt of a call
    pub timeout: Duration,

    /// Retries after the initial attempt
    pub max_retries: u32,

    /// Base backoff between retries
    pub base_backoff: Duration,

    /// Maximum backoff between retries
    pub max_backoff: Duration,

    /// Environment variable holding the verify token
    pub verify_token_env: String,

    /// Environment variable holding the app secret
    pub app_secret_env: String,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ version: {}, waba_id: {}, phone_number_id: {}, base_url: {}, \
             timeout: {}s, retry: {}x/{}ms..{}ms, user_agent: {} }}",
            self.version,
            mask(&self.waba_id),
            mask(&self.phone_number_id),
            self.base_url,
            self.timeout.as_secs(),
            self.max_retries,
            self.base_backoff.as_millis(),
            self.max_backoff.as_millis(),
            self.user_agent.to_str().unwrap_or("<binary>"),
        )
    }
}

impl ValidatedConfig {
    /// Validates a parsed TOML configuration, filling in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required fields are missing (`version`, `waba_id`, `phone_number_id`)
    /// - The version is not shaped like `v20.0`
    /// - The base URL is invalid
    /// - Duration values are zero
    /// - The base backoff exceeds the maximum backoff
    /// - The user agent suffix is not a valid header value
    pub fn from_toml(toml: &TomlConfig) -> Result<Self, ConfigError> {
        let version = Self::resolve_version(toml)?;
        let waba_id = required(
            toml.graph.waba_id.as_deref(),
            field::WABA_ID,
            "Set graph.waba_id in the config file",
        )?;
        let phone_number_id = required(
            toml.graph.phone_number_id.as_deref(),
            field::PHONE_NUMBER_ID,
            "Set graph.phone_number_id in the config file",
        )?;
        let base_url = Self::resolve_base_url(toml)?;
        let user_agent = Self::resolve_user_agent(toml)?;
        let timeout = Self::resolve_timeout(toml)?;
        let (base_backoff, max_backoff) = Self::resolve_backoff(toml)?;
        let verify_token_env = env_name(
            toml.secrets.verify_token_env.as_deref(),
            defaults::VERIFY_TOKEN_ENV,
            field::VERIFY_TOKEN_ENV,
        )?;
        let app_secret_env = env_name(
            toml.secrets.app_secret_env.as_deref(),
            defaults::APP_SECRET_ENV,
            field::APP_SECRET_ENV,
        )?;

        Ok(Self {
            version,
            waba_id,
            phone_number_id,
            base_url,
            user_agent,
            timeout,
            max_retries: toml.retry.max_retries.unwrap_or(defaults::MAX_RETRIES),
            base_backoff,
            max_backoff,
            verify_token_env,
            app_secret_env,
        })
    }

    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or fails validation.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Self::from_toml(&TomlConfig::parse(content)?)
    }

    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The configuration is invalid
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml(&TomlConfig::load(path)?)
    }

    /// Retry settings for the [`Executor`](crate::transport::Executor).
    #[must_use]
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig::new()
            .with_max_retries(self.max_retries)
            .with_base_backoff(self.base_backoff)
            .with_max_backoff(self.max_backoff)
    }

    /// Secret resolver reading the configured environment variables.
    #[must_use]
    pub fn env_secrets(&self) -> EnvSecrets {
        EnvSecrets::with_vars(&self.verify_token_env, &self.app_secret_env)
    }

    fn resolve_version(toml: &TomlConfig) -> Result<String, ConfigError> {
        let version = required(
            toml.graph.version.as_deref(),
            field::VERSION,
            "Set graph.version in the config file, e.g. \"v20.0\"",
        )?;
        if version.len() < 4 || !version.starts_with('v') {
            return Err(ConfigError::InvalidVersion { value: version });
        }
        Ok(version)
    }

    fn resolve_base_url(toml: &TomlConfig) -> Result<Url, ConfigError> {
        let raw = toml.graph.base_url.as_deref().unwrap_or(defaults::BASE_URL);
        let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl {
                url: raw.to_string(),
                reason: "expected an absolute http(s) URL".to_string(),
            });
        }
        Ok(url)
    }

    fn resolve_user_agent(toml: &TomlConfig) -> Result<HeaderValue, ConfigError> {
        let value = match toml.graph.user_agent.as_deref().map(str::trim) {
            Some(extra) if !extra.is_empty() => format!("{} {extra}", defaults::USER_AGENT),
            _ => defaults::USER_AGENT.to_string(),
        };
        HeaderValue::from_str(&value).map_err(|e| ConfigError::InvalidUserAgent {
            value,
            reason: e.to_string(),
        })
    }

    fn resolve_timeout(toml: &TomlConfig) -> Result<Duration, ConfigError> {
        match toml.graph.timeout_secs {
            Some(0) => Err(ConfigError::InvalidDuration {
                field: "graph.timeout_secs",
                reason: "must be greater than zero".to_string(),
            }),
            Some(secs) if secs > defaults::MAX_TIMEOUT_SECS => Err(ConfigError::InvalidDuration {
                field: "graph.timeout_secs",
                reason: format!("must not exceed {} seconds", defaults::MAX_TIMEOUT_SECS),
            }),
            Some(secs) => Ok(Duration::from_secs(secs)),
            None => Ok(defaults::timeout()),
        }
    }

    fn resolve_backoff(toml: &TomlConfig) -> Result<(Duration, Duration), ConfigError> {
        let base = positive_millis(
            toml.retry.base_backoff_ms,
            defaults::base_backoff(),
            "retry.base_backoff_ms",
        )?;
        let max = positive_millis(
            toml.retry.max_backoff_ms,
            defaults::max_backoff(),
            "retry.max_backoff_ms",
        )?;
        if base > max {
            return Err(ConfigError::InvalidRetry(format!(
                "base_backoff_ms ({}) must not exceed max_backoff_ms ({})",
                base.as_millis(),
                max.as_millis()
            )));
        }
        Ok((base, max))
    }
}

/// Writes the commented default configuration to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn required(
    value: Option<&str>,
    field: &'static str,
    hint: &'static str,
) -> Result<String, ConfigError> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(ConfigError::missing(field, hint)),
    }
}

fn env_name(
    value: Option<&str>,
    default: &str,
    field: &'static str,
) -> Result<String, ConfigError> {
    match value {
        None => Ok(default.to_string()),
        Some(name) => required(Some(name), field, "Environment variable names cannot be empty"),
    }
}

fn positive_millis(
    value: Option<u64>,
    default: Duration,
    field: &'static str,
) -> Result<Duration, ConfigError> {
    match value {
        Some(0) => Err(ConfigError::InvalidDuration {
            field,
            reason: "must be greater than zero".to_string(),
        }),
        Some(ms) => Ok(Duration::from_millis(ms)),
        None => Ok(default),
    }
}
