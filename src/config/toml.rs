//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional; defaults and validation are applied by
/// [`ValidatedConfig`](super::ValidatedConfig).
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Graph API account configuration
    #[serde(default)]
    pub graph: GraphSection,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetrySection,

    /// Secret source configuration
    #[serde(default)]
    pub secrets: SecretsSection,
}

/// Graph API configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphSection {
    /// Graph API version, e.g. "v20.0" (required)
    pub version: Option<String>,

    /// WhatsApp Business Account id (required)
    pub waba_id: Option<String>,

    /// Phone number id (required)
    pub phone_number_id: Option<String>,

    /// Base URL override, mostly for tests and proxies
    pub base_url: Option<String>,

    /// Extra product token appended to the User-Agent header
    pub user_agent: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Retry policy configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    /// Retries after the initial attempt
    pub max_retries: Option<u32>,

    /// Base backoff in milliseconds
    pub base_backoff_ms: Option<u64>,

    /// Maximum backoff in milliseconds
    pub max_backoff_ms: Option<u64>,
}

/// Secret source configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretsSection {
    /// Environment variable holding the webhook verify token
    pub verify_token_env: Option<String>,

    /// Environment variable holding the app secret
    pub app_secret_env: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# wacloud configuration file

[graph]
# Graph API version (required)
version = "v20.0"

# WhatsApp Business Account id (required)
# waba_id = "102290129340398"

# Phone number id (required)
# phone_number_id = "106540352242922"

# Base URL (default: https://graph.facebook.com)
# base_url = "https://graph.facebook.com"

# Extra User-Agent product token, appended after wacloud/<version>
# user_agent = "my-app/1.0"

# Per-request timeout in seconds, covering all retries (default: 10, max: 3600)
# timeout_secs = 10

[retry]
# Retries after the initial attempt; 0 disables retries (default: 3)
# max_retries = 3

# Base backoff in milliseconds (default: 200)
# base_backoff_ms = 200

# Maximum backoff in milliseconds (default: 3000)
# max_backoff_ms = 3000

[secrets]
# Environment variable holding the webhook verify token
# verify_token_env = "WHATSAPP_VERIFY_TOKEN"

# Environment variable holding the app secret used for signatures
# app_secret_env = "WHATSAPP_APP_SECRET"
"#
    .to_string()
}
