//! Client configuration.
//!
//! This module provides:
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Layers
//!
//! A [`TomlConfig`] mirrors the file: every value is optional and unknown
//! keys are rejected. [`ValidatedConfig::from_toml`] fills in defaults and
//! validates everything once, so the rest of the crate can rely on it.
//!
//! Secrets never live in the file. The `[secrets]` section only names the
//! environment variables that hold them, and the access token comes from a
//! [`TokenProvider`](crate::client::TokenProvider).

pub mod defaults;
mod error;
mod toml;
mod validated;


pub use error::{ConfigError, field};
pub use toml::{GraphSection, RetrySection, SecretsSection, TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, write_default_config};
