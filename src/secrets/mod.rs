//! Secret resolution for webhook validation.
//!
//! Secrets are looked up by a logical [`SecretKey`] through a
//! [`SecretResolver`] every time they are needed; nothing in this crate
//! caches them. Implementations may cache internally but must be safe for
//! concurrent reads.

mod error;
mod resolver;

#[cfg(test)]
mod resolver_tests;

pub use error::SecretError;
pub use resolver::{EnvSecrets, SecretResolver, StaticSecrets};

use std::fmt;

/// Logical secret names the crate needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretKey {
    /// Token expected in the webhook subscription handshake.
    VerifyToken,
    /// App secret used to sign webhook deliveries.
    AppSecret,
}

impl SecretKey {
    /// Stable name of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VerifyToken => "verify_token",
            Self::AppSecret => "app_secret",
        }
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Masks a sensitive value for display.
///
/// Keeps the first and last two characters; values of four characters or
/// fewer are masked entirely.
#[must_use]
pub fn mask(value: &str) -> String {
    let count = value.chars().count();
    if count <= 4 {
        return "****".to_string();
    }
    let head: String = value.chars().take(2).collect();
    let tail: String = value.chars().skip(count - 2).collect();
    format!("{head}****{tail}")
}
