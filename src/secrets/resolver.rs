//! Secret resolver trait and built-in implementations.

use std::collections::HashMap;
use std::env::{self, VarError};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::context::CallContext;

use super::{SecretError, SecretKey, mask};

/// Resolves secret values by logical key.
///
/// Called once per validation; implementations must tolerate concurrent
/// calls. Callers bound the lookup by `ctx`; remote stores should also
/// hand it to their own I/O.
pub trait SecretResolver: Send + Sync {
    /// Returns the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::Missing`] when no value is configured and
    /// [`SecretError::Backend`] when the store itself fails.
    fn get(
        &self,
        ctx: &CallContext,
        key: SecretKey,
    ) -> impl Future<Output = Result<String, SecretError>> + Send;
}

impl<R: SecretResolver> SecretResolver for Arc<R> {
    fn get(
        &self,
        ctx: &CallContext,
        key: SecretKey,
    ) -> impl Future<Output = Result<String, SecretError>> + Send {
        (**self).get(ctx, key)
    }
}

/// In-memory secrets, mostly for tests and embedded configurations.
///
/// # Example
///
/// ```
/// use wacloud::secrets::{SecretKey, StaticSecrets};
///
/// let secrets = StaticSecrets::new()
///     .with_secret(SecretKey::VerifyToken, "hello")
///     .with_secret(SecretKey::AppSecret, "s3cr3t-value");
/// assert!(!format!("{secrets:?}").contains("s3cr3t-value"));
/// ```
#[derive(Clone, Default)]
pub struct StaticSecrets {
    values: HashMap<SecretKey, String>,
}

impl StaticSecrets {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, replacing any previous value.
    #[must_use]
    pub fn with_secret(mut self, key: SecretKey, value: impl Into<String>) -> Self {
        self.values.insert(key, value.into());
        self
    }
}

impl SecretResolver for StaticSecrets {
    async fn get(&self, _ctx: &CallContext, key: SecretKey) -> Result<String, SecretError> {
        self.values
            .get(&key)
            .filter(|value| !value.is_empty())
            .cloned()
            .ok_or(SecretError::Missing { key })
    }
}

impl fmt::Debug for StaticSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in &self.values {
            map.entry(&key.as_str(), &mask(value));
        }
        map.finish()
    }
}

/// Reads secrets from environment variables at call time.
///
/// Values are never cached, so rotating the environment of a running
/// process (where supported) takes effect on the next call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSecrets {
    verify_token_var: String,
    app_secret_var: String,
}

impl EnvSecrets {
    /// Default variable holding the verify token.
    pub const DEFAULT_VERIFY_TOKEN_VAR: &'static str = "WHATSAPP_VERIFY_TOKEN";

    /// Default variable holding the app secret.
    pub const DEFAULT_APP_SECRET_VAR: &'static str = "WHATSAPP_APP_SECRET";

    /// Creates a resolver reading the default variables.
    #[must_use]
    pub fn new() -> Self {
        Self::with_vars(Self::DEFAULT_VERIFY_TOKEN_VAR, Self::DEFAULT_APP_SECRET_VAR)
    }

    /// Creates a resolver reading custom variables.
    #[must_use]
    pub fn with_vars(verify_token_var: impl Into<String>, app_secret_var: impl Into<String>) -> Self {
        Self {
            verify_token_var: verify_token_var.into(),
            app_secret_var: app_secret_var.into(),
        }
    }

    /// Name of the variable backing `key`.
    #[must_use]
    pub fn var_name(&self, key: SecretKey) -> &str {
        match key {
            SecretKey::VerifyToken => &self.verify_token_var,
            SecretKey::AppSecret => &self.app_secret_var,
        }
    }
}

impl Default for EnvSecrets {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretResolver for EnvSecrets {
    async fn get(&self, _ctx: &CallContext, key: SecretKey) -> Result<String, SecretError> {
        match env::var(self.var_name(key)) {
            Ok(value) if !value.is_empty() => Ok(value),
            Ok(_) | Err(VarError::NotPresent) => Err(SecretError::Missing { key }),
            Err(err @ VarError::NotUnicode(_)) => Err(SecretError::Backend {
                key,
                source: Box::new(err),
            }),
        }
    }
}
