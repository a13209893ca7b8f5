//! Verify-token and signature checks.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::context::CallContext;
use crate::secrets::{SecretKey, SecretResolver};

use super::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

/// Prefix of the signature header value.
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Validates webhook handshakes and deliveries.
///
/// Holds no state besides the resolver; secrets are looked up on every
/// check, bounded by the caller's [`CallContext`].
#[derive(Debug, Clone)]
pub struct Authenticator<R> {
    secrets: R,
}

impl<R> Authenticator<R> {
    /// Creates an authenticator backed by `secrets`.
    #[must_use]
    pub const fn new(secrets: R) -> Self {
        Self { secrets }
    }

    /// Returns the secret resolver.
    #[must_use]
    pub const fn secrets(&self) -> &R {
        &self.secrets
    }
}

impl<R: SecretResolver> Authenticator<R> {
    /// Checks the `hub.verify_token` of a subscription handshake.
    ///
    /// # Errors
    ///
    /// - [`AuthError::EmptyVerifyToken`] if `provided` is blank, whatever
    ///   the stored token is
    /// - [`AuthError::Secret`] if the stored token cannot be resolved
    /// - [`AuthError::Context`] if `ctx` ends during the lookup
    /// - [`AuthError::VerifyTokenMismatch`] if the tokens differ
    pub async fn check_verify_token(
        &self,
        ctx: &CallContext,
        provided: &str,
    ) -> Result<(), AuthError> {
        if provided.trim().is_empty() {
            return Err(AuthError::EmptyVerifyToken);
        }
        let expected = self
            .resolve(ctx, SecretKey::VerifyToken, "verify token check")
            .await?;
        if provided != expected {
            return Err(AuthError::VerifyTokenMismatch);
        }
        Ok(())
    }

    /// Checks the `X-Hub-Signature-256` header against the raw body.
    ///
    /// `body` must be the bytes exactly as received; re-encoded JSON does
    /// not verify.
    ///
    /// # Errors
    ///
    /// - [`AuthError::EmptyBody`] for an empty body
    /// - [`AuthError::InvalidSignatureFormat`] if the header lacks the
    ///   `sha256=` prefix or a digest
    /// - [`AuthError::InvalidSignatureHex`] if the digest is not hex
    /// - [`AuthError::Secret`] if the app secret cannot be resolved
    /// - [`AuthError::Context`] if `ctx` ends during the lookup
    /// - [`AuthError::SignatureMismatch`] if the digest does not match
    pub async fn check_signature(
        &self,
        ctx: &CallContext,
        body: &[u8],
        header: &str,
    ) -> Result<(), AuthError> {
        if body.is_empty() {
            return Err(AuthError::EmptyBody);
        }
        let digest = header
            .strip_prefix(SIGNATURE_PREFIX)
            .filter(|digest| !digest.is_empty())
            .ok_or(AuthError::InvalidSignatureFormat)?;
        let digest = hex::decode(digest)?;

        let secret = self
            .resolve(ctx, SecretKey::AppSecret, "signature check")
            .await?;
        mac_over(&secret, body)
            .ok_or(AuthError::SignatureMismatch)?
            .verify_slice(&digest)
            .map_err(|_| AuthError::SignatureMismatch)
    }

    async fn resolve(
        &self,
        ctx: &CallContext,
        key: SecretKey,
        operation: &'static str,
    ) -> Result<String, AuthError> {
        ctx.run(self.secrets.get(ctx, key))
            .await?
            .map_err(|source| AuthError::Secret {
                key,
                operation,
                source,
            })
    }
}

/// Computes the `X-Hub-Signature-256` header value for `body`.
///
/// Returns `None` only if the HMAC implementation rejects the key, which
/// HMAC-SHA256 never does.
///
/// # Example
///
/// ```
/// use wacloud::webhook::sign;
///
/// let header = sign("s", br#"{"x":1}"#).unwrap();
/// assert!(header.starts_with("sha256="));
/// assert_eq!(header.len(), "sha256=".len() + 64);
/// ```
#[must_use]
pub fn sign(secret: &str, body: &[u8]) -> Option<String> {
    let digest = mac_over(secret, body)?.finalize().into_bytes();
    Some(format!("{SIGNATURE_PREFIX}{}", hex::encode(digest)))
}

/// HMAC-SHA256 keyed with `secret`, fed with `body`.
fn mac_over(secret: &str, body: &[u8]) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(body);
    Some(mac)
}
