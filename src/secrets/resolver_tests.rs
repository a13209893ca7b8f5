//! Tests for secret resolvers.

use super::{EnvSecrets, SecretError, SecretKey, SecretResolver, StaticSecrets, mask};
use crate::context::CallContext;
use std::sync::Arc;

mod static_secrets {
    use super::*;

    #[tokio::test]
    async fn returns_stored_value() {
        let secrets = StaticSecrets::new().with_secret(SecretKey::AppSecret, "s");

        assert_eq!(secrets.get(&CallContext::background(), SecretKey::AppSecret).await.unwrap(), "s");
    }

    #[tokio::test]
    async fn missing_key_is_reported() {
        let secrets = StaticSecrets::new().with_secret(SecretKey::AppSecret, "s");

        let err = secrets.get(&CallContext::background(), SecretKey::VerifyToken).await.unwrap_err();

        assert!(matches!(err, SecretError::Missing { key: SecretKey::VerifyToken }));
        assert_eq!(err.key(), SecretKey::VerifyToken);
        assert_eq!(err.to_string(), "secret 'verify_token' is not configured");
    }

    #[tokio::test]
    async fn empty_value_counts_as_missing() {
        let secrets = StaticSecrets::new().with_secret(SecretKey::VerifyToken, "");

        let err = secrets.get(&CallContext::background(), SecretKey::VerifyToken).await.unwrap_err();

        assert!(matches!(err, SecretError::Missing { .. }));
    }

    #[tokio::test]
    async fn later_value_replaces_earlier() {
        let secrets = StaticSecrets::new()
            .with_secret(SecretKey::AppSecret, "old")
            .with_secret(SecretKey::AppSecret, "new");

        assert_eq!(secrets.get(&CallContext::background(), SecretKey::AppSecret).await.unwrap(), "new");
    }

    #[tokio::test]
    async fn shared_resolver_delegates() {
        let secrets = Arc::new(StaticSecrets::new().with_secret(SecretKey::AppSecret, "shared"));

        assert_eq!(secrets.get(&CallContext::background(), SecretKey::AppSecret).await.unwrap(), "shared");
    }

    #[test]
    fn debug_masks_values() {
        let secrets = StaticSecrets::new().with_secret(SecretKey::AppSecret, "super-secret");

        let debug = format!("{secrets:?}");

        assert!(debug.contains("app_secret"));
        assert!(debug.contains("su****et"));
        assert!(!debug.contains("super-secret"));
    }
}

mod env_secrets {
    use super::*;

    #[test]
    fn defaults_use_whatsapp_variables() {
        let secrets = EnvSecrets::new();

        assert_eq!(secrets.var_name(SecretKey::VerifyToken), "WHATSAPP_VERIFY_TOKEN");
        assert_eq!(secrets.var_name(SecretKey::AppSecret), "WHATSAPP_APP_SECRET");
        assert_eq!(secrets, EnvSecrets::default());
    }

    #[tokio::test]
    async fn unset_variable_is_missing() {
        let secrets = EnvSecrets::with_vars(
            "WACLOUD_TEST_SURELY_UNSET_VERIFY_TOKEN_7F3A",
            "WACLOUD_TEST_SURELY_UNSET_APP_SECRET_7F3A",
        );

        let err = secrets.get(&CallContext::background(), SecretKey::AppSecret).await.unwrap_err();

        assert!(matches!(err, SecretError::Missing { key: SecretKey::AppSecret }));
    }

    #[tokio::test]
    async fn reads_variable_at_call_time() {
        // PATH is set in any environment that can run the test suite.
        let expected = std::env::var("PATH").unwrap();
        let secrets = EnvSecrets::with_vars("PATH", "WACLOUD_TEST_SURELY_UNSET_APP_SECRET_7F3A");

        assert_eq!(secrets.get(&CallContext::background(), SecretKey::VerifyToken).await.unwrap(), expected);
    }
}

mod masking {
    use super::*;

    #[test]
    fn keeps_edges_of_long_values() {
        assert_eq!(mask("1234567890"), "12****90");
    }

    #[test]
    fn fully_masks_short_values() {
        assert_eq!(mask(""), "****");
        assert_eq!(mask("abcd"), "****");
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(mask("ééééé"), "éé****éé");
    }
}
