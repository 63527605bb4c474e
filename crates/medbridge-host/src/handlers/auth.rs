use medbridge_message::{AuthResult, AuthSetup};
use tracing::debug;

use crate::error::Result;
use crate::services::SecureStore;

/// Persist whichever credentials the request carries. An empty PIN hash
/// counts as absent.
pub async fn setup(secure: &dyn SecureStore, request: &AuthSetup) -> Result<AuthResult> {
    let pin_hash = request.pin_hash.as_deref().filter(|hash| !hash.is_empty());
    if let Some(hash) = pin_hash {
        secure.set_pin_hash(hash).await?;
    }
    if let Some(enabled) = request.enable_biometric {
        secure.set_biometric_enabled(enabled).await?;
    }
    debug!(
        pin = pin_hash.is_some(),
        biometric = ?request.enable_biometric,
        "credentials stored"
    );
    Ok(AuthResult {
        success: true,
        method: None,
    })
}

/// The host-native lock screen has already gated access by the time content
/// can send anything.
pub fn request() -> AuthResult {
    AuthResult {
        success: true,
        method: Some("bridge".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MemorySecureStore;

    #[tokio::test]
    async fn setup_writes_only_present_fields() {
        let store = MemorySecureStore::new();
        store.set_biometric_enabled(true).await.unwrap();

        let result = setup(
            &store,
            &AuthSetup {
                pin_hash: Some("abc123".into()),
                enable_biometric: None,
            },
        )
        .await
        .unwrap();

        assert!(result.success);
        assert!(result.method.is_none());
        assert_eq!(store.pin_hash().await.unwrap().as_deref(), Some("abc123"));
        assert!(store.biometric_enabled().await.unwrap());
    }

    #[tokio::test]
    async fn empty_pin_hash_keeps_stored_pin() {
        let store = MemorySecureStore::new();
        store.set_pin_hash("abc123").await.unwrap();

        setup(
            &store,
            &AuthSetup {
                pin_hash: Some(String::new()),
                enable_biometric: Some(true),
            },
        )
        .await
        .unwrap();

        assert_eq!(store.pin_hash().await.unwrap().as_deref(), Some("abc123"));
        assert!(store.biometric_enabled().await.unwrap());
    }

    #[test]
    fn request_reports_bridge_method() {
        assert_eq!(request().method.as_deref(), Some("bridge"));
    }
}
