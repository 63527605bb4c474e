use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::Result;

/// Credential storage kept apart from the general [`Storage`](super::Storage).
///
/// Only ever sees a PIN hash computed by the caller; plaintext PINs never
/// reach the host.
#[async_trait]
pub trait SecureStore: Send + Sync {
    async fn set_pin_hash(&self, hash: &str) -> Result<()>;
    async fn pin_hash(&self) -> Result<Option<String>>;
    async fn set_biometric_enabled(&self, enabled: bool) -> Result<()>;
    async fn biometric_enabled(&self) -> Result<bool>;
}

#[derive(Default)]
struct Credentials {
    pin_hash: Option<String>,
    biometric_enabled: bool,
}

#[derive(Default)]
pub struct MemorySecureStore {
    inner: Mutex<Credentials>,
}

impl MemorySecureStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SecureStore for MemorySecureStore {
    async fn set_pin_hash(&self, hash: &str) -> Result<()> {
        self.inner.lock().pin_hash = Some(hash.to_string());
        Ok(())
    }

    async fn pin_hash(&self) -> Result<Option<String>> {
        Ok(self.inner.lock().pin_hash.clone())
    }

    async fn set_biometric_enabled(&self, enabled: bool) -> Result<()> {
        self.inner.lock().biometric_enabled = enabled;
        Ok(())
    }

    async fn biometric_enabled(&self) -> Result<bool> {
        Ok(self.inner.lock().biometric_enabled)
    }
}

impl std::fmt::Debug for MemorySecureStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        let pin = inner
            .pin_hash
            .as_ref()
            .map(|hash| format!("<redacted:{} bytes>", hash.len()));
        f.debug_struct("MemorySecureStore")
            .field("pin_hash", &pin)
            .field("biometric_enabled", &inner.biometric_enabled)
            .finish()
    }
}
