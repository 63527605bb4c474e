use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{HostError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub body: String,
    pub title: String,
}

/// The system share surface.
///
/// Implementations return an error when the user dismisses the sheet.
#[async_trait]
pub trait ShareService: Send + Sync {
    async fn share(&self, request: ShareRequest) -> Result<()>;
}

/// Records every share; `dismissing()` builds one that rejects instead.
#[derive(Debug, Default)]
pub struct MemoryShare {
    dismiss: bool,
    shared: Mutex<Vec<ShareRequest>>,
}

impl MemoryShare {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dismissing() -> Self {
        Self {
            dismiss: true,
            ..Self::default()
        }
    }

    pub fn shared(&self) -> Vec<ShareRequest> {
        self.shared.lock().clone()
    }
}

#[async_trait]
impl ShareService for MemoryShare {
    async fn share(&self, request: ShareRequest) -> Result<()> {
        if self.dismiss {
            return Err(HostError::Share("user dismissed share sheet".into()));
        }
        self.shared.lock().push(request);
        Ok(())
    }
}
