//! Domain handlers invoked by the [`HostRouter`](crate::HostRouter).
//!
//! Each handler performs one category of side effect against the
//! collaborators in [`Services`] and returns the typed reply payload.

pub mod auth;
pub mod notification;
pub mod profile;
pub mod schedule;
pub mod share;
pub mod sync;
pub mod theme;

use std::sync::Arc;

use crate::services::{
    MemoryNotifier, MemorySecureStore, MemoryShare, NotificationService, SecureStore,
    ShareService, Storage,
};

/// The collaborators a host session needs.
#[derive(Clone)]
pub struct Services {
    pub storage: Storage,
    pub secure: Arc<dyn SecureStore>,
    pub notifier: Arc<dyn NotificationService>,
    pub share: Arc<dyn ShareService>,
}

impl Services {
    pub fn new(
        storage: Storage,
        secure: Arc<dyn SecureStore>,
        notifier: Arc<dyn NotificationService>,
        share: Arc<dyn ShareService>,
    ) -> Self {
        Self {
            storage,
            secure,
            notifier,
            share,
        }
    }

    /// All collaborators backed by process memory.
    pub fn in_memory() -> Self {
        Self::new(
            Storage::in_memory(),
            Arc::new(MemorySecureStore::new()),
            Arc::new(MemoryNotifier::new()),
            Arc::new(MemoryShare::new()),
        )
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
