//! Host-shell side of the medbridge bridge.
//!
//! The host owns everything the embedded content cannot do for itself:
//! secure credential storage, local notifications, the share sheet and
//! on-device persistence. Content reaches these through bridge requests;
//! the host answers each with a reply carrying the same request id.
//!
//! A [`HostSession`] ties one rendering surface to:
//! - an [`OutboundQueue`] that buffers host → content traffic until READY
//! - a [`HostRouter`] that dispatches typed requests to the domain handlers

pub mod config;
pub mod error;
pub mod handlers;
pub mod queue;
pub mod router;
pub mod services;
pub mod session;

pub use config::{FailurePolicy, HostConfig, DEFAULT_NOTIFICATION_BODY, DEFAULT_SHARE_TITLE};
pub use error::{HostError, Result};
pub use handlers::Services;
pub use queue::{Disposition, OutboundQueue};
pub use router::HostRouter;
pub use services::{
    Collection, DailyTrigger, KeyValueStore, MemoryNotifier, MemorySecureStore, MemoryShare,
    MemoryStore, NotificationContent, NotificationService, SecureStore, ShareRequest,
    ShareService, Storage,
};
pub use session::{HostSession, Inbound};
