//! Collaborators the host handlers depend on.
//!
//! Each collaborator is a trait so the platform binding (mobile secure
//! enclave, OS notification center, ...) can be swapped out; the in-memory
//! implementations back tests and the CLI simulation.

pub mod notify;
pub mod secure;
pub mod share;
pub mod store;

pub use notify::{DailyTrigger, MemoryNotifier, NotificationContent, NotificationService};
pub use secure::{MemorySecureStore, SecureStore};
pub use share::{MemoryShare, ShareRequest, ShareService};
pub use store::{Collection, KeyValueStore, MemoryStore, Storage};
