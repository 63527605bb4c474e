//! Correlated request/response bridge between a host shell and the web
//! content it embeds.
//!
//! The host owns native capabilities (secure storage, notifications, the
//! share sheet); the content owns the UI. Neither side can call the other
//! directly: each only has a one-way, best-effort message channel. medbridge
//! layers READY-gated queuing, request correlation and typed events on top.
//!
//! # Crate Structure
//!
//! - [`transport`]: one-way delivery and the script-injection envelope
//! - [`message`]: wire model, event taxonomy and typed payloads
//! - [`host`]: outbound queue, router and domain handlers (behind `host` feature)
//! - [`content`]: correlation table, bridge client and AI client (behind `content` feature)
//! - [`loopback`]: both sides wired together in-process (behind `loopback` feature)

/// Re-export transport types.
pub mod transport {
    pub use medbridge_transport::*;
}

/// Re-export message types.
pub mod message {
    pub use medbridge_message::*;
}

/// Re-export host-side types (requires `host` feature).
#[cfg(feature = "host")]
pub mod host {
    pub use medbridge_host::*;
}

/// Re-export content-side types (requires `content` feature).
#[cfg(feature = "content")]
pub mod content {
    pub use medbridge_content::*;
}

#[cfg(feature = "loopback")]
pub mod loopback;
