//! One-way delivery primitive for the medbridge bridge.
//!
//! Provides a unified interface over the two delivery directions:
//! - host → content: script injection into the rendering surface
//! - content → host: posted string messages
//!
//! This is the lowest layer of medbridge. Delivery is best-effort and
//! unacknowledged; everything that needs a reply builds on top of the
//! [`Transport`] trait provided here.

pub mod channel;
pub mod error;
pub mod injection;
pub mod traits;

pub use channel::{channel, ChannelTransport};
pub use error::{Result, TransportError};
pub use injection::{extract_injected, inject_script, is_injected, InjectingTransport};
pub use traits::Transport;
