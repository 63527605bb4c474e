//! Bridge message model and JSON codec.
//!
//! Every message crossing the bridge is a [`BridgeMessage`]:
//! - a closed [`EventType`] tag
//! - a `requestId` shared by a request and its reply
//! - an event-specific JSON payload
//! - an ISO-8601 timestamp
//!
//! On top of the wire shape, [`HostRequest`] and [`HostReply`] give each
//! event its own strongly typed payload so both routers dispatch over
//! closed enums instead of string switches.

pub mod error;
pub mod event;
pub mod message;
pub mod model;
pub mod reply;
pub mod request;

pub use error::{MessageError, Result};
pub use event::EventType;
pub use message::{decode, encode, now_timestamp, BridgeMessage};
pub use model::{
    DoseLog, DoseSchedule, DoseStatus, FrequencyUnit, Medicine, MedicineForm, Theme, UserProfile,
};
pub use reply::{Ack, AuthResult, HostReply, NotificationResult, OfflineSyncResult, ScheduleSnapshot};
pub use request::{
    reply_event_for, AuthSetup, HostRequest, NotificationCancel, NotificationSchedule,
    ScheduleSave, ShareMessage, ThemeSet,
};
pub use uuid::Uuid;
