//! Embedded-content side of the medbridge bridge.
//!
//! Turns the one-way content → host transport into request/response:
//! every request is registered in a [`CorrelationTable`] under its request
//! id and resolved by the matching host reply, or failed after a timeout.
//! [`BridgeClient`] owns the table, the inbound pump and the passive
//! listener fan-out.
//!
//! The [`ai`] module holds the summarization client used for missed-dose
//! advice and caregiver message drafts.

pub mod ai;
pub mod client;
pub mod config;
pub mod correlation;
pub mod error;

pub use ai::{
    AiEndpoint, AiOutcome, AiRequest, AiResponse, AiTask, Confidence, EndpointError,
    HttpEndpoint, SummaryClient,
};
pub use client::BridgeClient;
pub use config::{AiConfig, ClientConfig, DEFAULT_REQUEST_TIMEOUT};
pub use correlation::{CorrelationTable, Pending};
pub use error::{BridgeError, Result};
