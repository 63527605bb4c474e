//! AI summarization client.
//!
//! The content side asks an AI endpoint for missed-dose advice and caregiver
//! message drafts. Rate-limited attempts are retried with linear backoff;
//! anything else that goes wrong is reported as [`AiOutcome::Offline`] so
//! the UI can fall back to its offline card instead of showing an error.

mod http;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::AiConfig;

pub use http::HttpEndpoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiTask {
    MissedDoseAdvice,
    DraftCaregiverMessage,
}

impl AiTask {
    pub fn as_str(self) -> &'static str {
        match self {
            AiTask::MissedDoseAdvice => "missed_dose_advice",
            AiTask::DraftCaregiverMessage => "draft_caregiver_message",
        }
    }
}

impl fmt::Display for AiTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiTask {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "missed_dose_advice" => Ok(AiTask::MissedDoseAdvice),
            "draft_caregiver_message" => Ok(AiTask::DraftCaregiverMessage),
            other => Err(format!("unknown AI task '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Body sent to the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiRequest {
    pub task: AiTask,
    pub context: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiResponse {
    pub reasoning: String,
    pub suggestion: String,
    pub confidence: Confidence,
    pub disclaimer: String,
}

/// What the UI gets back from [`SummaryClient::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum AiOutcome {
    Ready(AiResponse),
    Offline,
}

impl AiOutcome {
    pub fn is_offline(&self) -> bool {
        matches!(self, AiOutcome::Offline)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    /// HTTP 429 or equivalent; worth retrying.
    #[error("rate limited")]
    RateLimited,

    #[error("endpoint returned status {0}")]
    Status(u16),

    #[error("endpoint unreachable: {0}")]
    Transport(String),

    #[error("unparseable endpoint response: {0}")]
    Parse(String),
}

/// A summarization backend.
#[async_trait]
pub trait AiEndpoint: Send + Sync {
    async fn complete(&self, request: &AiRequest) -> Result<AiResponse, EndpointError>;
}

pub struct SummaryClient<E> {
    endpoint: E,
    config: AiConfig,
}

impl<E: AiEndpoint> SummaryClient<E> {
    pub fn new(endpoint: E, config: AiConfig) -> Self {
        Self { endpoint, config }
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    /// Ask the endpoint for `task`, retrying rate limits up to
    /// `max_retries` extra times, sleeping `backoff_step * n` before retry `n`.
    pub async fn run(&self, task: AiTask, context: Value) -> AiOutcome {
        let request = AiRequest { task, context };
        let mut attempt: u32 = 0;
        loop {
            let result =
                match tokio::time::timeout(self.config.request_timeout, self.endpoint.complete(&request))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(EndpointError::Transport(format!(
                        "no response within {}s",
                        self.config.request_timeout.as_secs()
                    ))),
                };

            match result {
                Ok(response) => {
                    debug!(%task, attempts = attempt + 1, "ai response ready");
                    return AiOutcome::Ready(response);
                }
                Err(EndpointError::RateLimited) if attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = self.config.backoff_step.saturating_mul(attempt);
                    debug!(%task, attempt, delay_ms = delay.as_millis() as u64, "rate limited, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    warn!(%task, attempts = attempt + 1, error = %e, "ai endpoint offline");
                    return AiOutcome::Offline;
                }
            }
        }
    }
}

impl<E> fmt::Debug for SummaryClient<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
