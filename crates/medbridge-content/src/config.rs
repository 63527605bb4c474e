use std::time::Duration;

/// Default wait for a correlated reply.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Used by [`BridgeClient::request`](crate::BridgeClient::request); `send_request`
    /// takes its own.
    pub request_timeout: Duration,
    /// Per-subscriber buffer; lagging subscribers lose the oldest messages.
    pub listener_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            listener_capacity: 64,
        }
    }
}

/// Retry and timeout behavior of the AI summary client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiConfig {
    /// Extra attempts after a rate-limited first try.
    pub max_retries: u32,
    /// Sleep before retry `n` is `backoff_step * n`.
    pub backoff_step: Duration,
    pub request_timeout: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff_step: Duration::from_secs(3),
            request_timeout: Duration::from_secs(30),
        }
    }
}
