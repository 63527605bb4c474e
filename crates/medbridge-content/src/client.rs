use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use medbridge_message::{decode, encode, BridgeMessage, EventType, HostRequest, MessageError};
use medbridge_transport::{extract_injected, is_injected, Transport};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::correlation::CorrelationTable;
use crate::error::{BridgeError, Result};

/// Content-side bridge endpoint for one host session.
///
/// Sends requests over `transport` and routes host traffic arriving through
/// [`init`](Self::init) or [`handle_incoming`](Self::handle_incoming).
pub struct BridgeClient<T> {
    transport: Arc<T>,
    table: CorrelationTable,
    listeners: broadcast::Sender<BridgeMessage>,
    config: ClientConfig,
    initialized: AtomicBool,
}

impl<T: Transport + 'static> BridgeClient<T> {
    pub fn new(transport: Arc<T>, config: ClientConfig) -> Self {
        let (listeners, _) = broadcast::channel(config.listener_capacity.max(1));
        Self {
            transport,
            table: CorrelationTable::new(),
            listeners,
            config,
            initialized: AtomicBool::new(false),
        }
    }

    /// Attach the inbound pump and announce READY to the host.
    ///
    /// Only the first call does anything; it returns `true`. Must be called
    /// from within a tokio runtime.
    pub fn init(self: &Arc<Self>, inbound: mpsc::UnboundedReceiver<String>) -> bool {
        if self.initialized.swap(true, Ordering::AcqRel) {
            debug!("bridge client already initialized");
            return false;
        }

        let client = Arc::clone(self);
        tokio::spawn(async move { client.pump(inbound).await });

        if let Err(e) = self.post(&BridgeMessage::ready()) {
            warn!(error = %e, "ready signal not delivered");
        }
        debug!("bridge client initialized");
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Feed inbound host traffic until the channel closes.
    pub async fn pump(&self, mut inbound: mpsc::UnboundedReceiver<String>) {
        while let Some(raw) = inbound.recv().await {
            self.handle_incoming(&raw);
        }
        debug!(pending = self.table.len(), "bridge inbound closed");
    }

    /// Route one raw inbound string, either bare JSON or an injected
    /// dispatch script.
    ///
    /// Returns whether it was a bridge message. Matching replies resolve
    /// their pending request; every message is then broadcast to
    /// subscribers whether or not it matched.
    pub fn handle_incoming(&self, raw: &str) -> bool {
        let json = if is_injected(raw) {
            match extract_injected(raw) {
                Ok(json) => json,
                Err(e) => {
                    debug!(error = %e, "malformed dispatch script discarded");
                    return false;
                }
            }
        } else {
            raw.to_string()
        };

        let msg = match decode(&json) {
            Ok(msg) => msg,
            Err(MessageError::UnknownEvent { name, request_id }) => {
                let pending = request_id.is_some_and(|id| self.table.contains(id));
                warn!(
                    event = %name,
                    request_id = ?request_id,
                    pending,
                    "unknown bridge event ignored"
                );
                return false;
            }
            Err(e) => {
                debug!(error = %e, "non-bridge message discarded");
                return false;
            }
        };

        if msg.event == EventType::Ready {
            debug!("ready from host ignored");
            return true;
        }

        let resolved = self.table.resolve(msg.clone());
        debug!(
            event = %msg.event,
            request_id = %msg.request_id,
            resolved,
            "bridge message received"
        );
        // No subscribers is fine.
        let _ = self.listeners.send(msg);
        true
    }

    /// Send `event` and wait up to `timeout` for the correlated reply.
    ///
    /// A failed post is not reported; the request simply times out. A reply
    /// of the form `{success:false, error}` becomes [`BridgeError::Rejected`].
    pub async fn send_request(
        &self,
        event: EventType,
        payload: Value,
        timeout: Duration,
    ) -> Result<BridgeMessage> {
        let msg = BridgeMessage::request(event, payload);
        let pending = self.table.register(msg.request_id);

        if let Err(e) = self.post(&msg) {
            debug!(%event, request_id = %msg.request_id, error = %e, "request not delivered");
        }

        let reply = pending.wait(event, timeout).await?;
        if let Some(error) = rejection(&reply.payload) {
            return Err(BridgeError::Rejected {
                event,
                error: error.to_string(),
            });
        }
        Ok(reply)
    }

    /// Send a typed request with the configured timeout.
    pub async fn request(&self, request: HostRequest) -> Result<BridgeMessage> {
        let event = request.event();
        let payload = request.payload()?;
        self.send_request(event, payload, self.config.request_timeout)
            .await
    }

    /// Send a typed request and deserialize the reply payload.
    pub async fn call<R: DeserializeOwned>(&self, request: HostRequest) -> Result<R> {
        let reply = self.request(request).await?;
        Ok(reply.payload_as()?)
    }

    /// Send a request the host never answers (THEME_SET).
    pub fn emit(&self, request: HostRequest) -> Result<()> {
        let msg = request.into_message()?;
        self.post(&msg)
    }

    /// Receive every inbound bridge message from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<BridgeMessage> {
        self.listeners.subscribe()
    }

    pub fn correlation(&self) -> &CorrelationTable {
        &self.table
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn post(&self, msg: &BridgeMessage) -> Result<()> {
        let raw = encode(msg)?;
        self.transport.post(&raw)?;
        Ok(())
    }
}

fn rejection(payload: &Value) -> Option<&str> {
    if payload.get("success").and_then(Value::as_bool) != Some(false) {
        return None;
    }
    payload.get("error").and_then(Value::as_str)
}

impl<T> std::fmt::Debug for BridgeClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeClient")
            .field("pending", &self.table.len())
            .field("initialized", &self.initialized.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
