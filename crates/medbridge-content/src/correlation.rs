use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use medbridge_message::{BridgeMessage, EventType, Uuid};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::debug;

use crate::error::{BridgeError, Result};

/// Outstanding requests keyed by request id.
///
/// Each entry is resolved at most once: by [`resolve`](Self::resolve) when
/// the matching reply arrives, or by eviction when its [`Pending`] times out
/// or is dropped. Whichever happens first removes the entry.
#[derive(Clone, Default)]
pub struct CorrelationTable {
    entries: Arc<Mutex<HashMap<Uuid, oneshot::Sender<BridgeMessage>>>>,
}

impl CorrelationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start waiting for a reply to `request_id`.
    pub fn register(&self, request_id: Uuid) -> Pending {
        let (tx, rx) = oneshot::channel();
        self.entries.lock().insert(request_id, tx);
        Pending {
            request_id,
            rx,
            table: self.clone(),
        }
    }

    /// Deliver `msg` to the request it answers. Returns false when nothing
    /// is waiting on its request id.
    pub fn resolve(&self, msg: BridgeMessage) -> bool {
        let Some(tx) = self.entries.lock().remove(&msg.request_id) else {
            return false;
        };
        tx.send(msg).is_ok()
    }

    /// Remove an entry without resolving it. Returns whether it was present.
    pub fn evict(&self, request_id: Uuid) -> bool {
        self.entries.lock().remove(&request_id).is_some()
    }

    pub fn contains(&self, request_id: Uuid) -> bool {
        self.entries.lock().contains_key(&request_id)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl std::fmt::Debug for CorrelationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorrelationTable")
            .field("pending", &self.len())
            .finish()
    }
}

/// A registered request awaiting its reply. Dropping it evicts the entry.
#[derive(Debug)]
pub struct Pending {
    request_id: Uuid,
    rx: oneshot::Receiver<BridgeMessage>,
    table: CorrelationTable,
}

impl Pending {
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Wait up to `timeout` for the reply. `event` names the request in the
    /// timeout error.
    pub async fn wait(mut self, event: EventType, timeout: Duration) -> Result<BridgeMessage> {
        match tokio::time::timeout(timeout, &mut self.rx).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(_)) => Err(BridgeError::Closed),
            Err(_) => {
                if !self.table.evict(self.request_id) {
                    // Resolved between the deadline firing and eviction.
                    if let Ok(reply) = self.rx.try_recv() {
                        return Ok(reply);
                    }
                }
                debug!(%event, request_id = %self.request_id, "request timed out");
                Err(BridgeError::Timeout { event, timeout })
            }
        }
    }
}

impl Drop for Pending {
    fn drop(&mut self) {
        self.table.evict(self.request_id);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn resolve_delivers_once() {
        let table = CorrelationTable::new();
        let request = BridgeMessage::request(EventType::ProfileLoad, json!({}));
        let pending = table.register(request.request_id);
        assert!(table.contains(request.request_id));

        let reply = request.reply(EventType::ProfileLoadResult, json!(null));
        assert!(table.resolve(reply.clone()));
        assert!(!table.resolve(reply.clone()));
        assert!(table.is_empty());

        let got = pending
            .wait(EventType::ProfileLoad, Duration::from_millis(10))
            .await
            .expect("resolved");
        assert_eq!(got, reply);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_evicts_entry() {
        let table = CorrelationTable::new();
        let id = Uuid::new_v4();
        let pending = table.register(id);

        let err = pending
            .wait(EventType::ScheduleLoad, Duration::from_millis(100))
            .await
            .expect_err("no reply");
        assert!(matches!(
            err,
            BridgeError::Timeout { event: EventType::ScheduleLoad, timeout }
                if timeout == Duration::from_millis(100)
        ));
        assert!(!table.contains(id));
    }

    #[tokio::test(start_paused = true)]
    async fn late_reply_is_unmatched() {
        let table = CorrelationTable::new();
        let request = BridgeMessage::request(EventType::AuthRequest, json!({}));
        let pending = table.register(request.request_id);

        assert!(pending
            .wait(EventType::AuthRequest, Duration::from_millis(50))
            .await
            .is_err());
        assert!(!table.resolve(request.reply(EventType::AuthResult, json!({}))));
    }

    #[test]
    fn dropping_pending_evicts() {
        let table = CorrelationTable::new();
        let id = Uuid::new_v4();
        let pending = table.register(id);
        assert_eq!(table.len(), 1);
        drop(pending);
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn entries_are_independent() {
        let table = CorrelationTable::new();
        let a = BridgeMessage::request(EventType::ProfileLoad, json!({}));
        let b = BridgeMessage::request(EventType::ScheduleLoad, json!({}));
        let pending_a = table.register(a.request_id);
        let pending_b = table.register(b.request_id);

        table.resolve(b.reply(EventType::ScheduleLoadResult, json!({ "n": 2 })));
        table.resolve(a.reply(EventType::ProfileLoadResult, json!({ "n": 1 })));

        let wait = Duration::from_millis(10);
        let got_b = pending_b.wait(EventType::ScheduleLoad, wait).await.expect("b");
        let got_a = pending_a.wait(EventType::ProfileLoad, wait).await.expect("a");
        assert_eq!(got_a.payload["n"], 1);
        assert_eq!(got_b.payload["n"], 2);
    }
}
