use std::sync::Arc;

use medbridge_message::{decode, BridgeMessage, EventType, MessageError};
use medbridge_transport::Transport;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::config::HostConfig;
use crate::handlers::Services;
use crate::queue::{Disposition, OutboundQueue};
use crate::router::HostRouter;

/// How the session classified one raw inbound string.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Not a bridge message.
    Discarded,
    /// Well-formed, but the event is outside the taxonomy.
    Unknown(String),
    /// READY; carries how many queued messages were flushed.
    Ready { flushed: usize },
    /// Anything else, to be dispatched.
    Message(BridgeMessage),
}

/// One host-side bridge session, scoped to a single mounted content surface.
///
/// A recreated surface gets a new session with its own queue.
pub struct HostSession<T> {
    queue: OutboundQueue<T>,
    router: HostRouter,
}

impl<T: Transport + 'static> HostSession<T> {
    pub fn new(transport: Arc<T>, services: Services, config: HostConfig) -> Self {
        Self {
            queue: OutboundQueue::new(transport),
            router: HostRouter::new(services, config),
        }
    }

    pub fn queue(&self) -> &OutboundQueue<T> {
        &self.queue
    }

    pub fn router(&self) -> &HostRouter {
        &self.router
    }

    /// Send a host-initiated message through the outbound queue.
    pub fn send(&self, msg: BridgeMessage) -> Disposition {
        self.queue.enqueue_or_send(msg)
    }

    /// Classify a raw inbound string, draining the queue on READY.
    pub fn receive(&self, raw: &str) -> Inbound {
        match decode(raw) {
            Ok(msg) if msg.event == EventType::Ready => Inbound::Ready {
                flushed: self.queue.mark_ready(),
            },
            Ok(msg) => Inbound::Message(msg),
            Err(MessageError::UnknownEvent { name, request_id }) => {
                warn!(event = %name, request_id = ?request_id, "unknown bridge event ignored");
                Inbound::Unknown(name)
            }
            Err(e) => {
                debug!(error = %e, "non-bridge message discarded");
                Inbound::Discarded
            }
        }
    }

    /// Dispatch one message and queue its reply.
    pub async fn handle(&self, msg: BridgeMessage) -> Option<Disposition> {
        let reply = self.router.dispatch(&msg).await?;
        Some(self.queue.enqueue_or_send(reply))
    }

    /// Pump inbound traffic until the channel closes.
    ///
    /// Each request runs on its own task, so replies may complete out of
    /// arrival order. Outstanding handlers are awaited before returning.
    pub async fn run(self: Arc<Self>, mut inbound: mpsc::UnboundedReceiver<String>) {
        let mut tasks = JoinSet::new();
        loop {
            tokio::select! {
                raw = inbound.recv() => {
                    let Some(raw) = raw else { break };
                    if let Inbound::Message(msg) = self.receive(&raw) {
                        let session = Arc::clone(&self);
                        tasks.spawn(async move {
                            session.handle(msg).await;
                        });
                    }
                }
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = joined {
                        error!(error = %e, "host handler task failed");
                    }
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "host handler task failed");
            }
        }
        debug!("host session inbound closed");
    }
}

impl<T> std::fmt::Debug for HostSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostSession")
            .field("queue", &self.queue)
            .field("router", &self.router)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use medbridge_message::encode;
    use medbridge_transport::{channel, ChannelTransport};
    use serde_json::json;

    use super::*;

    fn session() -> (
        Arc<HostSession<ChannelTransport>>,
        mpsc::UnboundedReceiver<String>,
    ) {
        let (transport, rx) = channel("content");
        let session = HostSession::new(
            Arc::new(transport),
            Services::in_memory(),
            HostConfig::default(),
        );
        (Arc::new(session), rx)
    }

    fn raw(event: EventType, payload: serde_json::Value) -> (BridgeMessage, String) {
        let msg = BridgeMessage::request(event, payload);
        let raw = encode(&msg).expect("encodes");
        (msg, raw)
    }

    #[test]
    fn receive_classifies_input() {
        let (session, _rx) = session();

        assert_eq!(session.receive("hello"), Inbound::Discarded);
        assert_eq!(session.receive(r#"{"type":"resize"}"#), Inbound::Discarded);

        let unknown = json!({
            "event": "SELF_DESTRUCT",
            "requestId": "6f1c2a7e-8a53-4b8e-9a4e-0d7f5f1b2c3d",
            "payload": {},
            "timestamp": "2024-05-01T08:00:00.000Z"
        })
        .to_string();
        assert_eq!(
            session.receive(&unknown),
            Inbound::Unknown("SELF_DESTRUCT".into())
        );

        let (_, ready) = raw(EventType::Ready, json!({}));
        assert_eq!(session.receive(&ready), Inbound::Ready { flushed: 0 });
        assert_eq!(session.receive(&ready), Inbound::Ready { flushed: 0 });
        assert!(session.queue().is_ready());
    }

    #[tokio::test]
    async fn reply_before_ready_is_buffered() {
        let (session, mut rx) = session();
        let (msg, _) = raw(EventType::AuthRequest, json!({}));

        assert_eq!(session.handle(msg.clone()).await, Some(Disposition::Queued));
        assert!(rx.try_recv().is_err());

        assert_eq!(session.queue().mark_ready(), 1);
        let reply = decode(&rx.try_recv().expect("flushed reply")).expect("decodes");
        assert_eq!(reply.request_id, msg.request_id);
    }

    #[tokio::test]
    async fn run_answers_requests_after_ready() {
        let (session, mut rx) = session();
        let (tx, inbound) = mpsc::unbounded_channel();
        let pump = tokio::spawn(Arc::clone(&session).run(inbound));

        let (_, ready) = raw(EventType::Ready, json!({}));
        let (request, request_raw) = raw(EventType::ScheduleLoad, json!({}));
        tx.send(ready).expect("send ready");
        tx.send("not json".into()).expect("send noise");
        tx.send(request_raw).expect("send request");
        drop(tx);
        pump.await.expect("pump finishes");

        let reply = decode(&rx.recv().await.expect("reply")).expect("decodes");
        assert_eq!(reply.event, EventType::ScheduleLoadResult);
        assert_eq!(reply.request_id, request.request_id);
        assert_eq!(
            reply.payload,
            json!({ "medicines": [], "schedules": [], "doseLogs": [] })
        );
        assert!(rx.try_recv().is_err());
    }
}
