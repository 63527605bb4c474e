//! A host session and a bridge client connected over in-process channels.
//!
//! Host → content traffic goes through the script-injection envelope, the
//! same way it reaches a real rendering surface.

use std::sync::Arc;

use medbridge_content::{BridgeClient, ClientConfig};
use medbridge_host::{HostConfig, HostSession, Services};
use medbridge_transport::{channel, ChannelTransport, InjectingTransport};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub type LoopbackHost = HostSession<InjectingTransport<ChannelTransport>>;
pub type LoopbackClient = BridgeClient<ChannelTransport>;

pub struct Loopback {
    host: Arc<LoopbackHost>,
    client: Arc<LoopbackClient>,
    to_host: Arc<ChannelTransport>,
    content_inbound: Option<mpsc::UnboundedReceiver<String>>,
    host_task: JoinHandle<()>,
}

impl Loopback {
    /// Start the host pump. The content side stays unmounted until
    /// [`mount`](Self::mount). Must be called from within a tokio runtime.
    pub fn start(services: Services, host_config: HostConfig, client_config: ClientConfig) -> Self {
        let (to_content, content_inbound) = channel("content");
        let (to_host, host_inbound) = channel("host");
        let to_host = Arc::new(to_host);

        let host = Arc::new(HostSession::new(
            Arc::new(InjectingTransport::new(to_content)),
            services,
            host_config,
        ));
        let host_task = tokio::spawn(Arc::clone(&host).run(host_inbound));
        let client = Arc::new(BridgeClient::new(Arc::clone(&to_host), client_config));

        Self {
            host,
            client,
            to_host,
            content_inbound: Some(content_inbound),
            host_task,
        }
    }

    pub fn host(&self) -> &Arc<LoopbackHost> {
        &self.host
    }

    pub fn client(&self) -> &Arc<LoopbackClient> {
        &self.client
    }

    /// Attach the content side's inbound pump and send READY. Returns false
    /// once already mounted.
    pub fn mount(&mut self) -> bool {
        match self.content_inbound.take() {
            Some(inbound) => self.client.init(inbound),
            None => false,
        }
    }

    /// Tear down the rendering surface. Host messages sent afterwards are
    /// dropped; the session stays ready.
    pub fn unmount(&self) {
        self.host.queue().transport().get_ref().detach();
    }

    /// Close content → host delivery and wait for in-flight handlers.
    pub async fn shutdown(self) {
        self.to_host.detach();
        if let Err(e) = self.host_task.await {
            tracing::error!(error = %e, "host session task failed");
        }
    }
}

impl std::fmt::Debug for Loopback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loopback")
            .field("host", &self.host)
            .field("client", &self.client)
            .field("mounted", &self.content_inbound.is_none())
            .finish()
    }
}
