use medbridge_message::{Ack, ShareMessage};
use tracing::{debug, warn};

use crate::services::{ShareRequest, ShareService};

/// Open the share surface.
///
/// Never fails: a rejection (including the user dismissing the sheet) is
/// reported as `{success:false}`.
pub async fn send(share: &dyn ShareService, message: &ShareMessage, default_title: &str) -> Ack {
    let request = ShareRequest {
        body: message.body.clone(),
        title: message
            .title
            .clone()
            .unwrap_or_else(|| default_title.to_string()),
    };
    match share.share(request).await {
        Ok(()) => {
            debug!("message shared");
            Ack::OK
        }
        Err(e) => {
            warn!(error = %e, "share rejected");
            Ack::FAILED
        }
    }
}
