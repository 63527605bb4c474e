use medbridge_message::{reply_event_for, BridgeMessage, HostReply, HostRequest, MessageError};
use tracing::{debug, error};

use crate::config::{FailurePolicy, HostConfig};
use crate::error::Result;
use crate::handlers::{self, Services};

/// Dispatches typed host requests to the domain handlers.
#[derive(Debug, Clone)]
pub struct HostRouter {
    services: Services,
    config: HostConfig,
}

impl HostRouter {
    pub fn new(services: Services, config: HostConfig) -> Self {
        Self { services, config }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Handle one inbound message and build the correlated reply, if any.
    ///
    /// Failures never escape: they are logged and, under
    /// [`FailurePolicy::ErrorReply`], answered with `{success:false, error}`.
    pub async fn dispatch(&self, msg: &BridgeMessage) -> Option<BridgeMessage> {
        let outcome = match HostRequest::from_message(msg) {
            Ok(request) => self.handle(request).await,
            Err(MessageError::NotARequest(event)) => {
                debug!(%event, request_id = %msg.request_id, "not a host request, ignored");
                return None;
            }
            Err(e) => Err(e.into()),
        };

        let reply = match outcome {
            Ok(reply) => reply?,
            Err(e) => {
                error!(
                    event = %msg.event,
                    request_id = %msg.request_id,
                    error = %e,
                    "host handler failed"
                );
                match self.config.failure_policy {
                    FailurePolicy::Silent => return None,
                    FailurePolicy::ErrorReply => HostReply::Failed {
                        event: reply_event_for(msg.event)?,
                        error: e.to_string(),
                    },
                }
            }
        };

        match reply.into_message(msg.request_id) {
            Ok(out) => {
                debug!(event = %out.event, request_id = %out.request_id, "reply built");
                Some(out)
            }
            Err(e) => {
                error!(request_id = %msg.request_id, error = %e, "reply not serializable");
                None
            }
        }
    }

    /// Run the handler for `request`. THEME_SET produces no reply.
    pub async fn handle(&self, request: HostRequest) -> Result<Option<HostReply>> {
        let storage = &self.services.storage;
        let reply = match request {
            HostRequest::AuthSetup(setup) => {
                HostReply::Auth(handlers::auth::setup(self.services.secure.as_ref(), &setup).await?)
            }
            HostRequest::AuthRequest => HostReply::Auth(handlers::auth::request()),
            HostRequest::ProfileSave(profile) => {
                HostReply::ProfileSaved(handlers::profile::save(storage, &profile).await?)
            }
            HostRequest::ProfileLoad => HostReply::Profile(handlers::profile::load(storage).await?),
            HostRequest::ScheduleSave(save) => {
                HostReply::ScheduleSaved(handlers::schedule::save(storage, &save).await?)
            }
            HostRequest::ScheduleLoad => {
                HostReply::Schedule(handlers::schedule::load(storage).await?)
            }
            HostRequest::DoseLogSave(log) => {
                HostReply::DoseLogSaved(handlers::schedule::save_dose_log(storage, &log).await?)
            }
            HostRequest::NotificationSchedule(schedule) => HostReply::Notifications(
                handlers::notification::schedule(
                    self.services.notifier.as_ref(),
                    &schedule,
                    &self.config.notification_body,
                )
                .await?,
            ),
            HostRequest::NotificationCancel(cancel) => HostReply::Notifications(
                handlers::notification::cancel(self.services.notifier.as_ref(), &cancel).await,
            ),
            HostRequest::OfflineSync => {
                HostReply::OfflineSynced(handlers::sync::drain(storage).await?)
            }
            HostRequest::ThemeSet(set) => {
                handlers::theme::set(storage, set.theme).await?;
                return Ok(None);
            }
            HostRequest::SendMessage(message) => HostReply::MessageSent(
                handlers::share::send(
                    self.services.share.as_ref(),
                    &message,
                    &self.config.share_title,
                )
                .await,
            ),
        };
        Ok(Some(reply))
    }
}
