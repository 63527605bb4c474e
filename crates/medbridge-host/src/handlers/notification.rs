use medbridge_message::{NotificationCancel, NotificationResult, NotificationSchedule};
use serde_json::json;
use tracing::{debug, warn};

use crate::error::Result;
use crate::services::{DailyTrigger, NotificationContent, NotificationService};

/// Schedule one daily reminder per `HH:MM` entry.
///
/// Every time is validated before anything is scheduled. Returned ids follow
/// the order of `scheduled_times`.
pub async fn schedule(
    notifier: &dyn NotificationService,
    request: &NotificationSchedule,
    body: &str,
) -> Result<NotificationResult> {
    let triggers = request
        .scheduled_times
        .iter()
        .map(|time| DailyTrigger::parse(time).map(|trigger| (time, trigger)))
        .collect::<Result<Vec<_>>>()?;

    let mut ids = Vec::with_capacity(triggers.len());
    for (time, trigger) in triggers {
        let content = NotificationContent {
            title: format!("Time for {}", request.medicine_name),
            body: body.to_string(),
            data: json!({
                "scheduleId": request.schedule_id,
                "medicineName": request.medicine_name,
                "time": time,
            }),
        };
        let id = notifier.schedule(content, trigger).await?;
        debug!(id = %id, %trigger, "notification scheduled");
        ids.push(id);
    }

    Ok(NotificationResult {
        success: true,
        notification_ids: Some(ids),
    })
}

/// Cancel each id independently; a failure on one does not stop the rest.
pub async fn cancel(
    notifier: &dyn NotificationService,
    request: &NotificationCancel,
) -> NotificationResult {
    let mut failed = 0usize;
    for id in &request.notification_ids {
        if let Err(e) = notifier.cancel(id).await {
            warn!(id = %id, error = %e, "notification cancel failed");
            failed += 1;
        }
    }
    debug!(
        requested = request.notification_ids.len(),
        failed, "notifications cancelled"
    );
    NotificationResult {
        success: true,
        notification_ids: None,
    }
}
