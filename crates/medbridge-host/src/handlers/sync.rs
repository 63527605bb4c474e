use medbridge_message::OfflineSyncResult;
use tracing::debug;

use crate::error::Result;
use crate::services::Storage;

/// Move dose logs recorded offline into the dose-log collection.
///
/// Logs are copied before the queue is cleared, so a failure part-way leaves
/// the remaining entries queued for the next sync.
pub async fn drain(storage: &Storage) -> Result<OfflineSyncResult> {
    let queued = storage.offline_queue().await?;
    let mut synced = Vec::with_capacity(queued.len());
    for log in &queued {
        storage.save_dose_log(log).await?;
        synced.push(log.id.clone());
    }
    storage.clear_offline(&synced).await?;

    debug!(synced = synced.len(), "offline queue drained");
    Ok(OfflineSyncResult {
        success: true,
        synced: synced.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::store::fixtures::dose_log;

    #[tokio::test]
    async fn drains_queue_into_dose_logs() {
        let storage = Storage::in_memory();
        storage
            .queue_offline(&dose_log("l1", "2024-05-01T08:00:00"))
            .await
            .unwrap();
        storage
            .queue_offline(&dose_log("l2", "2024-05-01T20:00:00"))
            .await
            .unwrap();

        let result = drain(&storage).await.unwrap();
        assert_eq!(result.synced, 2);
        assert!(storage.offline_queue().await.unwrap().is_empty());
        assert_eq!(storage.dose_logs().await.unwrap().len(), 2);

        assert_eq!(drain(&storage).await.unwrap().synced, 0);
    }
}
