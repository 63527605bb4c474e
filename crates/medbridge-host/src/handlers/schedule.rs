use medbridge_message::{Ack, DoseLog, ScheduleSave, ScheduleSnapshot};
use tracing::debug;

use crate::error::Result;
use crate::services::Storage;

/// Upsert the medicine and/or schedule carried by the request.
pub async fn save(storage: &Storage, request: &ScheduleSave) -> Result<Ack> {
    if let Some(medicine) = &request.medicine {
        storage.save_medicine(medicine).await?;
        debug!(medicine_id = %medicine.id, "medicine saved");
    }
    if let Some(schedule) = &request.schedule {
        storage.save_schedule(schedule).await?;
        debug!(schedule_id = %schedule.id, "schedule saved");
    }
    Ok(Ack::OK)
}

pub async fn load(storage: &Storage) -> Result<ScheduleSnapshot> {
    Ok(ScheduleSnapshot {
        medicines: storage.medicines().await?,
        schedules: storage.schedules().await?,
        dose_logs: storage.dose_logs().await?,
    })
}

pub async fn save_dose_log(storage: &Storage, log: &DoseLog) -> Result<Ack> {
    storage.save_dose_log(log).await?;
    Ok(Ack::OK)
}
