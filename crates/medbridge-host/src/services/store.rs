use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use medbridge_message::{DoseLog, DoseSchedule, Medicine, Theme, UserProfile};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

const PROFILE_KEY: &str = "current";
const THEME_KEY: &str = "theme";

/// Logical collections in the local persistent store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Medicines,
    Schedules,
    DoseLogs,
    Profile,
    Settings,
    OfflineQueue,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Medicines => "medicines",
            Collection::Schedules => "schedules",
            Collection::DoseLogs => "doseLogs",
            Collection::Profile => "profile",
            Collection::Settings => "settings",
            Collection::OfflineQueue => "offlineQueue",
        }
    }
}

/// Key-value persistence keyed by collection and entity id.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>>;

    /// Insert or replace the entity stored under `id`.
    async fn put(&self, collection: Collection, id: &str, value: Value) -> Result<()>;

    /// Remove an entity. Returns whether it existed.
    async fn delete(&self, collection: Collection, id: &str) -> Result<bool>;

    async fn list(&self, collection: Collection) -> Result<Vec<Value>>;
}

/// Process-local store; entities are listed in id order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<Collection, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        Ok(self
            .collections
            .lock()
            .get(&collection)
            .and_then(|entries| entries.get(id).cloned()))
    }

    async fn put(&self, collection: Collection, id: &str, value: Value) -> Result<()> {
        self.collections
            .lock()
            .entry(collection)
            .or_default()
            .insert(id.to_string(), value);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<bool> {
        Ok(self
            .collections
            .lock()
            .get_mut(&collection)
            .is_some_and(|entries| entries.remove(id).is_some()))
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Value>> {
        Ok(self
            .collections
            .lock()
            .get(&collection)
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default())
    }
}

/// Typed view over a [`KeyValueStore`].
///
/// Every save is last-write-wins keyed by the record id.
#[derive(Clone)]
pub struct Storage {
    store: Arc<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Storage over a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub async fn save_medicine(&self, medicine: &Medicine) -> Result<()> {
        self.put_record(Collection::Medicines, &medicine.id, medicine)
            .await
    }

    pub async fn medicines(&self) -> Result<Vec<Medicine>> {
        self.list_records(Collection::Medicines).await
    }

    pub async fn save_schedule(&self, schedule: &DoseSchedule) -> Result<()> {
        self.put_record(Collection::Schedules, &schedule.id, schedule)
            .await
    }

    pub async fn schedules(&self) -> Result<Vec<DoseSchedule>> {
        self.list_records(Collection::Schedules).await
    }

    pub async fn save_dose_log(&self, log: &DoseLog) -> Result<()> {
        self.put_record(Collection::DoseLogs, &log.id, log).await
    }

    pub async fn dose_logs(&self) -> Result<Vec<DoseLog>> {
        self.list_records(Collection::DoseLogs).await
    }

    /// Dose logs whose `scheduledAt` starts with `date_prefix` (e.g. `2024-05-01`).
    pub async fn dose_logs_on(&self, date_prefix: &str) -> Result<Vec<DoseLog>> {
        let mut logs = self.dose_logs().await?;
        logs.retain(|log| log.scheduled_at.starts_with(date_prefix));
        Ok(logs)
    }

    pub async fn profile(&self) -> Result<Option<UserProfile>> {
        self.get_record(Collection::Profile, PROFILE_KEY).await
    }

    /// Replace the stored profile wholesale.
    pub async fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        self.put_record(Collection::Profile, PROFILE_KEY, profile)
            .await
    }

    pub async fn theme(&self) -> Result<Option<Theme>> {
        self.get_record(Collection::Settings, THEME_KEY).await
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<()> {
        self.put_record(Collection::Settings, THEME_KEY, &theme)
            .await
    }

    /// Park a dose log recorded while the content side was offline.
    pub async fn queue_offline(&self, log: &DoseLog) -> Result<()> {
        self.put_record(Collection::OfflineQueue, &log.id, log)
            .await
    }

    pub async fn offline_queue(&self) -> Result<Vec<DoseLog>> {
        self.list_records(Collection::OfflineQueue).await
    }

    pub async fn clear_offline(&self, ids: &[String]) -> Result<()> {
        for id in ids {
            self.store.delete(Collection::OfflineQueue, id).await?;
        }
        Ok(())
    }

    async fn put_record<T: Serialize + Sync>(
        &self,
        collection: Collection,
        id: &str,
        record: &T,
    ) -> Result<()> {
        let value = serde_json::to_value(record)?;
        self.store.put(collection, id, value).await
    }

    async fn get_record<T: DeserializeOwned>(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<T>> {
        match self.store.get(collection, id).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn list_records<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
        self.store
            .list(collection)
            .await?
            .into_iter()
            .map(|value| serde_json::from_value(value).map_err(Into::into))
            .collect()
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[tokio::test]
    async fn save_medicine_is_last_write_wins() {
        let storage = Storage::in_memory();
        storage.save_medicine(&medicine("m1", "Aspirin")).await.unwrap();
        storage.save_medicine(&medicine("m2", "Metformin")).await.unwrap();
        storage
            .save_medicine(&medicine("m1", "Aspirin 81"))
            .await
            .unwrap();

        let medicines = storage.medicines().await.unwrap();
        assert_eq!(medicines.len(), 2);
        let m1 = medicines.iter().find(|m| m.id == "m1").unwrap();
        assert_eq!(m1.name, "Aspirin 81");
    }

    #[tokio::test]
    async fn dose_logs_by_date_prefix() {
        let storage = Storage::in_memory();
        storage
            .save_dose_log(&dose_log("l1", "2024-05-01T08:00:00"))
            .await
            .unwrap();
        storage
            .save_dose_log(&dose_log("l2", "2024-05-01T20:00:00"))
            .await
            .unwrap();
        storage
            .save_dose_log(&dose_log("l3", "2024-05-02T08:00:00"))
            .await
            .unwrap();

        let day = storage.dose_logs_on("2024-05-01").await.unwrap();
        let ids: Vec<_> = day.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["l1", "l2"]);
    }

    #[tokio::test]
    async fn profile_is_single_record() {
        let storage = Storage::in_memory();
        assert!(storage.profile().await.unwrap().is_none());

        storage.save_profile(&profile("Ada")).await.unwrap();
        storage.save_profile(&profile("Ada L.")).await.unwrap();

        assert_eq!(storage.profile().await.unwrap().unwrap().name, "Ada L.");
    }

    #[tokio::test]
    async fn theme_roundtrip() {
        let storage = Storage::in_memory();
        assert!(storage.theme().await.unwrap().is_none());
        storage.set_theme(Theme::Dark).await.unwrap();
        assert_eq!(storage.theme().await.unwrap(), Some(Theme::Dark));
    }

    #[tokio::test]
    async fn memory_store_delete_reports_presence() {
        let store = MemoryStore::new();
        store
            .put(Collection::Settings, "k", Value::Bool(true))
            .await
            .unwrap();
        assert!(store.delete(Collection::Settings, "k").await.unwrap());
        assert!(!store.delete(Collection::Settings, "k").await.unwrap());
        assert!(!store.delete(Collection::Medicines, "k").await.unwrap());
    }
}
