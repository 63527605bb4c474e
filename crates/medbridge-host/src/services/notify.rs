use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{HostError, Result};

/// Fires every day at `hour:minute` local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTrigger {
    pub hour: u8,
    pub minute: u8,
}

impl DailyTrigger {
    /// Parse an `HH:MM` time of day.
    pub fn parse(time: &str) -> Result<Self> {
        let invalid = || HostError::InvalidTime(time.to_string());

        let (hour, minute) = time.split_once(':').ok_or_else(invalid)?;
        if hour.is_empty() || minute.is_empty() {
            return Err(invalid());
        }
        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;
        if hour >= 24 || minute >= 60 {
            return Err(invalid());
        }
        Ok(Self { hour, minute })
    }
}

impl fmt::Display for DailyTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    pub data: Value,
}

/// Platform local-notification service.
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Schedule a repeating notification and return its platform id.
    async fn schedule(&self, content: NotificationContent, trigger: DailyTrigger)
        -> Result<String>;

    async fn cancel(&self, id: &str) -> Result<()>;
}

/// In-process notifier handing out ids `notif-1`, `notif-2`, ...
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    next_id: AtomicU64,
    scheduled: Mutex<HashMap<String, (NotificationContent, DailyTrigger)>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scheduled(&self, id: &str) -> Option<(NotificationContent, DailyTrigger)> {
        self.scheduled.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.scheduled.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.scheduled.lock().is_empty()
    }
}

#[async_trait]
impl NotificationService for MemoryNotifier {
    async fn schedule(
        &self,
        content: NotificationContent,
        trigger: DailyTrigger,
    ) -> Result<String> {
        let id = format!("notif-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.scheduled
            .lock()
            .insert(id.clone(), (content, trigger));
        Ok(id)
    }

    async fn cancel(&self, id: &str) -> Result<()> {
        match self.scheduled.lock().remove(id) {
            Some(_) => Ok(()),
            None => Err(HostError::Notification(format!(
                "no scheduled notification '{id}'"
            ))),
        }
    }
}
