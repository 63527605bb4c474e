//! Records persisted by the host on behalf of the content side.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicineForm {
    Tablet,
    Capsule,
    Liquid,
    Injection,
    Patch,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyUnit {
    Daily,
    Weekly,
    AsNeeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoseStatus {
    Pending,
    Taken,
    Missed,
    Skipped,
    Snoozed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

/// The single user profile stored on the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub date_of_birth: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_uri: Option<String>,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caregiver_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caregiver_phone: Option<String>,
    pub biometric_enabled: bool,
    pub theme: Theme,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    pub strength: f64,
    pub unit: String,
    pub form: MedicineForm,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescribed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pills: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_pills: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refill_threshold: Option<u32>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// When a medicine is due. `scheduled_times` are `HH:MM` strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoseSchedule {
    pub id: String,
    pub medicine_id: String,
    pub user_id: String,
    pub frequency: FrequencyUnit,
    pub times_per_day: u32,
    pub scheduled_times: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<u8>>,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub notification_ids: Vec<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// One taken/missed/skipped dose. `scheduled_at` is an ISO-8601 local
/// timestamp (`2024-05-01T08:00:00`), which makes date-prefix queries work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoseLog {
    pub id: String,
    pub schedule_id: String,
    pub medicine_id: String,
    pub user_id: String,
    pub scheduled_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logged_at: Option<String>,
    pub status: DoseStatus,
    #[serde(default)]
    pub ai_suggested: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn medicine_from_camel_case_json() {
        let medicine: Medicine = serde_json::from_value(json!({
            "id": "m1",
            "userId": "u1",
            "name": "Metformin",
            "strength": 500,
            "unit": "mg",
            "form": "tablet",
            "isActive": true,
            "createdAt": "2024-05-01T08:00:00.000Z",
            "updatedAt": "2024-05-01T08:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(medicine.form, MedicineForm::Tablet);
        assert_eq!(medicine.strength, 500.0);
        assert!(medicine.brand_name.is_none());

        let back = serde_json::to_value(&medicine).unwrap();
        assert!(back.get("brandName").is_none());
        assert_eq!(back["userId"], "u1");
    }

    #[test]
    fn enum_wire_names() {
        assert_eq!(
            serde_json::to_value(FrequencyUnit::AsNeeded).unwrap(),
            "as_needed"
        );
        assert_eq!(serde_json::to_value(DoseStatus::Snoozed).unwrap(), "snoozed");
        assert_eq!(serde_json::to_value(Theme::Dark).unwrap(), "dark");
        assert_eq!(Theme::default(), Theme::System);
    }

    #[test]
    fn dose_log_defaults() {
        let log: DoseLog = serde_json::from_value(json!({
            "id": "l1",
            "scheduleId": "s1",
            "medicineId": "m1",
            "userId": "u1",
            "scheduledAt": "2024-05-01T08:00:00",
            "status": "taken",
            "createdAt": "2024-05-01T08:01:00.000Z"
        }))
        .unwrap();

        assert!(!log.ai_suggested);
        assert_eq!(log.status, DoseStatus::Taken);
    }
}
