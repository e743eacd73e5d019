use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Planner output for one treatment assignment. Never persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReminderSpec {
    pub description: String,
    pub dates: Vec<DateTime<Utc>>,
}

/// A persisted reminder for one patient/treatment/instant triple.
///
/// At most one record exists per triple; records are created once and
/// never updated by the reminder core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderRecord {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub treatment_id: Uuid,
    pub notify_at: DateTime<Utc>,
    pub notified: bool,
    pub created_at: DateTime<Utc>,
}

impl ReminderRecord {
    pub fn new(
        patient_id: Uuid,
        treatment_id: Uuid,
        notify_at: DateTime<Utc>,
        notified: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id,
            treatment_id,
            notify_at,
            notified,
            created_at,
        }
    }
}
