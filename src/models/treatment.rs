use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treatment {
    pub id: Uuid,
    pub organization_id: Option<Uuid>,
    pub name: String,
    pub dosage: String,
    /// Interval between doses. `None` for treatments without a dosing schedule.
    pub frequency_hours: Option<u32>,
    pub duration_days: Option<u32>,
    pub instructions: Option<String>,
}
