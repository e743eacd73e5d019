use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A medical consultation. `patient_id` is `None` once the patient
/// record is gone; such consultations never schedule reminders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultation {
    pub id: Uuid,
    pub patient_id: Option<Uuid>,
    pub organization_id: Option<Uuid>,
    /// Clinic-local wall-clock time, stored on the UTC axis.
    pub consultation_date: DateTime<Utc>,
    pub reason: Option<String>,
}

/// Association between a consultation and a treatment. Creating one is
/// the treatment-assignment event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationTreatment {
    pub consultation_id: Uuid,
    pub treatment_id: Uuid,
    pub assigned_at: DateTime<Utc>,
}
