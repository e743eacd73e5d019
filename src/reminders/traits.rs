//! Seams of the reminder core.
//!
//! - ReminderPlanner: which instants a treatment assignment should remind at
//! - ReminderStore: dedup-keyed persistence of reminder records

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{ReminderRecord, ReminderSpec};

/// Derives the reminder description and instants for a treatment
/// assigned in a consultation.
pub trait ReminderPlanner: Send + Sync {
    /// `None` when reminders do not apply (unknown treatment or
    /// consultation, or a treatment without a dosing schedule).
    fn plan(
        &self,
        conn: &Connection,
        treatment_id: &Uuid,
        consultation_id: &Uuid,
    ) -> Result<Option<ReminderSpec>, DatabaseError>;
}

/// Reminder record persistence keyed on (patient, treatment, notify_at).
pub trait ReminderStore: Send + Sync {
    /// Point lookup by the dedup key.
    fn find(
        &self,
        conn: &Connection,
        patient_id: &Uuid,
        treatment_id: &Uuid,
        notify_at: &DateTime<Utc>,
    ) -> Result<Option<ReminderRecord>, DatabaseError>;

    /// Atomically insert unless the key exists. `Ok(false)` means the
    /// key was already taken and nothing was written.
    fn insert_if_absent(&self, conn: &Connection, record: &ReminderRecord) -> Result<bool, DatabaseError>;
}
