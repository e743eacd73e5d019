//! Shared reminder service state.
//!
//! Owns the database connection and the reminder collaborators so callers
//! (request handlers, jobs) only pass ids. The connection sits behind a
//! `Mutex`; each treatment assignment runs under one lock acquisition.

use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use uuid::Uuid;

use crate::config::ReminderConfig;
use crate::consultations::{self, TreatmentAssignment};
use crate::db::{self, DatabaseError};
use crate::notify::{self, Notifier};
use crate::reminders::{
    Clock, LocalClock, ReconcileReport, ReminderDeps, ReminderError, SqliteReminderStore,
    SystemClock, TreatmentSchedulePlanner,
};

pub struct ReminderService {
    conn: Mutex<Connection>,
    planner: TreatmentSchedulePlanner,
    store: SqliteReminderStore,
    notifier: Box<dyn Notifier>,
    clock: Box<dyn Clock>,
    local_clock: LocalClock,
}

impl ReminderService {
    /// Open the configured database and pick the configured notifier.
    pub fn from_config(config: &ReminderConfig) -> Result<Self, ReminderError> {
        let conn = db::open_database(&config.db_path)?;
        let notifier = notify::notifier_from_config(config)?;
        tracing::info!(
            db_path = %config.db_path.display(),
            local_clock = ?config.local_clock,
            "Reminder service ready"
        );
        Ok(Self::new(conn, notifier, Box::new(SystemClock), config.local_clock))
    }

    pub fn new(
        conn: Connection,
        notifier: Box<dyn Notifier>,
        clock: Box<dyn Clock>,
        local_clock: LocalClock,
    ) -> Self {
        Self {
            conn: Mutex::new(conn),
            planner: TreatmentSchedulePlanner::new(),
            store: SqliteReminderStore::new(),
            notifier,
            clock,
            local_clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, ReminderError> {
        self.conn.lock().map_err(|_| ReminderError::LockPoisoned)
    }

    fn deps(&self) -> ReminderDeps<'_> {
        ReminderDeps {
            planner: &self.planner,
            store: &self.store,
            notifier: self.notifier.as_ref(),
            clock: self.clock.as_ref(),
            local_clock: self.local_clock,
        }
    }

    /// Link a treatment to a consultation and schedule its reminders.
    pub fn assign_treatment(
        &self,
        consultation_id: Uuid,
        treatment_id: Uuid,
    ) -> Result<TreatmentAssignment, ReminderError> {
        let conn = self.lock()?;
        consultations::add_treatment_to_consultation(&conn, &self.deps(), consultation_id, treatment_id)
    }

    /// Re-run reminder scheduling for an existing assignment.
    pub fn reschedule(
        &self,
        consultation_id: Uuid,
        treatment_id: Uuid,
    ) -> Result<ReconcileReport, ReminderError> {
        let conn = self.lock()?;
        consultations::on_treatment_assigned(&conn, &self.deps(), consultation_id, treatment_id)
    }

    /// Run a read or write against the service's connection.
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, DatabaseError>,
    ) -> Result<T, ReminderError> {
        let conn = self.lock()?;
        Ok(f(&conn)?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::models::{Consultation, Patient, Treatment};
    use crate::notify::LogNotifier;
    use crate::reminders::FixedClock;

    fn service() -> ReminderService {
        ReminderService::new(
            db::open_memory_database().unwrap(),
            Box::new(LogNotifier),
            Box::new(FixedClock(Utc.with_ymd_and_hms(2024, 1, 10, 10, 0, 0).unwrap())),
            LocalClock::default(),
        )
    }

    fn seed(service: &ReminderService) -> (Uuid, Uuid, Uuid) {
        let patient_id = Uuid::new_v4();
        let consultation_id = Uuid::new_v4();
        let treatment_id = Uuid::new_v4();
        service.with_connection(|conn| {
            db::insert_patient(conn, &Patient {
                id: patient_id,
                name: "Carmen Rojas".into(),
                created_at: Utc::now(),
            })?;
            db::insert_consultation(conn, &Consultation {
                id: consultation_id,
                patient_id: Some(patient_id),
                organization_id: None,
                // Earlier in the morning than local now (06:00)
                consultation_date: Utc.with_ymd_and_hms(2024, 1, 10, 2, 0, 0).unwrap(),
                reason: None,
            })?;
            db::insert_treatment(conn, &Treatment {
                id: treatment_id,
                organization_id: None,
                name: "Omeprazole".into(),
                dosage: "20mg".into(),
                frequency_hours: Some(12),
                duration_days: Some(2),
                instructions: Some("Before breakfast".into()),
            })
        }).unwrap();
        (patient_id, consultation_id, treatment_id)
    }

    #[test]
    fn assign_then_reschedule_keeps_single_set() {
        let service = service();
        let (patient_id, consultation_id, treatment_id) = seed(&service);

        let assignment = service.assign_treatment(consultation_id, treatment_id).unwrap();
        assert_eq!(assignment.reminders.created.len(), 4);
        // 02:00 dose is before local now; the rest are ahead
        assert!(assignment.reminders.created[0].notified);
        assert!(assignment.reminders.created[1..].iter().all(|r| !r.notified));

        let again = service.reschedule(consultation_id, treatment_id).unwrap();
        assert!(again.created.is_empty());
        assert!(again.notification_sent);

        let stored = service
            .with_connection(|conn| db::list_reminders_for_patient(conn, &patient_id))
            .unwrap();
        assert_eq!(stored.len(), 4);
    }

    #[test]
    fn extreme_schedule_leaves_service_usable() {
        let service = service();
        let (patient_id, consultation_id, treatment_id) = seed(&service);
        let extreme_id = Uuid::new_v4();
        service.with_connection(|conn| {
            db::insert_treatment(conn, &Treatment {
                id: extreme_id,
                organization_id: None,
                name: "Vitamin D".into(),
                dosage: "50000 IU".into(),
                frequency_hours: Some(u32::MAX),
                duration_days: Some(u32::MAX),
                instructions: None,
            })
        }).unwrap();

        let extreme = service.assign_treatment(consultation_id, extreme_id).unwrap();
        assert_eq!(extreme.reminders.created.len(), 1);

        // Connection lock is still healthy
        let normal = service.assign_treatment(consultation_id, treatment_id).unwrap();
        assert_eq!(normal.reminders.created.len(), 4);
        let stored = service
            .with_connection(|conn| db::list_reminders_for_patient(conn, &patient_id))
            .unwrap();
        assert_eq!(stored.len(), 5);
    }

    #[test]
    fn from_config_opens_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReminderConfig {
            db_path: dir.path().join("praxis.db"),
            ..ReminderConfig::default()
        };
        let service = ReminderService::from_config(&config).unwrap();
        let version: i64 = service
            .with_connection(|conn| {
                Ok(conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(version, 2);
    }
}
