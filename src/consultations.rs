//! Treatment assignment on consultations.
//!
//! Linking a treatment to a consultation is the event that schedules
//! reminders for the consultation's patient.

use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

use crate::db;
use crate::models::ConsultationTreatment;
use crate::reminders::{reconcile_reminders, ReconcileReport, ReminderDeps, ReminderError};

/// Result of assigning a treatment: the stored link and what the
/// reminder run did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreatmentAssignment {
    pub link: ConsultationTreatment,
    pub reminders: ReconcileReport,
}

/// Link `treatment_id` to `consultation_id`, then schedule reminders.
///
/// The link is stored first; a reminder or notification failure is
/// returned with the link already persisted.
pub fn add_treatment_to_consultation(
    conn: &Connection,
    deps: &ReminderDeps<'_>,
    consultation_id: Uuid,
    treatment_id: Uuid,
) -> Result<TreatmentAssignment, ReminderError> {
    let link = ConsultationTreatment {
        consultation_id,
        treatment_id,
        assigned_at: deps.clock.now_utc(),
    };
    db::insert_consultation_treatment(conn, &link)?;

    let reminders = on_treatment_assigned(conn, deps, consultation_id, treatment_id)?;
    Ok(TreatmentAssignment { link, reminders })
}

/// Schedule reminders and notify for a treatment-assignment event.
///
/// A missing consultation, or one without a patient, is a no-op: no
/// records, no notification, no error. A missing plan counts as an
/// empty one, so the patient is still notified.
pub fn on_treatment_assigned(
    conn: &Connection,
    deps: &ReminderDeps<'_>,
    consultation_id: Uuid,
    treatment_id: Uuid,
) -> Result<ReconcileReport, ReminderError> {
    let patient_id = db::get_consultation(conn, &consultation_id)?.and_then(|c| c.patient_id);
    let Some(patient_id) = patient_id else {
        tracing::warn!(
            %consultation_id,
            %treatment_id,
            "Skipping reminders: consultation has no patient"
        );
        return Ok(ReconcileReport::skipped());
    };

    let spec = deps
        .planner
        .plan(conn, &treatment_id, &consultation_id)?
        .unwrap_or_default();

    reconcile_reminders(conn, deps, patient_id, consultation_id, treatment_id, &spec)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::*;
    use crate::db::{insert_consultation, insert_patient, insert_treatment, open_memory_database, DatabaseError};
    use crate::models::{Consultation, Patient, Treatment};
    use crate::notify::testing::RecordingNotifier;
    use crate::reminders::{FixedClock, LocalClock, SqliteReminderStore, TreatmentSchedulePlanner};

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap()
    }

    fn seed_treatment(conn: &Connection, frequency_hours: Option<u32>) -> Uuid {
        let id = Uuid::new_v4();
        insert_treatment(conn, &Treatment {
            id,
            organization_id: None,
            name: "Azithromycin".into(),
            dosage: "500mg".into(),
            frequency_hours,
            duration_days: Some(3),
            instructions: None,
        }).unwrap();
        id
    }

    fn seed_consultation(conn: &Connection, with_patient: bool) -> (Uuid, Option<Uuid>) {
        let patient_id = with_patient.then(|| {
            let id = Uuid::new_v4();
            insert_patient(conn, &Patient {
                id,
                name: "Jorge Flores".into(),
                created_at: at(1, 9),
            }).unwrap();
            id
        });
        let id = Uuid::new_v4();
        insert_consultation(conn, &Consultation {
            id,
            patient_id,
            organization_id: None,
            consultation_date: at(10, 8),
            reason: Some("Bronchitis".into()),
        }).unwrap();
        (id, patient_id)
    }

    /// Runs `f` with default collaborators and a clock fixed at 2024-01-10T10:00Z.
    fn with_deps<T>(notifier: &RecordingNotifier, f: impl FnOnce(&ReminderDeps<'_>) -> T) -> T {
        let planner = TreatmentSchedulePlanner::new();
        let store = SqliteReminderStore::new();
        let clock = FixedClock(at(10, 10));
        let deps = ReminderDeps {
            planner: &planner,
            store: &store,
            notifier,
            clock: &clock,
            local_clock: LocalClock::default(),
        };
        f(&deps)
    }

    #[test]
    fn assignment_schedules_daily_reminders() {
        let conn = open_memory_database().unwrap();
        let treatment_id = seed_treatment(&conn, Some(24));
        let (consultation_id, patient_id) = seed_consultation(&conn, true);
        let notifier = RecordingNotifier::default();

        let result = with_deps(&notifier, |deps| {
            add_treatment_to_consultation(&conn, deps, consultation_id, treatment_id)
        }).unwrap();

        assert_eq!(result.link.treatment_id, treatment_id);
        let created = &result.reminders.created;
        assert_eq!(created.len(), 3);
        assert_eq!(created[0].notify_at, at(10, 8));
        assert_eq!(created[2].notify_at, at(10, 8) + Duration::days(2));
        // 08:00 is after local now (06:00), so nothing is past yet
        assert!(created.iter().all(|r| !r.notified));
        assert!(created.iter().all(|r| Some(r.patient_id) == patient_id));
        assert_eq!(notifier.sent().len(), 1);
        assert_eq!(db::get_consultation_treatments(&conn, &consultation_id).unwrap().len(), 1);
    }

    #[test]
    fn assignment_timestamps_come_from_clock() {
        let conn = open_memory_database().unwrap();
        let treatment_id = seed_treatment(&conn, Some(24));
        let (consultation_id, _) = seed_consultation(&conn, true);
        let notifier = RecordingNotifier::default();

        let result = with_deps(&notifier, |deps| {
            add_treatment_to_consultation(&conn, deps, consultation_id, treatment_id)
        }).unwrap();

        assert_eq!(result.link.assigned_at, at(10, 10));
        let links = db::get_consultation_treatments(&conn, &consultation_id).unwrap();
        assert_eq!(links[0].assigned_at, at(10, 10));
        assert!(result.reminders.created.iter().all(|r| r.created_at == at(10, 10)));
    }

    #[test]
    fn consultation_without_patient_is_silent() {
        let conn = open_memory_database().unwrap();
        let treatment_id = seed_treatment(&conn, Some(8));
        let (consultation_id, _) = seed_consultation(&conn, false);
        let notifier = RecordingNotifier::default();

        let result = with_deps(&notifier, |deps| {
            add_treatment_to_consultation(&conn, deps, consultation_id, treatment_id)
        }).unwrap();

        assert_eq!(result.reminders, ReconcileReport::skipped());
        assert!(notifier.sent().is_empty());
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM reminder_notifications", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn missing_consultation_is_silent() {
        let conn = open_memory_database().unwrap();
        let treatment_id = seed_treatment(&conn, Some(8));
        let notifier = RecordingNotifier::default();

        let report = with_deps(&notifier, |deps| {
            on_treatment_assigned(&conn, deps, Uuid::new_v4(), treatment_id)
        }).unwrap();

        assert!(!report.notification_sent);
        assert!(notifier.sent().is_empty());
    }

    #[test]
    fn unscheduled_treatment_notifies_without_reminders() {
        let conn = open_memory_database().unwrap();
        let treatment_id = seed_treatment(&conn, None);
        let (consultation_id, _) = seed_consultation(&conn, true);
        let notifier = RecordingNotifier::default();

        let result = with_deps(&notifier, |deps| {
            add_treatment_to_consultation(&conn, deps, consultation_id, treatment_id)
        }).unwrap();

        assert!(result.reminders.created.is_empty());
        assert!(result.reminders.notification_sent);
        assert_eq!(notifier.sent().len(), 1);
    }

    #[test]
    fn duplicate_assignment_rejected_before_reminders() {
        let conn = open_memory_database().unwrap();
        let treatment_id = seed_treatment(&conn, Some(12));
        let (consultation_id, _) = seed_consultation(&conn, true);
        let notifier = RecordingNotifier::default();

        with_deps(&notifier, |deps| {
            add_treatment_to_consultation(&conn, deps, consultation_id, treatment_id)
        }).unwrap();
        let err = with_deps(&notifier, |deps| {
            add_treatment_to_consultation(&conn, deps, consultation_id, treatment_id)
        }).unwrap_err();

        assert!(matches!(err, ReminderError::Database(DatabaseError::ConstraintViolation(_))));
        assert_eq!(notifier.sent().len(), 1);
    }

    #[test]
    fn repeated_event_is_idempotent_for_records() {
        let conn = open_memory_database().unwrap();
        let treatment_id = seed_treatment(&conn, Some(8));
        let (consultation_id, patient_id) = seed_consultation(&conn, true);
        let patient_id = patient_id.unwrap();
        let notifier = RecordingNotifier::default();

        let first = with_deps(&notifier, |deps| {
            on_treatment_assigned(&conn, deps, consultation_id, treatment_id)
        }).unwrap();
        let second = with_deps(&notifier, |deps| {
            on_treatment_assigned(&conn, deps, consultation_id, treatment_id)
        }).unwrap();

        assert_eq!(first.created.len(), 9);
        assert!(second.created.is_empty());
        assert_eq!(second.already_present, 9);
        assert_eq!(db::count_reminders(&conn, &patient_id, &treatment_id).unwrap(), 9);
        assert_eq!(notifier.sent().len(), 2);
    }
}
