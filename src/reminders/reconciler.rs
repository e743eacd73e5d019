//! Reminder reconciliation for one treatment-assignment event.
//!
//! Each planned instant is written at most once per patient/treatment.
//! Instants already behind the local clock are stored as notified.
//! One notification goes out per event, whether or not any reminder
//! was new.

use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

use super::clock::{Clock, LocalClock};
use super::error::ReminderError;
use super::traits::{ReminderPlanner, ReminderStore};
use crate::db::DatabaseError;
use crate::models::{ReminderRecord, ReminderSpec};
use crate::notify::{Notifier, PushMessage};

/// Collaborators of a reconciliation run.
pub struct ReminderDeps<'a> {
    pub planner: &'a dyn ReminderPlanner,
    pub store: &'a dyn ReminderStore,
    pub notifier: &'a dyn Notifier,
    pub clock: &'a dyn Clock,
    pub local_clock: LocalClock,
}

/// Outcome of one treatment-assignment event.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconcileReport {
    /// Records written by this run, in plan order.
    pub created: Vec<ReminderRecord>,
    /// Planned instants that already had a record.
    pub already_present: usize,
    pub notification_sent: bool,
}

impl ReconcileReport {
    /// Report for an event that had no patient to remind.
    pub fn skipped() -> Self {
        Self::default()
    }
}

/// Write a record for every instant in `spec` that has none yet.
///
/// Stops at the first store error; records written before it remain.
pub fn create_missing_reminders(
    conn: &Connection,
    store: &dyn ReminderStore,
    local_clock: &LocalClock,
    now_utc: DateTime<Utc>,
    patient_id: Uuid,
    treatment_id: Uuid,
    spec: &ReminderSpec,
) -> Result<(Vec<ReminderRecord>, usize), DatabaseError> {
    let now_local = local_clock.now_local(now_utc);
    let mut created = Vec::new();
    let mut already_present = 0;

    for &planned in &spec.dates {
        // Stored keys carry millisecond precision
        let notify_at = planned.trunc_subsecs(3);
        let notified = local_clock.is_past(notify_at, now_utc);
        let record = ReminderRecord::new(patient_id, treatment_id, notify_at, notified, now_utc);

        if store.insert_if_absent(conn, &record)? {
            tracing::debug!(
                notify_at = %notify_at,
                now_local = %now_local,
                is_past = notified,
                "Reminder created"
            );
            created.push(record);
        } else {
            already_present += 1;
        }
    }

    Ok((created, already_present))
}

/// Create missing reminders for `patient_id`, then send the single
/// treatment-assigned notification.
///
/// A notifier failure is returned after all records are written.
pub fn reconcile_reminders(
    conn: &Connection,
    deps: &ReminderDeps<'_>,
    patient_id: Uuid,
    consultation_id: Uuid,
    treatment_id: Uuid,
    spec: &ReminderSpec,
) -> Result<ReconcileReport, ReminderError> {
    let now_utc = deps.clock.now_utc();
    let (created, already_present) = create_missing_reminders(
        conn,
        deps.store,
        &deps.local_clock,
        now_utc,
        patient_id,
        treatment_id,
        spec,
    )?;

    tracing::info!(
        %patient_id,
        %treatment_id,
        planned = spec.dates.len(),
        created = created.len(),
        already_present,
        "Treatment reminders reconciled"
    );

    deps.notifier
        .send_to_patient(&PushMessage::treatment_assigned(patient_id, consultation_id, treatment_id))?;

    Ok(ReconcileReport {
        created,
        already_present,
        notification_sent: true,
    })
}
