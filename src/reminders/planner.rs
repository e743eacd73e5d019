//! Reminder planning from a treatment's dosing schedule.
//!
//! The first dose is due at the consultation time; later doses follow
//! every `frequency_hours` until `duration_days` have elapsed.

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use super::traits::ReminderPlanner;
use crate::db::{self, DatabaseError};
use crate::models::{ReminderSpec, Treatment};

/// Course length assumed when a scheduled treatment has no duration.
pub const DEFAULT_DURATION_DAYS: u32 = 1;

/// Upper bound on instants generated for a single assignment.
pub const MAX_REMINDERS_PER_TREATMENT: usize = 500;

/// Plans reminders from the treatment's `frequency_hours` /
/// `duration_days`, anchored at the consultation date.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreatmentSchedulePlanner;

impl TreatmentSchedulePlanner {
    pub fn new() -> Self {
        Self
    }
}

impl ReminderPlanner for TreatmentSchedulePlanner {
    fn plan(
        &self,
        conn: &Connection,
        treatment_id: &Uuid,
        consultation_id: &Uuid,
    ) -> Result<Option<ReminderSpec>, DatabaseError> {
        let Some(treatment) = db::get_treatment(conn, treatment_id)? else {
            tracing::debug!(%treatment_id, "No reminders: treatment not found");
            return Ok(None);
        };
        let Some(consultation) = db::get_consultation(conn, consultation_id)? else {
            tracing::debug!(%consultation_id, "No reminders: consultation not found");
            return Ok(None);
        };
        Ok(plan_schedule(&treatment, consultation.consultation_date))
    }
}

/// Build the reminder spec for `treatment` starting at `anchor`.
///
/// Instants are strictly increasing. Returns `None` for treatments
/// without a dosing interval. Schedules that run past the representable
/// date range stop at the last representable dose.
pub fn plan_schedule(treatment: &Treatment, anchor: DateTime<Utc>) -> Option<ReminderSpec> {
    let frequency_hours = treatment.frequency_hours.filter(|h| *h > 0)?;
    let duration_days = treatment
        .duration_days
        .filter(|d| *d > 0)
        .unwrap_or(DEFAULT_DURATION_DAYS);

    let step = Duration::hours(i64::from(frequency_hours));
    // No representable end means the course outlasts the calendar; the cap bounds it
    let end = anchor.checked_add_signed(Duration::days(i64::from(duration_days)));

    let mut dates = Vec::new();
    let mut next = Some(anchor);
    while let Some(at) = next.filter(|at| end.map_or(true, |end| *at < end)) {
        if dates.len() == MAX_REMINDERS_PER_TREATMENT {
            tracing::warn!(
                treatment_id = %treatment.id,
                cap = MAX_REMINDERS_PER_TREATMENT,
                "Reminder schedule truncated"
            );
            break;
        }
        dates.push(at);
        next = at.checked_add_signed(step);
    }

    Some(ReminderSpec {
        description: describe(treatment),
        dates,
    })
}

/// Human-readable reminder text, e.g. `Amoxicillin 500mg every 8h. Take with food`.
pub fn describe(treatment: &Treatment) -> String {
    let mut text = treatment.name.trim().to_string();
    let dosage = treatment.dosage.trim();
    if !dosage.is_empty() {
        text.push(' ');
        text.push_str(dosage);
    }
    if let Some(hours) = treatment.frequency_hours {
        text.push_str(&format!(" every {hours}h"));
    }
    if let Some(instructions) = treatment.instructions.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        text.push_str(". ");
        text.push_str(instructions);
    }
    text
}
