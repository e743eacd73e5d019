use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::parse_uuid;
use crate::db::{format_instant, parse_instant, DatabaseError};
use crate::models::ReminderRecord;

const REMINDER_COLUMNS: &str = "id, patient_id, treatment_id, notify_at, notified, created_at";

/// Insert a reminder unless one already exists for its
/// (patient, treatment, notify_at) triple.
///
/// Returns `true` when a row was written. The check and the write are a
/// single statement against the UNIQUE constraint, so concurrent callers
/// cannot both insert the same triple.
pub fn insert_reminder_if_absent(conn: &Connection, record: &ReminderRecord) -> Result<bool, DatabaseError> {
    let changed = conn.execute(
        "INSERT INTO reminder_notifications (id, patient_id, treatment_id, notify_at, notified, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(patient_id, treatment_id, notify_at) DO NOTHING",
        params![
            record.id.to_string(),
            record.patient_id.to_string(),
            record.treatment_id.to_string(),
            format_instant(&record.notify_at),
            record.notified as i32,
            format_instant(&record.created_at),
        ],
    )?;
    Ok(changed == 1)
}

/// Point lookup by the dedup key.
pub fn find_reminder(
    conn: &Connection,
    patient_id: &Uuid,
    treatment_id: &Uuid,
    notify_at: &DateTime<Utc>,
) -> Result<Option<ReminderRecord>, DatabaseError> {
    let sql = format!(
        "SELECT {REMINDER_COLUMNS} FROM reminder_notifications
         WHERE patient_id = ?1 AND treatment_id = ?2 AND notify_at = ?3"
    );
    let row = conn
        .query_row(
            &sql,
            params![
                patient_id.to_string(),
                treatment_id.to_string(),
                format_instant(notify_at),
            ],
            reminder_row_from_rusqlite,
        )
        .optional()?;

    row.map(reminder_from_row).transpose()
}

/// All reminders for a patient, earliest first.
pub fn list_reminders_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<ReminderRecord>, DatabaseError> {
    let sql = format!(
        "SELECT {REMINDER_COLUMNS} FROM reminder_notifications
         WHERE patient_id = ?1 ORDER BY notify_at ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![patient_id.to_string()], reminder_row_from_rusqlite)?;

    let mut records = Vec::new();
    for row in rows {
        records.push(reminder_from_row(row?)?);
    }
    Ok(records)
}

pub fn count_reminders(
    conn: &Connection,
    patient_id: &Uuid,
    treatment_id: &Uuid,
) -> Result<u32, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM reminder_notifications WHERE patient_id = ?1 AND treatment_id = ?2",
        params![patient_id.to_string(), treatment_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count)
}

// Internal row type for ReminderRecord mapping
struct ReminderRow {
    id: String,
    patient_id: String,
    treatment_id: String,
    notify_at: String,
    notified: i32,
    created_at: String,
}

fn reminder_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<ReminderRow, rusqlite::Error> {
    Ok(ReminderRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        treatment_id: row.get(2)?,
        notify_at: row.get(3)?,
        notified: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn reminder_from_row(row: ReminderRow) -> Result<ReminderRecord, DatabaseError> {
    Ok(ReminderRecord {
        id: parse_uuid("reminder_notifications.id", &row.id)?,
        patient_id: parse_uuid("reminder_notifications.patient_id", &row.patient_id)?,
        treatment_id: parse_uuid("reminder_notifications.treatment_id", &row.treatment_id)?,
        notify_at: parse_instant("reminder_notifications.notify_at", &row.notify_at)?,
        notified: row.notified != 0,
        created_at: parse_instant("reminder_notifications.created_at", &row.created_at)?,
    })
}
