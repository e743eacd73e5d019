use chrono::{DateTime, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use super::traits::ReminderStore;
use crate::db::{self, DatabaseError};
use crate::models::ReminderRecord;

/// SQLite-backed reminder store over the `reminder_notifications` table.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteReminderStore;

impl SqliteReminderStore {
    pub fn new() -> Self {
        Self
    }
}

impl ReminderStore for SqliteReminderStore {
    fn find(
        &self,
        conn: &Connection,
        patient_id: &Uuid,
        treatment_id: &Uuid,
        notify_at: &DateTime<Utc>,
    ) -> Result<Option<ReminderRecord>, DatabaseError> {
        db::find_reminder(conn, patient_id, treatment_id, notify_at)
    }

    fn insert_if_absent(&self, conn: &Connection, record: &ReminderRecord) -> Result<bool, DatabaseError> {
        db::insert_reminder_if_absent(conn, record)
    }
}
