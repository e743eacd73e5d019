use thiserror::Error;

use crate::db::DatabaseError;
use crate::notify::NotifyError;

/// Failures of a treatment-assignment run. Records written before the
/// failure stay written.
#[derive(Error, Debug)]
pub enum ReminderError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    #[error("Internal lock poisoned")]
    LockPoisoned,
}
