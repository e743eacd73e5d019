//! Treatment reminder scheduling.
//!
//! When a treatment is assigned in a consultation:
//! ```text
//! Planner (instants) → Reconciler (dedup + past flag) → Store → Notifier (once)
//! ```
//!
//! Past determination uses the clinic-local clock (`LocalClock`), either a
//! fixed offset from UTC or an IANA zone.

pub mod clock;
pub mod error;
pub mod planner;
pub mod reconciler;
pub mod store;
pub mod traits;

pub use clock::{is_past, Clock, FixedClock, LocalClock, SystemClock};
pub use error::ReminderError;
pub use planner::{plan_schedule, TreatmentSchedulePlanner};
pub use reconciler::{create_missing_reminders, reconcile_reminders, ReconcileReport, ReminderDeps};
pub use store::SqliteReminderStore;
pub use traits::{ReminderPlanner, ReminderStore};
