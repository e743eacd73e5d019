pub mod config;
pub mod consultations; // Treatment assignment event
pub mod db;
pub mod models;
pub mod notify;
pub mod reminders; // Reminder planning + reconciliation
pub mod service;

use tracing_subscriber::EnvFilter;

pub use config::ReminderConfig;
pub use service::ReminderService;

/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG`, falling back to `config::default_log_filter()`.
/// Returns `false` when a subscriber was already installed.
pub fn init_tracing() -> bool {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} reminder core v{}", config::APP_NAME, config::APP_VERSION);
    }
    installed
}
