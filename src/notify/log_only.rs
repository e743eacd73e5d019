use super::{Notifier, NotifyError, PushMessage};

/// Writes notifications to the tracing log instead of delivering them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send_to_patient(&self, message: &PushMessage) -> Result<(), NotifyError> {
        tracing::info!(
            patient_id = %message.patient_id,
            title = %message.title,
            data = ?message.data,
            "Notification (log only)"
        );
        Ok(())
    }
}
