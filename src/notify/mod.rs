//! Outbound patient notifications.
//!
//! The reminder core only needs "send this message to this patient";
//! delivery is behind the `Notifier` trait. `HttpPushNotifier` posts to a
//! push gateway, `LogNotifier` is used when no gateway is configured.

pub mod http;
pub mod log_only;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::ReminderConfig;

pub use http::HttpPushNotifier;
pub use log_only::LogNotifier;

pub const TREATMENT_ASSIGNED_TITLE: &str = "New treatment assigned";
pub const TREATMENT_ASSIGNED_BODY: &str =
    "A new treatment has been assigned to your medical consultation";

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Push gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Push gateway rejected notification with status {status}")]
    Rejected { status: u16 },

    #[error("Notifier not configured: {0}")]
    NotConfigured(String),
}

/// A message addressed to one patient. `data` carries string metadata
/// for the client app (deep links, ids).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushMessage {
    pub patient_id: Uuid,
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
}

impl PushMessage {
    /// The one message sent per treatment-assignment event.
    pub fn treatment_assigned(patient_id: Uuid, consultation_id: Uuid, treatment_id: Uuid) -> Self {
        let mut data = BTreeMap::new();
        data.insert("consultationId".to_string(), consultation_id.to_string());
        data.insert("treatmentId".to_string(), treatment_id.to_string());
        Self {
            patient_id,
            title: TREATMENT_ASSIGNED_TITLE.to_string(),
            body: TREATMENT_ASSIGNED_BODY.to_string(),
            data,
        }
    }
}

/// Delivers messages to patients.
pub trait Notifier: Send + Sync {
    fn send_to_patient(&self, message: &PushMessage) -> Result<(), NotifyError>;
}

/// Pick the notifier for a configuration: HTTP when a gateway URL is set,
/// log-only otherwise.
pub fn notifier_from_config(config: &ReminderConfig) -> Result<Box<dyn Notifier>, NotifyError> {
    match &config.push {
        Some(push) => Ok(Box::new(HttpPushNotifier::new(push)?)),
        None => {
            tracing::warn!("No push gateway configured; notifications will only be logged");
            Ok(Box::new(LogNotifier))
        }
    }
}
