//! Push gateway client.
//!
//! Posts one JSON document per message:
//! `{"patientId", "title", "body", "data": {..}}`, with an optional
//! bearer token. Any non-2xx response is a delivery failure.

use std::time::Duration;

use serde::Serialize;

use super::{Notifier, NotifyError, PushMessage};
use crate::config::PushConfig;

pub struct HttpPushNotifier {
    url: String,
    token: Option<String>,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PushRequest<'a> {
    patient_id: String,
    title: &'a str,
    body: &'a str,
    data: &'a std::collections::BTreeMap<String, String>,
}

impl<'a> PushRequest<'a> {
    fn from_message(message: &'a PushMessage) -> Self {
        Self {
            patient_id: message.patient_id.to_string(),
            title: &message.title,
            body: &message.body,
            data: &message.data,
        }
    }
}

impl HttpPushNotifier {
    pub fn new(config: &PushConfig) -> Result<Self, NotifyError> {
        if config.url.trim().is_empty() {
            return Err(NotifyError::NotConfigured("push gateway URL is empty".into()));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            url: config.url.clone(),
            token: config.token.clone(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Notifier for HttpPushNotifier {
    fn send_to_patient(&self, message: &PushMessage) -> Result<(), NotifyError> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&PushRequest::from_message(message));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                patient_id = %message.patient_id,
                status = status.as_u16(),
                "Push gateway rejected notification"
            );
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
            });
        }

        tracing::debug!(patient_id = %message.patient_id, "Push notification delivered");
        Ok(())
    }
}
