//! Outbound notifications. The sink is an external collaborator: the core
//! decides when to notify and with what payload, the sink owns delivery.
//! Delivery failure is logged and never propagated to the caller; the
//! triggering state change has already committed by the time we get here.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::models::application::ApplicationDetail;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateKind {
    #[serde(rename = "applicationReceived")]
    ApplicationReceived,
    #[serde(rename = "applicationStatusUpdate")]
    ApplicationStatusUpdate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: String,
    pub template: TemplateKind,
    pub payload: JsonValue,
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),

    #[error("notification rejected with status {0}")]
    Rejected(u16),
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, notification: &Notification) -> Result<(), SinkError>;
}

/// Forwards notifications as JSON to a configured webhook endpoint with a
/// short request timeout.
pub struct WebhookSink {
    client: Client,
    target_url: String,
}

impl WebhookSink {
    pub fn new(target_url: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("http client");
        Self { client, target_url }
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn deliver(&self, notification: &Notification) -> Result<(), SinkError> {
        let response = self
            .client
            .post(&self.target_url)
            .json(notification)
            .send()
            .await
            .map_err(|err| SinkError::Transport(err.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(SinkError::Rejected(response.status().as_u16()))
        }
    }
}

#[derive(Clone)]
pub struct NotificationService {
    sink: Arc<dyn NotificationSink>,
}

impl NotificationService {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    /// "Application received" notice to the applicant, built from the
    /// committed record.
    pub async fn application_received(&self, application: &ApplicationDetail) {
        let notification = Notification {
            recipient: application.email.clone(),
            template: TemplateKind::ApplicationReceived,
            payload: json!({
                "first_name": application.first_name,
                "job_title": application.job_title,
                "reference_id": application.reference_id(),
            }),
        };
        self.dispatch(notification).await;
    }

    /// "Status changed" notice carrying the new status and admin notes.
    pub async fn status_updated(&self, application: &ApplicationDetail) {
        let notification = Notification {
            recipient: application.email.clone(),
            template: TemplateKind::ApplicationStatusUpdate,
            payload: json!({
                "first_name": application.first_name,
                "job_title": application.job_title,
                "status": application.status,
                "admin_notes": application.admin_notes.clone().unwrap_or_default(),
            }),
        };
        self.dispatch(notification).await;
    }

    async fn dispatch(&self, notification: Notification) {
        if let Err(err) = self.sink.deliver(&notification).await {
            tracing::warn!(
                recipient = %notification.recipient,
                template = ?notification.template,
                error = %err,
                "notification delivery failed"
            );
        }
    }
}
