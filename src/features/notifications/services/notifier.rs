use async_trait::async_trait;
use thiserror::Error;

use crate::features::intake::models::IncidentReport;

/// What a notifier composed and (outside developer mode) delivered.
///
/// Also the developer-mode echo: the exact content that would have gone out.
#[derive(Debug, Clone)]
pub struct RenderedNotification {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    /// Local misconfiguration; no network call was attempted.
    #[error("notifier not configured: {0}")]
    Config(String),
    /// The delivery attempt itself failed.
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Notification capability: one contract surface, selected by configuration.
/// Only immediate-threat reports reach it; low-urgency reports stay private.
#[async_trait]
pub trait IncidentNotifier: Send + Sync {
    async fn notify(&self, report: &IncidentReport) -> Result<RenderedNotification, NotifyError>;
}
