use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::config::TicketingConfig;
use crate::features::intake::models::IncidentReport;
use crate::features::notifications::services::links;
use crate::features::notifications::services::notifier::{
    IncidentNotifier, NotifyError, RenderedNotification,
};
use crate::shared::messages;

/// Generic status returned for any remote failure. Specific remote errors go
/// to the log only; internal routing details are never surfaced to the
/// reporter.
const GENERIC_REMOTE_FAILURE: &str = "ticket system request failed";

/// Structured request the ticket system expects.
#[derive(Debug, Serialize)]
struct TicketRequest {
    requester: TicketRequester,
    subject: String,
    body: String,
}

#[derive(Debug, Serialize)]
struct TicketRequester {
    name: String,
    email: String,
}

/// Error body the ticket system returns on 4xx responses.
#[derive(Debug, Deserialize)]
struct TicketRemoteError {
    error: String,
    description: Option<String>,
}

/// Ticket-system notifier for immediate-threat reports.
pub struct TicketingClient {
    config: TicketingConfig,
    base_url: String,
    /// Developer mode composes the ticket but never POSTs it.
    developer_mode: bool,
    client: reqwest::Client,
}

impl TicketingClient {
    pub fn new(
        config: TicketingConfig,
        base_url: String,
        developer_mode: bool,
    ) -> Result<Self, String> {
        let mut builder = reqwest::Client::builder();
        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| format!("Invalid ticketing proxy: {}", e))?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            config,
            base_url,
            developer_mode,
            client,
        })
    }

    fn body(&self, report: &IncidentReport) -> String {
        let origin = links::link_origin(report.thread_id.as_deref());
        let mut body = format!(
            "Reporting user: {}\nReported user: {}\n\n{} {}",
            report.reporting_user,
            report.reported_user.display(),
            messages::link_prefix_phrase(origin),
            links::permalink(&self.base_url, report),
        );

        if let Some(details) = &report.details {
            body.push_str("\n\nDetails from the reporter:\n");
            body.push_str(details);
        }

        body
    }
}

#[async_trait]
impl IncidentNotifier for TicketingClient {
    async fn notify(&self, report: &IncidentReport) -> Result<RenderedNotification, NotifyError> {
        if self.config.endpoint.is_empty() {
            tracing::error!("ticketing client has no configured endpoint");
            return Err(NotifyError::Config("no endpoint configured".to_string()));
        }

        let request = TicketRequest {
            requester: TicketRequester {
                name: self.config.requester_name.clone(),
                email: self.config.requester_email.clone(),
            },
            subject: self.config.subject.clone(),
            body: self.body(report),
        };

        if self.developer_mode {
            return Ok(RenderedNotification {
                to: vec![self.config.endpoint.clone()],
                subject: request.subject,
                body: request.body,
            });
        }

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("ticket system request failed: {}", e);
                NotifyError::Delivery(GENERIC_REMOTE_FAILURE.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(RenderedNotification {
                to: vec![self.config.endpoint.clone()],
                subject: request.subject,
                body: request.body,
            });
        }

        if status.is_client_error() {
            // The specific remote error is for the log only.
            let raw = response.text().await.unwrap_or_default();
            match parse_remote_error(&raw) {
                Some(remote) => tracing::error!(
                    "ticket system rejected the request ({}): {} - {}",
                    status,
                    remote.error,
                    remote.description.unwrap_or_default()
                ),
                None => tracing::error!(
                    "ticket system rejected the request ({}): unparseable body",
                    status
                ),
            }
        } else {
            tracing::error!("ticket system returned status {}", status);
        }

        Err(NotifyError::Delivery(GENERIC_REMOTE_FAILURE.to_string()))
    }
}

fn parse_remote_error(raw: &str) -> Option<TicketRemoteError> {
    serde_json::from_str(raw).ok()
}
