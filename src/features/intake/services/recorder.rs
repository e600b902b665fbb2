use async_trait::async_trait;

use crate::features::intake::models::IncidentReport;

/// Recording capability. Failure is fatal to the request: the pipeline never
/// notifies on top of a failed record.
#[async_trait]
pub trait ReportRecorder: Send + Sync {
    async fn record(&self, report: &IncidentReport) -> Result<(), String>;
}

/// Recorder that writes a structured log line.
///
/// Durable storage is future work; until then the private log is the only
/// record of low-urgency reports.
#[derive(Default)]
pub struct LogRecorder;

impl LogRecorder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ReportRecorder for LogRecorder {
    async fn record(&self, report: &IncidentReport) -> Result<(), String> {
        tracing::info!(
            reporting_user = %report.reporting_user,
            reported_user = %report.reported_user.display(),
            incident_type = %report.incident_type,
            page = %report.page.title,
            revision_id = ?report.page.revision_id,
            thread_id = ?report.thread_id,
            "incident report recorded"
        );
        Ok(())
    }
}
