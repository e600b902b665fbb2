use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::intake::models::{IncidentType, PhysicalHarmType};

/// Wire request for `POST /reportincident/v0/report`.
///
/// `revision_id` of zero means "no specific revision"; the page is then
/// targeted by title instead, which supports reporting on pages with no
/// revisions yet.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    #[serde(default)]
    #[validate(length(max = 255))]
    pub page: Option<String>,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub reported_user: Option<String>,

    pub revision_id: u64,

    pub incident_type: IncidentType,

    #[serde(default)]
    pub physical_harm_type: Option<PhysicalHarmType>,

    #[serde(default)]
    pub behavior_type: Option<String>,

    #[serde(default)]
    pub details: Option<String>,

    #[serde(default)]
    pub something_else_details: Option<String>,

    #[serde(default)]
    pub thread_id: Option<String>,

    /// CSRF token; validation is delegated to the session token capability.
    pub token: String,
}

/// Developer-mode echo of the notification that would have been delivered.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SentEmailDto {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Developer-mode success body. Production success is an empty 204.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponseDto {
    pub sent_email: SentEmailDto,
}
