use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::users::models::{PageTarget, ReportedIdentity};

/// Incident type chosen on the dialog's entry step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum IncidentType {
    #[serde(rename = "unacceptable-user-behavior")]
    UnacceptableUserBehavior,
    #[serde(rename = "immediate-threat-physical-harm")]
    ImmediateThreatPhysicalHarm,
}

impl std::fmt::Display for IncidentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentType::UnacceptableUserBehavior => write!(f, "unacceptable-user-behavior"),
            IncidentType::ImmediateThreatPhysicalHarm => {
                write!(f, "immediate-threat-physical-harm")
            }
        }
    }
}

/// Immediate-threat subtype, required iff the incident type is an immediate
/// threat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum PhysicalHarmType {
    PhysicalHarm,
    SelfHarm,
    PublicHarm,
}

impl std::fmt::Display for PhysicalHarmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhysicalHarmType::PhysicalHarm => write!(f, "physical-harm"),
            PhysicalHarmType::SelfHarm => write!(f, "self-harm"),
            PhysicalHarmType::PublicHarm => write!(f, "public-harm"),
        }
    }
}

/// A validated, normalized incident report.
///
/// Constructed once per request after the pipeline's validation stage and
/// passed through record and notify. Never persisted; the service is a
/// stateless pass-through to the notifier.
#[derive(Debug, Clone)]
pub struct IncidentReport {
    pub reporting_user: String,
    pub reported_user: ReportedIdentity,
    pub page: PageTarget,
    pub incident_type: IncidentType,
    pub physical_harm_type: Option<PhysicalHarmType>,
    pub behavior_type: Option<String>,
    pub details: Option<String>,
    pub something_else_details: Option<String>,
    pub thread_id: Option<String>,
}

impl IncidentReport {
    /// Behavior entries as the notifier renders them. The current wire shape
    /// carries a single behavior; the renderer accepts a list.
    pub fn behaviors(&self) -> Vec<String> {
        self.behavior_type.iter().cloned().collect()
    }
}
