use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::features::intake::models::{IncidentType, PhysicalHarmType};
use crate::shared::constants::{
    BEHAVIOR_SOMETHING_ELSE, CHAR_COUNT_VISIBLE_FRACTION, MAX_DETAILS_CODEPOINTS,
    MAX_SOMETHING_ELSE_CODEPOINTS,
};
use crate::shared::validation::codepoint_len;

/// Fields the dialog tracks interaction for. Required-field errors only show
/// after the field was visited or a submit was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    IncidentType,
    PhysicalHarmType,
    BehaviorType,
    ReportedUser,
    Details,
    SomethingElseDetails,
}

/// The page the dialog was opened on; supplied by the host page context.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub page: String,
    /// Zero means the page has no revisions yet.
    pub revision_id: u64,
}

/// Transient form state for one dialog lifetime.
///
/// Validity is derived, never stored. Exactly one of
/// {physical_harm_type, behavior_type} is populated at any time, matching
/// the incident type; the setters maintain that invariant.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub incident_type: Option<IncidentType>,
    pub physical_harm_type: Option<PhysicalHarmType>,
    pub behavior_type: Option<String>,
    pub reported_user: String,
    /// Set when an entry point supplied the reported user; the field is then
    /// not editable.
    pub reported_user_locked: bool,
    pub details: String,
    pub something_else_details: String,
    /// Opaque key-value bag from the invoking surface, cleared on reset.
    pub entry_context: HashMap<String, String>,
    touched: HashSet<FormField>,
    attempted_submit: bool,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switching the incident type clears the other type's subtype so stale
    /// data never leaks into the payload.
    pub fn set_incident_type(&mut self, incident_type: IncidentType) {
        if self.incident_type != Some(incident_type) {
            match incident_type {
                IncidentType::ImmediateThreatPhysicalHarm => self.behavior_type = None,
                IncidentType::UnacceptableUserBehavior => self.physical_harm_type = None,
            }
        }
        self.incident_type = Some(incident_type);
        self.touch(FormField::IncidentType);
    }

    pub fn set_physical_harm_type(&mut self, harm_type: PhysicalHarmType) {
        self.physical_harm_type = Some(harm_type);
        self.behavior_type = None;
        self.touch(FormField::PhysicalHarmType);
    }

    pub fn set_behavior_type(&mut self, behavior: &str) {
        self.behavior_type = Some(behavior.to_string());
        self.physical_harm_type = None;
        self.touch(FormField::BehaviorType);
    }

    pub fn touch(&mut self, field: FormField) {
        self.touched.insert(field);
    }

    pub fn note_submit_attempt(&mut self) {
        self.attempted_submit = true;
    }

    /// Whether the entry step may advance: incident type chosen, and the
    /// harm subtype chosen when the incident is an immediate threat.
    pub fn entry_step_valid(&self) -> bool {
        match self.incident_type {
            None => false,
            Some(IncidentType::ImmediateThreatPhysicalHarm) => self.physical_harm_type.is_some(),
            Some(IncidentType::UnacceptableUserBehavior) => true,
        }
    }

    /// False iff at least one required-by-incident-type field is empty.
    pub fn is_valid_for_submission(&self) -> bool {
        match self.incident_type {
            None => false,
            Some(IncidentType::ImmediateThreatPhysicalHarm) => self.physical_harm_type.is_some(),
            Some(IncidentType::UnacceptableUserBehavior) => match self.behavior_type.as_deref() {
                None | Some("") => false,
                Some(BEHAVIOR_SOMETHING_ELSE) => !self.something_else_details.is_empty(),
                Some(_) => true,
            },
        }
    }

    /// The required-field error for one field, shown only after interaction
    /// or an attempted submit.
    pub fn field_error(&self, field: FormField) -> Option<&'static str> {
        if !self.attempted_submit && !self.touched.contains(&field) {
            return None;
        }
        let missing = match field {
            FormField::IncidentType => self.incident_type.is_none(),
            FormField::PhysicalHarmType => {
                self.incident_type == Some(IncidentType::ImmediateThreatPhysicalHarm)
                    && self.physical_harm_type.is_none()
            }
            FormField::BehaviorType => {
                self.incident_type == Some(IncidentType::UnacceptableUserBehavior)
                    && self.behavior_type.as_deref().is_none_or(str::is_empty)
            }
            FormField::SomethingElseDetails => {
                self.behavior_type.as_deref() == Some(BEHAVIOR_SOMETHING_ELSE)
                    && self.something_else_details.is_empty()
            }
            FormField::ReportedUser | FormField::Details => false,
        };
        missing.then_some("required")
    }

    /// Assemble the submission payload. Pure: calling it twice on an
    /// unmodified state yields identical output.
    pub fn to_payload(&self, page: &PageContext, token: &str) -> ReportPayload {
        let include_something_else =
            self.behavior_type.as_deref() == Some(BEHAVIOR_SOMETHING_ELSE);

        ReportPayload {
            page: page.page.clone(),
            revision_id: page.revision_id,
            incident_type: self.incident_type,
            physical_harm_type: self.physical_harm_type,
            behavior_type: self.behavior_type.clone(),
            reported_user: self.reported_user.clone(),
            details: non_empty(&self.details),
            something_else_details: if include_something_else {
                non_empty(&self.something_else_details)
            } else {
                None
            },
            thread_id: self.entry_context.get("threadId").cloned(),
            token: token.to_string(),
        }
    }

    /// Clear the incident fields after a successful submission. The dialog
    /// stays open to show the confirmation content.
    pub fn clear_after_success(&mut self) {
        self.incident_type = None;
        self.physical_harm_type = None;
        self.behavior_type = None;
        self.details.clear();
        self.something_else_details.clear();
        self.touched.clear();
        self.attempted_submit = false;
    }

    /// Full reset: every field, including entry context and interaction
    /// flags.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Remaining-codepoint counter for the details field, once visible.
    pub fn details_remaining(&self) -> Option<usize> {
        visible_remaining(&self.details, MAX_DETAILS_CODEPOINTS)
    }

    /// Remaining-codepoint counter for the "something else" elaboration.
    pub fn something_else_remaining(&self) -> Option<usize> {
        visible_remaining(&self.something_else_details, MAX_SOMETHING_ELSE_CODEPOINTS)
    }
}

/// Remaining codepoints for a bounded field, surfaced only once consumption
/// crosses the visibility threshold. Input is never blocked at the boundary;
/// enforcement is server-side.
pub fn visible_remaining(value: &str, limit: usize) -> Option<usize> {
    let remaining = limit.saturating_sub(codepoint_len(value));
    let threshold = (limit as f64 * CHAR_COUNT_VISIBLE_FRACTION) as usize;
    (remaining <= threshold).then_some(remaining)
}

/// Outgoing submission payload. Optional keys are absent, not null, when
/// unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub page: String,
    pub revision_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_type: Option<IncidentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_harm_type: Option<PhysicalHarmType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavior_type: Option<String>,
    pub reported_user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub something_else_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    pub token: String,
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
