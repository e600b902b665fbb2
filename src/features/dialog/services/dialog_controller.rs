use std::collections::HashMap;

use crate::features::dialog::models::{FormState, PageContext, ReportPayload};
use crate::features::dialog::services::error_messages::{
    select_error_message, ClientErrorMessage,
};
use crate::features::dialog::services::telemetry::Instrumentation;
use crate::features::intake::models::IncidentType;
use crate::shared::validation::is_ip_literal;

/// The dialog step currently shown. One step is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Entry,
    BehaviorDetails,
    ImmediateHarmDetails,
    Submitting,
    Success,
}

/// Outcome of a submission request, fed back into the controller.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Success,
    Failure {
        offline: bool,
        status: u16,
        messages: HashMap<String, String>,
    },
}

/// Drives the reporting dialog: entry-point handling, step transitions,
/// submission orchestration, reset semantics.
///
/// Single-threaded by design; network callbacks re-enter through
/// `finish_submit` with the generation captured at dispatch, so late
/// responses after a close or reset are ignored instead of resurrecting
/// stale state.
pub struct DialogController {
    pub form: FormState,
    step: Step,
    open: bool,
    show_validation_error: bool,
    footer_error: Option<ClientErrorMessage>,
    /// True right after backing out of a detail step; a second back press
    /// then fully resets the form.
    backed_to_entry: bool,
    generation: u64,
    current_thread: Option<String>,
    ui_lang: String,
    instrumentation: Instrumentation,
}

impl DialogController {
    pub fn new(ui_lang: &str, instrumentation: Instrumentation) -> Self {
        Self {
            form: FormState::new(),
            step: Step::Entry,
            open: false,
            show_validation_error: false,
            footer_error: None,
            backed_to_entry: false,
            generation: 0,
            current_thread: None,
            ui_lang: ui_lang.to_string(),
            instrumentation,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn shows_validation_error(&self) -> bool {
        self.show_validation_error
    }

    pub fn footer_error(&self) -> Option<&ClientErrorMessage> {
        self.footer_error.as_ref()
    }

    /// The primary action is disabled while a submission is in flight,
    /// preventing double submits.
    pub fn primary_action_disabled(&self) -> bool {
        self.step == Step::Submitting
    }

    /// Open from the generic tools link: no prefilled user.
    pub fn open_generic(&mut self) {
        self.open = true;
        self.step = Step::Entry;
        self.current_thread = None;
        self.log("dialog_opened", HashMap::new());
    }

    /// Open from a contextual comment/topic action that supplies a candidate
    /// reported user and an opaque thread identifier.
    ///
    /// Reopening with the thread already loaded preserves in-progress edits;
    /// a different thread triggers a full reset before prefilling. The field
    /// is locked only when the candidate resolved to a known account or is
    /// an IP literal.
    pub fn open_for_thread(&mut self, thread_id: &str, candidate: &str, candidate_resolved: bool) {
        if self.current_thread.as_deref() != Some(thread_id) {
            self.form.reset();
            self.form
                .entry_context
                .insert("threadId".to_string(), thread_id.to_string());
            self.form.reported_user = candidate.to_string();
            self.form.reported_user_locked = candidate_resolved || is_ip_literal(candidate);
            self.current_thread = Some(thread_id.to_string());
        }
        self.open = true;
        self.step = Step::Entry;
        self.log(
            "dialog_opened",
            HashMap::from([("threadId".to_string(), thread_id.to_string())]),
        );
    }

    /// Advance from the entry step. Stays put (with the validation flag set)
    /// when the step is incomplete; entered data is never cleared here.
    pub fn proceed(&mut self) {
        if self.step != Step::Entry {
            return;
        }
        if !self.form.entry_step_valid() {
            self.show_validation_error = true;
            return;
        }
        self.show_validation_error = false;
        self.backed_to_entry = false;
        self.step = match self.form.incident_type {
            Some(IncidentType::UnacceptableUserBehavior) => Step::BehaviorDetails,
            Some(IncidentType::ImmediateThreatPhysicalHarm) => Step::ImmediateHarmDetails,
            None => unreachable!("entry_step_valid checked incident_type"),
        };
        self.log("step_forward", HashMap::new());
    }

    /// Back press. From a detail step the first press returns to entry and
    /// clears nothing; a second consecutive press from entry fully resets
    /// the form so stale data never lingers after backing all the way out.
    pub fn back(&mut self) {
        match self.step {
            Step::BehaviorDetails | Step::ImmediateHarmDetails => {
                self.step = Step::Entry;
                self.backed_to_entry = true;
            }
            Step::Entry => {
                if self.backed_to_entry {
                    self.form.reset();
                    self.instrumentation.clear_funnel_token();
                    self.backed_to_entry = false;
                    self.current_thread = None;
                }
            }
            _ => {}
        }
        self.log("step_back", HashMap::new());
    }

    /// Start a submission. Returns the payload and its generation when the
    /// current detail step validates; otherwise flags the validation error
    /// and aborts the transition.
    pub fn begin_submit(&mut self, page: &PageContext, token: &str) -> Option<(u64, ReportPayload)> {
        if !matches!(self.step, Step::BehaviorDetails | Step::ImmediateHarmDetails) {
            return None;
        }
        self.form.note_submit_attempt();
        if !self.form.is_valid_for_submission() {
            self.show_validation_error = true;
            self.log("submit_blocked", HashMap::new());
            return None;
        }
        self.show_validation_error = false;
        self.footer_error = None;
        self.step = Step::Submitting;
        self.generation += 1;
        self.log("submit_attempt", HashMap::new());
        Some((self.generation, self.form.to_payload(page, token)))
    }

    /// Complete a submission. Outcomes carrying a stale generation (the
    /// dialog was closed or resubmitted meanwhile) are ignored entirely.
    pub fn finish_submit(&mut self, generation: u64, outcome: SubmitOutcome) {
        if generation != self.generation || !self.open || self.step != Step::Submitting {
            return;
        }
        match outcome {
            SubmitOutcome::Success => {
                self.form.clear_after_success();
                self.instrumentation.clear_funnel_token();
                self.step = Step::Success;
                self.log("submit_success", HashMap::new());
            }
            SubmitOutcome::Failure {
                offline,
                status,
                messages,
            } => {
                // Return to the detail step the payload was built on; all
                // entered data is preserved for a retry.
                self.step = match self.form.incident_type {
                    Some(IncidentType::UnacceptableUserBehavior) => Step::BehaviorDetails,
                    _ => Step::ImmediateHarmDetails,
                };
                self.footer_error = Some(select_error_message(
                    offline,
                    status,
                    &messages,
                    &self.ui_lang,
                ));
                self.log(
                    "submit_error",
                    HashMap::from([("status".to_string(), status.to_string())]),
                );
            }
        }
    }

    /// Close the dialog. From the success step this is the natural exit
    /// (fields were already cleared); from anywhere else the form fully
    /// resets. In-flight submissions are orphaned by bumping the generation.
    pub fn close(&mut self) {
        if self.step != Step::Success {
            self.form.reset();
            self.instrumentation.clear_funnel_token();
        }
        self.open = false;
        self.step = Step::Entry;
        self.backed_to_entry = false;
        self.current_thread = None;
        self.generation += 1;
        self.log("dialog_closed", HashMap::new());
    }

    fn log(&self, name: &str, context: HashMap<String, String>) {
        self.instrumentation.log_event(name, context);
    }
}
