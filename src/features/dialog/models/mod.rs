mod form_state;

pub use form_state::{visible_remaining, FormField, FormState, PageContext, ReportPayload};
