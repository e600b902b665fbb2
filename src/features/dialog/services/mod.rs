mod dialog_controller;
mod error_messages;
mod suggestions;
mod telemetry;

pub use dialog_controller::{DialogController, Step, SubmitOutcome};
pub use error_messages::{select_error_message, ClientErrorMessage};
pub use suggestions::UsernameSuggester;
pub use telemetry::{FunnelEvent, Instrumentation, TelemetrySink, TracingSink};
