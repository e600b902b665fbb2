pub mod models;
pub mod services;

pub use models::{FormField, FormState, PageContext};
pub use services::{DialogController, Instrumentation, Step, UsernameSuggester};
