pub mod models;
pub mod services;

pub use models::{Reporter, ReporterAccount};
pub use services::{CsrfValidator, SessionTokenStore};
