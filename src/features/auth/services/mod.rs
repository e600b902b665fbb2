mod token_service;

pub use token_service::{CsrfValidator, SessionTokenStore};
