pub mod constants;
pub mod messages;
pub mod test_helpers;
pub mod types;
pub mod validation;
