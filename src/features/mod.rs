pub mod auth;
pub mod dialog;
pub mod intake;
pub mod notifications;
pub mod users;
