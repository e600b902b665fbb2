pub mod links;
mod mailer_service;
mod notifier;
mod ticketing_service;

pub use mailer_service::{rendered_behaviors, Mailer};
pub use notifier::{IncidentNotifier, NotifyError, RenderedNotification};
pub use ticketing_service::TicketingClient;
