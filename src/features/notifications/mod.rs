pub mod services;

pub use services::{
    IncidentNotifier, Mailer, NotifyError, RenderedNotification, TicketingClient,
};
