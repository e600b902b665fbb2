use std::collections::HashMap;

/// What the dialog footer shows after a failed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientErrorMessage {
    /// The browser reports itself offline.
    Disconnected,
    /// Network-level failure or anything without a usable server message.
    Generic,
    /// The server answered in the 5xx range.
    ServerError,
    /// A server-supplied message matching the reporter's exact interface
    /// language, shown verbatim.
    Server(String),
}

/// Deterministic message selection, in priority order. Client-side validation
/// failures never reach this; they show field-level messages instead.
pub fn select_error_message(
    offline: bool,
    status: u16,
    messages: &HashMap<String, String>,
    ui_lang: &str,
) -> ClientErrorMessage {
    if offline {
        return ClientErrorMessage::Disconnected;
    }
    if status == 0 {
        return ClientErrorMessage::Generic;
    }
    if (500..600).contains(&status) {
        return ClientErrorMessage::ServerError;
    }
    if let Some(message) = messages.get(ui_lang) {
        return ClientErrorMessage::Server(message.clone());
    }
    ClientErrorMessage::Generic
}
