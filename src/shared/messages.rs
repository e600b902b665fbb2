//! Localized message catalog.
//!
//! Message lookup is an external collaborator from the pipeline's point of
//! view; this module keeps a small in-crate catalog so error responses can
//! carry a localized message map and the notifier can render human phrases.

use std::collections::HashMap;

use crate::core::error::AppError;

/// Language the catalog always carries. Other languages fall back to it.
pub const FALLBACK_LANG: &str = "en";

/// Human-readable message map attached to an error response, keyed by
/// language code. Currently the catalog ships English only; the wire shape
/// already supports more.
pub fn localized_error_messages(err: &AppError) -> HashMap<String, String> {
    let text = match err {
        AppError::FeatureDisabled | AppError::NotFound(_) => {
            "The requested resource was not found.".to_string()
        }
        AppError::AnonymousReporter => {
            "You must be logged in to report an incident.".to_string()
        }
        AppError::NoPermission(_) => {
            "You do not have permission to report an incident.".to_string()
        }
        AppError::BlockedReporter => {
            "Blocked users cannot report incidents.".to_string()
        }
        AppError::EmailUnconfirmed => {
            "Confirm your email address before reporting an incident.".to_string()
        }
        AppError::BadToken => "Your session has expired. Reload and try again.".to_string(),
        AppError::InvalidTitle(title) => format!("\"{}\" is not a valid page title.", title),
        AppError::RevisionNotFound(id) => format!("Revision {} does not exist.", id),
        AppError::MissingField(field) => format!("The field \"{}\" is required.", field),
        AppError::ExtraneousField(field) => {
            format!("The field \"{}\" is not allowed for this incident type.", field)
        }
        AppError::TooLong { field, max } => {
            format!("The field \"{}\" may be at most {} characters.", field, max)
        }
        AppError::RateLimited => {
            "You have submitted too many reports. Try again later.".to_string()
        }
        AppError::RecordFailed(msg) => msg.clone(),
        AppError::NotifyFailed(_) => {
            "Your report could not be sent. Try again later.".to_string()
        }
        AppError::BadRequest(msg) => msg.clone(),
        AppError::Internal(_) => "Something went wrong on our end.".to_string(),
    };

    HashMap::from([(FALLBACK_LANG.to_string(), text)])
}

/// Display label for a behavior catalog entry.
pub fn behavior_label(behavior: &str) -> String {
    match behavior {
        "doxing" => "Doxing".to_string(),
        "hate-speech" => "Hate speech".to_string(),
        "intimidation" => "Intimidation or aggression".to_string(),
        "sexual-harassment" => "Sexual harassment".to_string(),
        "spam" => "Spam".to_string(),
        "trolling" => "Trolling".to_string(),
        "something-else" => "Something else".to_string(),
        other => other.to_string(),
    }
}

/// Elaborated label for the "something else" entry, embedding the reporter's
/// own words.
pub fn something_else_elaboration(details: &str) -> String {
    format!("Something else: {}", details)
}

/// Phrase introducing the permalink in a notification, varying by where the
/// report was filed from.
pub fn link_prefix_phrase(origin: LinkOrigin) -> &'static str {
    match origin {
        LinkOrigin::Comment => "Reported comment:",
        LinkOrigin::Topic => "Reported topic:",
        LinkOrigin::Page => "Reported page:",
    }
}

/// Where a notification permalink points, derived from the thread identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOrigin {
    Comment,
    Topic,
    Page,
}

/// Placeholder rendered when a report names no specific user.
pub fn no_reported_user_placeholder() -> &'static str {
    "(no specific user)"
}
