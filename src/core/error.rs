use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::messages;
use crate::shared::types::ErrorBody;

#[derive(Debug, Error)]
pub enum AppError {
    /// Feature flag is off. Answered as if the route does not exist so the
    /// flag cannot be probed.
    #[error("Not found")]
    FeatureDisabled,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Anonymous users cannot report incidents")]
    AnonymousReporter,

    #[error("No permission: {0}")]
    NoPermission(String),

    #[error("Reporter is blocked")]
    BlockedReporter,

    #[error("Reporter has no confirmed email address")]
    EmailUnconfirmed,

    #[error("Invalid CSRF token")]
    BadToken,

    #[error("Invalid page title: {0}")]
    InvalidTitle(String),

    #[error("Revision {0} not found")]
    RevisionNotFound(u64),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field not allowed for this incident type: {0}")]
    ExtraneousField(&'static str),

    #[error("Field {field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Report could not be recorded: {0}")]
    RecordFailed(String),

    #[error("Report notification could not be sent: {0}")]
    NotifyFailed(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Machine-readable key consumed by the dialog's error-message
    /// selection. Clients switch on this, never on prose.
    pub fn error_key(&self) -> &'static str {
        match self {
            AppError::FeatureDisabled | AppError::NotFound(_) => "not-found",
            AppError::AnonymousReporter => "anonymous-reporter",
            AppError::NoPermission(_) => "no-permission",
            AppError::BlockedReporter => "blocked",
            AppError::EmailUnconfirmed => "email-unconfirmed",
            AppError::BadToken => "bad-token",
            AppError::InvalidTitle(_) => "invalid-title",
            AppError::RevisionNotFound(_) => "revision-not-found",
            AppError::MissingField(_) => "missing-field",
            AppError::ExtraneousField(_) => "extraneous-field",
            AppError::TooLong { .. } => "too-long",
            AppError::RateLimited => "rate-limited",
            AppError::RecordFailed(_) => "report-not-recorded",
            AppError::NotifyFailed(_) => "unable-to-send",
            AppError::BadRequest(_) => "bad-request",
            AppError::Internal(_) => "internal-error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::FeatureDisabled | AppError::NotFound(_) | AppError::RevisionNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::AnonymousReporter
            | AppError::NoPermission(_)
            | AppError::BlockedReporter
            | AppError::EmailUnconfirmed
            | AppError::BadToken => StatusCode::FORBIDDEN,
            AppError::InvalidTitle(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::MissingField(_)
            | AppError::ExtraneousField(_)
            | AppError::TooLong { .. }
            | AppError::RecordFailed(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::NotifyFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            AppError::RecordFailed(msg) => tracing::error!("Report not recorded: {}", msg),
            AppError::NotifyFailed(msg) => tracing::error!("Report notification failed: {}", msg),
            _ => {}
        }

        let status = self.status();
        let body = ErrorBody {
            error_key: self.error_key().to_string(),
            messages: messages::localized_error_messages(&self),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_title_maps_to_422() {
        let err = AppError::InvalidTitle("<bad>".to_string());
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_key(), "invalid-title");
    }

    #[test]
    fn feature_disabled_is_indistinguishable_from_missing_route() {
        let disabled = AppError::FeatureDisabled;
        let missing = AppError::NotFound("no such route".to_string());
        assert_eq!(disabled.status(), missing.status());
        assert_eq!(disabled.error_key(), missing.error_key());
    }

    #[test]
    fn notify_failure_is_a_server_error() {
        let err = AppError::NotifyFailed("smtp down".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_key(), "unable-to-send");
    }
}
