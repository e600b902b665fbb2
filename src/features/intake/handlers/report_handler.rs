use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::Reporter;
use crate::features::intake::dtos::{ReportRequest, ReportResponseDto, SentEmailDto};
use crate::features::intake::services::IntakeService;

/// State for intake handlers
#[derive(Clone)]
pub struct IntakeState {
    pub intake: Arc<IntakeService>,
}

/// Submit an incident report
///
/// Production success is an empty 204. In developer mode the response echoes
/// the notification content that would have been emailed.
#[utoipa::path(
    post,
    path = "/reportincident/v0/report",
    request_body = ReportRequest,
    responses(
        (status = 204, description = "Report accepted"),
        (status = 200, description = "Report accepted (developer mode)", body = ReportResponseDto),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Reporter not eligible or not authorized"),
        (status = 404, description = "Feature disabled or revision not found"),
        (status = 422, description = "Invalid page title"),
        (status = 429, description = "Rate limited"),
        (status = 500, description = "Notification could not be sent")
    ),
    tag = "incident-reporting"
)]
pub async fn submit_report(
    reporter: Reporter,
    State(state): State<IntakeState>,
    AppJson(request): AppJson<ReportRequest>,
) -> Result<Response> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let outcome = state.intake.submit(&reporter, request).await?;

    match outcome.sent_email {
        Some(rendered) => {
            let dto = ReportResponseDto {
                sent_email: SentEmailDto {
                    to: rendered.to,
                    subject: rendered.subject,
                    body: rendered.body,
                },
            };
            Ok((StatusCode::OK, Json(dto)).into_response())
        }
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::core::config::{NotifierKind, RateLimitConfig, ReportingConfig};
    use crate::features::auth::SessionTokenStore;
    use crate::features::intake::models::IncidentReport;
    use crate::features::intake::routes;
    use crate::features::intake::services::{
        FixedWindowRateLimiter, IntakeService, LogRecorder,
    };
    use crate::features::notifications::{IncidentNotifier, NotifyError, RenderedNotification};
    use crate::features::users::services::{InMemoryPageDirectory, InMemoryUserDirectory};
    use crate::shared::test_helpers::{account, with_named_reporter};

    struct StubNotifier;

    #[async_trait]
    impl IncidentNotifier for StubNotifier {
        async fn notify(
            &self,
            _report: &IncidentReport,
        ) -> Result<RenderedNotification, NotifyError> {
            Ok(RenderedNotification {
                to: vec!["safety@example.org".to_string()],
                subject: "Immediate threat reported regarding Mallory".to_string(),
                body: "rendered body".to_string(),
            })
        }
    }

    fn app(reporting: ReportingConfig) -> (axum::Router, String) {
        let users = Arc::new(InMemoryUserDirectory::new());
        users.insert(account("Mallory"));

        let pages = Arc::new(InMemoryPageDirectory::new());
        pages.insert_revision(42, "Weather");

        let tokens = Arc::new(SessionTokenStore::new());
        let token = tokens.issue("Alice");

        let service = Arc::new(IntakeService::new(
            reporting,
            users,
            pages,
            tokens,
            Arc::new(FixedWindowRateLimiter::new(&RateLimitConfig {
                max_reports: 100,
                window_secs: 3600,
            })),
            Arc::new(LogRecorder::new()),
            Arc::new(StubNotifier),
        ));

        (with_named_reporter(routes::routes(service)), token)
    }

    fn reporting_config() -> ReportingConfig {
        ReportingConfig {
            enabled: true,
            developer_mode: false,
            min_account_age_days: 0,
            instrumentation_enabled: false,
            notifier: NotifierKind::Email,
        }
    }

    fn post_report(payload: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/reportincident/v0/report")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn behavior_report_answers_204_with_empty_body() {
        let (app, token) = app(reporting_config());

        let response = app
            .oneshot(post_report(json!({
                "revisionId": 42,
                "reportedUser": "Mallory",
                "incidentType": "unacceptable-user-behavior",
                "behaviorType": "spam",
                "token": token,
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn developer_mode_echoes_the_composed_email() {
        let (app, token) = app(ReportingConfig {
            developer_mode: true,
            ..reporting_config()
        });

        let response = app
            .oneshot(post_report(json!({
                "revisionId": 42,
                "reportedUser": "Mallory",
                "incidentType": "immediate-threat-physical-harm",
                "physicalHarmType": "public-harm",
                "token": token,
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["sentEmail"]["to"][0], "safety@example.org");
        assert_eq!(
            json["sentEmail"]["subject"],
            "Immediate threat reported regarding Mallory"
        );
    }

    #[tokio::test]
    async fn disabled_feature_is_indistinguishable_from_a_missing_route() {
        let (app, token) = app(ReportingConfig {
            enabled: false,
            ..reporting_config()
        });

        let response = app
            .oneshot(post_report(json!({
                "revisionId": 42,
                "incidentType": "unacceptable-user-behavior",
                "behaviorType": "spam",
                "token": token,
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["errorKey"], "not-found");
    }

    #[tokio::test]
    async fn disabled_feature_is_gated_before_the_body_is_read() {
        let (app, _token) = app(ReportingConfig {
            enabled: false,
            ..reporting_config()
        });

        let malformed = Request::builder()
            .method("POST")
            .uri("/reportincident/v0/report")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let disabled = app.clone().oneshot(malformed).await.unwrap();

        let missing = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/no/such/route")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        // A malformed body must not leak the flag: same status as a route
        // that does not exist.
        assert_eq!(disabled.status(), StatusCode::NOT_FOUND);
        assert_eq!(disabled.status(), missing.status());
    }

    #[tokio::test]
    async fn localized_error_body_carries_the_error_key() {
        let (app, _token) = app(reporting_config());

        let response = app
            .oneshot(post_report(json!({
                "revisionId": 42,
                "incidentType": "unacceptable-user-behavior",
                "behaviorType": "spam",
                "token": "forged",
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["errorKey"], "bad-token");
        assert!(json["messages"]["en"].is_string());
    }
}
