use std::sync::Arc;

use chrono::Utc;

use crate::core::config::ReportingConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::{CsrfValidator, Reporter, ReporterAccount};
use crate::features::intake::dtos::ReportRequest;
use crate::features::intake::models::{IncidentReport, IncidentType};
use crate::features::intake::services::rate_limiter::ReportRateLimiter;
use crate::features::intake::services::recorder::ReportRecorder;
use crate::features::notifications::{IncidentNotifier, RenderedNotification};
use crate::features::users::models::{PageTarget, ReportedIdentity};
use crate::features::users::services::{PageDirectory, UserDirectory};
use crate::shared::constants::{BEHAVIOR_CATALOG, MAX_DETAILS_CODEPOINTS};
use crate::shared::validation::{codepoint_len, is_ip_literal, is_valid_title};

/// Result of a successful submission. `sent_email` carries the composed
/// notification in developer mode so the side effect is observable without
/// an email backend.
#[derive(Debug)]
pub struct IntakeOutcome {
    pub sent_email: Option<RenderedNotification>,
}

/// The report intake pipeline: eligibility, validation/normalization,
/// authorization, record, notify. Stateless across requests; every stage can
/// short-circuit with a typed failure.
pub struct IntakeService {
    reporting: ReportingConfig,
    users: Arc<dyn UserDirectory>,
    pages: Arc<dyn PageDirectory>,
    csrf: Arc<dyn CsrfValidator>,
    rate_limiter: Arc<dyn ReportRateLimiter>,
    recorder: Arc<dyn ReportRecorder>,
    notifier: Arc<dyn IncidentNotifier>,
}

impl IntakeService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reporting: ReportingConfig,
        users: Arc<dyn UserDirectory>,
        pages: Arc<dyn PageDirectory>,
        csrf: Arc<dyn CsrfValidator>,
        rate_limiter: Arc<dyn ReportRateLimiter>,
        recorder: Arc<dyn ReportRecorder>,
        notifier: Arc<dyn IncidentNotifier>,
    ) -> Self {
        Self {
            reporting,
            users,
            pages,
            csrf,
            rate_limiter,
            recorder,
            notifier,
        }
    }

    pub fn developer_mode(&self) -> bool {
        self.reporting.developer_mode
    }

    pub fn enabled(&self) -> bool {
        self.reporting.enabled
    }

    pub async fn submit(&self, reporter: &Reporter, request: ReportRequest) -> Result<IntakeOutcome> {
        tracing::debug!(reporter = %reporter.name(), "incident report received");

        // Feature gate first: a disabled feature answers like a missing
        // route so the flag cannot be probed.
        if !self.reporting.enabled {
            return Err(AppError::FeatureDisabled);
        }

        let account = self.check_eligibility(reporter)?;
        let report = self.validate(account, request).await?;

        // Authorization runs strictly after validation so invalid
        // submissions never consume rate-limit budget.
        self.authorize(account).await?;

        self.recorder
            .record(&report)
            .await
            .map_err(AppError::RecordFailed)?;

        // Low-urgency reports stay private: recorded, never notified.
        if report.incident_type != IncidentType::ImmediateThreatPhysicalHarm {
            return Ok(IntakeOutcome { sent_email: None });
        }

        let rendered = self
            .notifier
            .notify(&report)
            .await
            .map_err(|e| AppError::NotifyFailed(e.to_string()))?;

        let sent_email = self.reporting.developer_mode.then_some(rendered);
        Ok(IntakeOutcome { sent_email })
    }

    /// Reporter eligibility, most security-sensitive checks first.
    fn check_eligibility<'a>(&self, reporter: &'a Reporter) -> Result<&'a ReporterAccount> {
        let account = match reporter {
            Reporter::Anonymous { .. } => return Err(AppError::AnonymousReporter),
            Reporter::Named(account) => account,
        };

        if account.edit_count == 0 {
            tracing::warn!(
                reporter = %account.name,
                "report rejected: reporter has no edits"
            );
            return Err(AppError::NoPermission("reporter has no edits".to_string()));
        }

        if account.blocked {
            tracing::warn!(reporter = %account.name, "report rejected: reporter is blocked");
            return Err(AppError::BlockedReporter);
        }

        if !self.reporting.developer_mode {
            let min_age = self.reporting.min_account_age_days;
            if min_age > 0 && account.account_age_days(Utc::now()) < i64::from(min_age) {
                tracing::warn!(
                    reporter = %account.name,
                    "report rejected: account younger than {} days",
                    min_age
                );
                return Err(AppError::NoPermission("account too new".to_string()));
            }

            // Distinct failure: the dialog offers a remediation action.
            if !account.email_confirmed {
                return Err(AppError::EmailUnconfirmed);
            }
        }

        Ok(account)
    }

    /// Validate and normalize the payload into the IncidentReport value
    /// object.
    async fn validate(
        &self,
        account: &ReporterAccount,
        request: ReportRequest,
    ) -> Result<IncidentReport> {
        if !self.csrf.validate(&account.name, &request.token) {
            return Err(AppError::BadToken);
        }

        let page = self.resolve_target(&request).await?;
        let reported_user = self.resolve_reported_user(request.reported_user.as_deref()).await;

        match request.incident_type {
            IncidentType::ImmediateThreatPhysicalHarm => {
                if request.physical_harm_type.is_none() {
                    return Err(AppError::MissingField("physicalHarmType"));
                }
                if request.behavior_type.is_some() {
                    return Err(AppError::ExtraneousField("behaviorType"));
                }
            }
            IncidentType::UnacceptableUserBehavior => {
                let behavior = request
                    .behavior_type
                    .as_deref()
                    .ok_or(AppError::MissingField("behaviorType"))?;
                if !BEHAVIOR_CATALOG.contains(&behavior) {
                    return Err(AppError::BadRequest(format!(
                        "Unknown behavior type: {}",
                        behavior
                    )));
                }
                if request.physical_harm_type.is_some() {
                    return Err(AppError::ExtraneousField("physicalHarmType"));
                }
            }
        }

        // Length caps are re-enforced here; the dialog's own cap is not
        // trusted.
        check_length("details", request.details.as_deref())?;
        check_length("somethingElseDetails", request.something_else_details.as_deref())?;

        Ok(IncidentReport {
            reporting_user: account.name.clone(),
            reported_user,
            page,
            incident_type: request.incident_type,
            physical_harm_type: request.physical_harm_type,
            behavior_type: request.behavior_type,
            details: non_empty(request.details),
            something_else_details: non_empty(request.something_else_details),
            thread_id: non_empty(request.thread_id),
        })
    }

    async fn resolve_target(&self, request: &ReportRequest) -> Result<PageTarget> {
        if request.revision_id != 0 {
            return self
                .pages
                .resolve_revision(request.revision_id)
                .await
                .ok_or(AppError::RevisionNotFound(request.revision_id));
        }

        // No specific revision: target the page by parsed title. This covers
        // pages with no revisions yet.
        let title = request
            .page
            .as_deref()
            .ok_or(AppError::MissingField("page"))?;
        if !is_valid_title(title) {
            return Err(AppError::InvalidTitle(title.to_string()));
        }

        Ok(PageTarget {
            title: title.trim().to_string(),
            revision_id: None,
        })
    }

    /// Resolve the reported user. Empty means "no specific user" (accepted
    /// policy); unresolved lookups are tolerated here.
    async fn resolve_reported_user(&self, reported_user: Option<&str>) -> ReportedIdentity {
        let name = match reported_user {
            Some(name) if !name.trim().is_empty() => name.trim(),
            _ => return ReportedIdentity::None,
        };

        if is_ip_literal(name) {
            return ReportedIdentity::Anonymous {
                ip: name.to_string(),
            };
        }

        match self.users.fetch(name).await {
            Ok(Some(account)) => ReportedIdentity::Registered { name: account.name },
            Ok(None) => ReportedIdentity::Unresolved {
                name: name.to_string(),
            },
            Err(e) => {
                tracing::warn!("reported-user lookup failed, deferring: {}", e);
                ReportedIdentity::Unresolved {
                    name: name.to_string(),
                }
            }
        }
    }

    async fn authorize(&self, account: &ReporterAccount) -> Result<()> {
        if account.temporary {
            // Logged distinctly for observability; maps to the same outcome.
            tracing::warn!(
                reporter = %account.name,
                "report rejected: temporary accounts cannot report incidents"
            );
            return Err(AppError::NoPermission("temporary account".to_string()));
        }

        if !account.authorized {
            return Err(AppError::NoPermission(
                "missing report-incident permission".to_string(),
            ));
        }

        if !self.rate_limiter.try_acquire(&account.name).await {
            return Err(AppError::RateLimited);
        }

        Ok(())
    }
}

fn check_length(field: &'static str, value: Option<&str>) -> Result<()> {
    if let Some(text) = value {
        if codepoint_len(text) > MAX_DETAILS_CODEPOINTS {
            return Err(AppError::TooLong {
                field,
                max: MAX_DETAILS_CODEPOINTS,
            });
        }
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    use super::*;
    use crate::core::config::{NotifierKind, RateLimitConfig, ReportingConfig};
    use crate::features::auth::SessionTokenStore;
    use crate::features::intake::models::PhysicalHarmType;
    use crate::features::intake::services::rate_limiter::FixedWindowRateLimiter;
    use crate::features::intake::services::recorder::LogRecorder;
    use crate::features::notifications::NotifyError;
    use crate::features::users::services::{InMemoryPageDirectory, InMemoryUserDirectory};
    use crate::shared::test_helpers::account;

    struct CountingNotifier {
        calls: AtomicU32,
        fail: bool,
    }

    impl CountingNotifier {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicU32::new(0),
                fail,
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl IncidentNotifier for CountingNotifier {
        async fn notify(
            &self,
            _report: &IncidentReport,
        ) -> std::result::Result<RenderedNotification, NotifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(NotifyError::Delivery("smtp down".to_string()));
            }
            Ok(RenderedNotification {
                to: vec!["safety@example.org".to_string()],
                subject: "subject".to_string(),
                body: "body".to_string(),
            })
        }
    }

    struct FailingRecorder;

    #[async_trait]
    impl ReportRecorder for FailingRecorder {
        async fn record(&self, _report: &IncidentReport) -> std::result::Result<(), String> {
            Err("recorder unavailable".to_string())
        }
    }

    /// Collects formatted log output so tests can assert on what was logged.
    #[derive(Clone, Default)]
    struct LogCapture(Arc<std::sync::Mutex<Vec<u8>>>);

    impl LogCapture {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
        type Writer = LogCapture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    struct Harness {
        service: IntakeService,
        tokens: Arc<SessionTokenStore>,
        notifier: Arc<CountingNotifier>,
    }

    struct HarnessOptions {
        reporting: ReportingConfig,
        max_reports: u32,
        notify_fails: bool,
        record_fails: bool,
    }

    impl Default for HarnessOptions {
        fn default() -> Self {
            Self {
                reporting: reporting_config(),
                max_reports: 100,
                notify_fails: false,
                record_fails: false,
            }
        }
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

    fn harness(options: HarnessOptions) -> Harness {
        let users = Arc::new(InMemoryUserDirectory::new());
        users.insert(account("Mallory"));

        let pages = Arc::new(InMemoryPageDirectory::new());
        pages.insert_revision(42, "Weather");

        let tokens = Arc::new(SessionTokenStore::new());
        let notifier = Arc::new(CountingNotifier::new(options.notify_fails));
        let recorder: Arc<dyn ReportRecorder> = if options.record_fails {
            Arc::new(FailingRecorder)
        } else {
            Arc::new(LogRecorder::new())
        };

        let service = IntakeService::new(
            options.reporting,
            users,
            pages,
            tokens.clone(),
            Arc::new(FixedWindowRateLimiter::new(&RateLimitConfig {
                max_reports: options.max_reports,
                window_secs: 3600,
            })),
            recorder,
            notifier.clone(),
        );

        Harness {
            service,
            tokens,
            notifier,
        }
    }

    fn reporter(name: &str) -> Reporter {
        Reporter::Named(account(name))
    }

    fn behavior_request(token: &str) -> ReportRequest {
        ReportRequest {
            page: None,
            reported_user: Some("Mallory".to_string()),
            revision_id: 42,
            incident_type: IncidentType::UnacceptableUserBehavior,
            physical_harm_type: None,
            behavior_type: Some("spam".to_string()),
            details: None,
            something_else_details: None,
            thread_id: None,
            token: token.to_string(),
        }
    }

    fn threat_request(token: &str) -> ReportRequest {
        ReportRequest {
            incident_type: IncidentType::ImmediateThreatPhysicalHarm,
            physical_harm_type: Some(PhysicalHarmType::PhysicalHarm),
            behavior_type: None,
            ..behavior_request(token)
        }
    }

    #[tokio::test]
    async fn disabled_feature_answers_like_a_missing_route() {
        let h = harness(HarnessOptions {
            reporting: ReportingConfig {
                enabled: false,
                ..reporting_config()
            },
            ..Default::default()
        });
        let token = h.tokens.issue("Alice");

        let err = h
            .service
            .submit(&reporter("Alice"), behavior_request(&token))
            .await
            .unwrap_err();
        assert_eq!(err.error_key(), "not-found");
    }

    #[tokio::test]
    async fn anonymous_reporters_are_rejected() {
        let h = harness(HarnessOptions::default());

        let err = h
            .service
            .submit(
                &Reporter::Anonymous {
                    ip: "10.0.0.1".to_string(),
                },
                behavior_request("whatever"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.error_key(), "anonymous-reporter");
    }

    #[tokio::test]
    async fn reporters_without_edits_get_no_permission_and_a_named_warning() {
        use tracing::instrument::WithSubscriber;

        let h = harness(HarnessOptions::default());
        let token = h.tokens.issue("Alice");

        let mut fresh = account("Alice");
        fresh.edit_count = 0;

        let capture = LogCapture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .finish();

        let err = h
            .service
            .submit(&Reporter::Named(fresh), behavior_request(&token))
            .with_subscriber(subscriber)
            .await
            .unwrap_err();
        assert_eq!(err.error_key(), "no-permission");

        // The rejection is warn-logged with the reporter's name.
        let logged = capture.contents();
        assert!(logged.contains("WARN"));
        assert!(logged.contains("Alice"));
        assert!(logged.contains("no edits"));
    }

    #[tokio::test]
    async fn blocked_reporters_are_rejected() {
        let h = harness(HarnessOptions::default());
        let token = h.tokens.issue("Alice");

        let mut blocked = account("Alice");
        blocked.blocked = true;

        let err = h
            .service
            .submit(&Reporter::Named(blocked), behavior_request(&token))
            .await
            .unwrap_err();
        assert_eq!(err.error_key(), "blocked");
    }

    #[tokio::test]
    async fn young_accounts_are_rejected_unless_developer_mode() {
        let strict = harness(HarnessOptions {
            reporting: ReportingConfig {
                min_account_age_days: 30,
                ..reporting_config()
            },
            ..Default::default()
        });
        let token = strict.tokens.issue("Alice");

        let mut young = account("Alice");
        young.registered_at = Utc::now() - Duration::days(2);

        let err = strict
            .service
            .submit(&Reporter::Named(young.clone()), behavior_request(&token))
            .await
            .unwrap_err();
        assert_eq!(err.error_key(), "no-permission");

        let dev = harness(HarnessOptions {
            reporting: ReportingConfig {
                min_account_age_days: 30,
                developer_mode: true,
                ..reporting_config()
            },
            ..Default::default()
        });
        let token = dev.tokens.issue("Alice");
        assert!(dev
            .service
            .submit(&Reporter::Named(young), behavior_request(&token))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn unconfirmed_email_is_a_distinct_failure() {
        let h = harness(HarnessOptions::default());
        let token = h.tokens.issue("Alice");

        let mut unconfirmed = account("Alice");
        unconfirmed.email_confirmed = false;

        let err = h
            .service
            .submit(&Reporter::Named(unconfirmed), behavior_request(&token))
            .await
            .unwrap_err();
        assert_eq!(err.error_key(), "email-unconfirmed");
    }

    #[tokio::test]
    async fn bad_csrf_token_is_rejected() {
        let h = harness(HarnessOptions::default());
        h.tokens.issue("Alice");

        let err = h
            .service
            .submit(&reporter("Alice"), behavior_request("forged"))
            .await
            .unwrap_err();
        assert_eq!(err.error_key(), "bad-token");
    }

    #[tokio::test]
    async fn unknown_revision_is_rejected() {
        let h = harness(HarnessOptions::default());
        let token = h.tokens.issue("Alice");

        let mut request = behavior_request(&token);
        request.revision_id = 999;

        let err = h
            .service
            .submit(&reporter("Alice"), request)
            .await
            .unwrap_err();
        assert_eq!(err.error_key(), "revision-not-found");
    }

    #[tokio::test]
    async fn zero_revision_with_unparseable_title_is_invalid() {
        let h = harness(HarnessOptions::default());
        let token = h.tokens.issue("Alice");

        let mut request = behavior_request(&token);
        request.revision_id = 0;
        request.page = Some("Bad|Title".to_string());

        let err = h
            .service
            .submit(&reporter("Alice"), request)
            .await
            .unwrap_err();
        assert_eq!(err.error_key(), "invalid-title");
        assert_eq!(err.status(), axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn zero_revision_with_valid_title_targets_the_page() {
        let h = harness(HarnessOptions::default());
        let token = h.tokens.issue("Alice");

        let mut request = behavior_request(&token);
        request.revision_id = 0;
        request.page = Some("Brand New Page".to_string());

        assert!(h.service.submit(&reporter("Alice"), request).await.is_ok());
    }

    #[tokio::test]
    async fn both_subtype_fields_is_an_extraneous_field_failure() {
        let h = harness(HarnessOptions::default());
        let token = h.tokens.issue("Alice");

        let mut request = threat_request(&token);
        request.behavior_type = Some("spam".to_string());

        let err = h
            .service
            .submit(&reporter("Alice"), request)
            .await
            .unwrap_err();
        match err {
            AppError::ExtraneousField(field) => assert_eq!(field, "behaviorType"),
            other => panic!("expected extraneous-field, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_subtype_is_a_missing_field_failure() {
        let h = harness(HarnessOptions::default());
        let token = h.tokens.issue("Alice");

        let mut request = threat_request(&token);
        request.physical_harm_type = None;

        let err = h
            .service
            .submit(&reporter("Alice"), request)
            .await
            .unwrap_err();
        match err {
            AppError::MissingField(field) => assert_eq!(field, "physicalHarmType"),
            other => panic!("expected missing-field, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn overlong_details_are_rejected_server_side() {
        let h = harness(HarnessOptions::default());
        let token = h.tokens.issue("Alice");

        let mut request = behavior_request(&token);
        request.details = Some("x".repeat(MAX_DETAILS_CODEPOINTS + 1));

        let err = h
            .service
            .submit(&reporter("Alice"), request)
            .await
            .unwrap_err();
        assert_eq!(err.error_key(), "too-long");
    }

    #[tokio::test]
    async fn empty_reported_user_is_accepted() {
        let h = harness(HarnessOptions::default());
        let token = h.tokens.issue("Alice");

        let mut request = behavior_request(&token);
        request.reported_user = Some("".to_string());

        assert!(h.service.submit(&reporter("Alice"), request).await.is_ok());
    }

    #[tokio::test]
    async fn behavior_reports_are_recorded_but_never_notified() {
        let h = harness(HarnessOptions::default());
        let token = h.tokens.issue("Alice");

        let outcome = h
            .service
            .submit(&reporter("Alice"), behavior_request(&token))
            .await
            .unwrap();

        assert!(outcome.sent_email.is_none());
        assert_eq!(h.notifier.calls(), 0);
    }

    #[tokio::test]
    async fn threat_reports_notify_and_dev_mode_echoes_the_email() {
        let h = harness(HarnessOptions {
            reporting: ReportingConfig {
                developer_mode: true,
                ..reporting_config()
            },
            ..Default::default()
        });
        let token = h.tokens.issue("Alice");

        let outcome = h
            .service
            .submit(&reporter("Alice"), threat_request(&token))
            .await
            .unwrap();

        assert_eq!(h.notifier.calls(), 1);
        assert!(outcome.sent_email.is_some());
    }

    #[tokio::test]
    async fn production_mode_does_not_echo_the_email() {
        let h = harness(HarnessOptions::default());
        let token = h.tokens.issue("Alice");

        let outcome = h
            .service
            .submit(&reporter("Alice"), threat_request(&token))
            .await
            .unwrap();
        assert!(outcome.sent_email.is_none());
        assert_eq!(h.notifier.calls(), 1);
    }

    #[tokio::test]
    async fn record_failure_is_fatal_and_skips_notification() {
        let h = harness(HarnessOptions {
            record_fails: true,
            ..Default::default()
        });
        let token = h.tokens.issue("Alice");

        let err = h
            .service
            .submit(&reporter("Alice"), threat_request(&token))
            .await
            .unwrap_err();
        assert_eq!(err.error_key(), "report-not-recorded");
        assert_eq!(h.notifier.calls(), 0);
    }

    #[tokio::test]
    async fn notify_failure_after_successful_record_is_unable_to_send() {
        let h = harness(HarnessOptions {
            notify_fails: true,
            ..Default::default()
        });
        let token = h.tokens.issue("Alice");

        let err = h
            .service
            .submit(&reporter("Alice"), threat_request(&token))
            .await
            .unwrap_err();
        assert_eq!(err.error_key(), "unable-to-send");
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn invalid_submissions_do_not_consume_rate_limit_budget() {
        let h = harness(HarnessOptions {
            max_reports: 1,
            ..Default::default()
        });
        let token = h.tokens.issue("Alice");

        // Two invalid submissions (extraneous field) burn nothing.
        for _ in 0..2 {
            let mut bad = threat_request(&token);
            bad.behavior_type = Some("spam".to_string());
            let err = h
                .service
                .submit(&reporter("Alice"), bad)
                .await
                .unwrap_err();
            assert_eq!(err.error_key(), "extraneous-field");
        }

        // The budget of one is still available.
        assert!(h
            .service
            .submit(&reporter("Alice"), behavior_request(&token))
            .await
            .is_ok());

        // And now it is spent.
        let err = h
            .service
            .submit(&reporter("Alice"), behavior_request(&token))
            .await
            .unwrap_err();
        assert_eq!(err.error_key(), "rate-limited");
        assert_eq!(err.status(), axum::http::StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn temporary_accounts_map_to_no_permission() {
        let h = harness(HarnessOptions::default());
        let token = h.tokens.issue("Alice");

        let mut temp = account("Alice");
        temp.temporary = true;

        let err = h
            .service
            .submit(&Reporter::Named(temp), behavior_request(&token))
            .await
            .unwrap_err();
        assert_eq!(err.error_key(), "no-permission");
    }

    #[tokio::test]
    async fn ip_literal_reported_user_becomes_an_anonymous_identity() {
        let h = harness(HarnessOptions::default());
        let token = h.tokens.issue("Alice");

        let mut request = behavior_request(&token);
        request.reported_user = Some("192.168.0.1".to_string());

        // Resolution is exercised through validate; success is enough here,
        // the identity mapping itself is covered below.
        assert!(h.service.submit(&reporter("Alice"), request).await.is_ok());

        let identity = h
            .service
            .resolve_reported_user(Some("192.168.0.1"))
            .await;
        assert_eq!(
            identity,
            ReportedIdentity::Anonymous {
                ip: "192.168.0.1".to_string()
            }
        );

        let unresolved = h.service.resolve_reported_user(Some("Nobody")).await;
        assert_eq!(
            unresolved,
            ReportedIdentity::Unresolved {
                name: "Nobody".to_string()
            }
        );

        let known = h.service.resolve_reported_user(Some("Mallory")).await;
        assert_eq!(
            known,
            ReportedIdentity::Registered {
                name: "Mallory".to_string()
            }
        );
    }
}
