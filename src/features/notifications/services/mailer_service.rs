use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use minijinja::{context, Environment};

use crate::core::config::MailerConfig;
use crate::features::intake::models::IncidentReport;
use crate::features::notifications::services::links;
use crate::features::notifications::services::notifier::{
    IncidentNotifier, NotifyError, RenderedNotification,
};
use crate::shared::constants::BEHAVIOR_SOMETHING_ELSE;
use crate::shared::messages;

/// Email body template, compiled in so the notifier cannot lose its template
/// at runtime.
const BODY_TEMPLATE: &str = include_str!("../../../../templates/emails/incident_report.jinja");
const TEMPLATE_NAME: &str = "incident_report";

/// Email notifier for immediate-threat reports.
pub struct Mailer {
    config: MailerConfig,
    base_url: String,
    /// Developer mode composes but never hands the message to the transport.
    developer_mode: bool,
    env: Environment<'static>,
}

impl Mailer {
    pub fn new(config: MailerConfig, base_url: String, developer_mode: bool) -> Self {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, BODY_TEMPLATE)
            .expect("email template must parse");

        Self {
            config,
            base_url,
            developer_mode,
            env,
        }
    }

    fn subject(&self, report: &IncidentReport) -> String {
        format!(
            "Immediate threat reported regarding {}",
            report.reported_user.display()
        )
    }

    fn body(&self, report: &IncidentReport) -> Result<String, NotifyError> {
        let origin = links::link_origin(report.thread_id.as_deref());
        let behaviors = rendered_behaviors(
            &report.behaviors(),
            report.something_else_details.as_deref(),
        );

        let template = self
            .env
            .get_template(TEMPLATE_NAME)
            .map_err(|e| NotifyError::Config(format!("email template missing: {}", e)))?;

        template
            .render(context! {
                reporting_user => report.reporting_user,
                reported_user => report.reported_user.display(),
                link_prefix => messages::link_prefix_phrase(origin),
                permalink => links::permalink(&self.base_url, report),
                behaviors => behaviors,
                details => report.details,
                reply_link => links::reply_link(&self.base_url, &report.reporting_user),
            })
            .map_err(|e| NotifyError::Config(format!("email template render failed: {}", e)))
    }

    async fn deliver(
        &self,
        from_address: &str,
        rendered: &RenderedNotification,
    ) -> Result<(), NotifyError> {
        let from = from_address
            .parse()
            .map_err(|e| NotifyError::Config(format!("invalid from address: {}", e)))?;

        let mut builder = Message::builder().from(from).subject(&rendered.subject);
        for recipient in &rendered.to {
            let mailbox = recipient
                .parse()
                .map_err(|e| NotifyError::Config(format!("invalid recipient: {}", e)))?;
            builder = builder.to(mailbox);
        }

        let message = builder
            .body(rendered.body.clone())
            .map_err(|e| NotifyError::Config(format!("could not build message: {}", e)))?;

        let transport: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
                .map_err(|e| NotifyError::Config(format!("invalid SMTP host: {}", e)))?
                .credentials(Credentials::new(
                    self.config.smtp_username.clone(),
                    self.config.smtp_password.clone(),
                ))
                .build();

        transport.send(message).await.map_err(|e| {
            tracing::error!("SMTP delivery failed: {}", e);
            NotifyError::Delivery(format!("SMTP delivery failed: {}", e))
        })?;

        Ok(())
    }
}

#[async_trait]
impl IncidentNotifier for Mailer {
    async fn notify(&self, report: &IncidentReport) -> Result<RenderedNotification, NotifyError> {
        // Missing configuration fails locally, before any network call, and
        // distinctly from a remote delivery failure.
        if self.config.recipients.is_empty() {
            tracing::error!("mailer has no configured recipients");
            return Err(NotifyError::Config("no recipients configured".to_string()));
        }
        let from_address = match &self.config.from_address {
            Some(address) => address,
            None => {
                tracing::error!("mailer has no configured from address");
                return Err(NotifyError::Config(
                    "no from address configured".to_string(),
                ));
            }
        };

        let rendered = RenderedNotification {
            to: self.config.recipients.clone(),
            subject: self.subject(report),
            body: self.body(report)?,
        };

        if !self.developer_mode {
            self.deliver(from_address, &rendered).await?;
        }

        Ok(rendered)
    }
}

/// Display labels for a behavior list, with the "something else" entry
/// replaced in place by its free-text elaboration.
pub fn rendered_behaviors(behaviors: &[String], something_else: Option<&str>) -> Vec<String> {
    behaviors
        .iter()
        .map(|behavior| {
            if behavior == BEHAVIOR_SOMETHING_ELSE {
                match something_else {
                    Some(text) => messages::something_else_elaboration(text),
                    None => messages::behavior_label(behavior),
                }
            } else {
                messages::behavior_label(behavior)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::intake::models::{IncidentType, PhysicalHarmType};
    use crate::features::users::models::{PageTarget, ReportedIdentity};

    fn threat_report() -> IncidentReport {
        IncidentReport {
            reporting_user: "Alice".to_string(),
            reported_user: ReportedIdentity::Registered {
                name: "Mallory".to_string(),
            },
            page: PageTarget {
                title: "Weather".to_string(),
                revision_id: Some(42),
            },
            incident_type: IncidentType::ImmediateThreatPhysicalHarm,
            physical_harm_type: Some(PhysicalHarmType::PhysicalHarm),
            behavior_type: None,
            details: Some("Threatening messages".to_string()),
            something_else_details: None,
            thread_id: Some("c-mallory-99".to_string()),
        }
    }

    fn mailer(recipients: Vec<&str>, from: Option<&str>) -> Mailer {
        Mailer::new(
            MailerConfig {
                smtp_host: "localhost".to_string(),
                smtp_username: String::new(),
                smtp_password: String::new(),
                from_address: from.map(str::to_string),
                recipients: recipients.into_iter().map(str::to_string).collect(),
            },
            "https://example.org".to_string(),
            true,
        )
    }

    #[test]
    fn something_else_entry_is_replaced_in_place() {
        let behaviors = vec!["something-else".to_string(), "foo".to_string()];
        let rendered = rendered_behaviors(&behaviors, Some("X"));

        assert_eq!(rendered.len(), 2);
        assert!(rendered[0].contains("X"));
        assert_eq!(rendered[1], "foo");
    }

    #[tokio::test]
    async fn missing_recipients_fail_locally() {
        let mailer = mailer(vec![], Some("safety@example.org"));
        let err = mailer.notify(&threat_report()).await.unwrap_err();
        assert!(matches!(err, NotifyError::Config(_)));
    }

    #[tokio::test]
    async fn missing_from_address_fails_locally() {
        let mailer = mailer(vec!["safety@example.org"], None);
        let err = mailer.notify(&threat_report()).await.unwrap_err();
        assert!(matches!(err, NotifyError::Config(_)));
    }

    #[tokio::test]
    async fn developer_mode_composes_without_delivering() {
        let mailer = mailer(vec!["safety@example.org"], Some("noreply@example.org"));
        let rendered = mailer.notify(&threat_report()).await.unwrap();

        assert_eq!(rendered.to, vec!["safety@example.org".to_string()]);
        assert!(rendered.subject.contains("Mallory"));
        assert!(rendered.body.contains("Reported comment:"));
        assert!(rendered
            .body
            .contains("https://example.org/revisions/42#c-mallory-99"));
        assert!(rendered.body.contains("Threatening messages"));
        assert!(rendered.body.contains("/users/Alice/contact"));
    }
}
