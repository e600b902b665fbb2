//! Permalink and link-phrase construction shared by the mailer and the
//! ticketing client.

use crate::features::intake::models::IncidentReport;
use crate::shared::constants::TOPIC_THREAD_PREFIX;
use crate::shared::messages::LinkOrigin;

/// Where the report was filed from, derived from the thread identifier.
/// A `h-` prefix denotes a topic heading; any other identifier a comment;
/// no identifier means the page itself.
pub fn link_origin(thread_id: Option<&str>) -> LinkOrigin {
    match thread_id {
        Some(id) if id.starts_with(TOPIC_THREAD_PREFIX) => LinkOrigin::Topic,
        Some(_) => LinkOrigin::Comment,
        None => LinkOrigin::Page,
    }
}

/// Permalink to the reported content: the revision when one exists, the page
/// otherwise, with the thread anchor appended when present.
pub fn permalink(base_url: &str, report: &IncidentReport) -> String {
    let mut url = match report.page.revision_id {
        Some(revision_id) if revision_id != 0 => {
            format!("{}/revisions/{}", base_url, revision_id)
        }
        _ => format!(
            "{}/pages/{}",
            base_url,
            urlencoding::encode(&report.page.title)
        ),
    };

    if let Some(thread_id) = &report.thread_id {
        url.push('#');
        url.push_str(thread_id);
    }

    url
}

/// Link the notification recipient can use to reply to the reporter.
pub fn reply_link(base_url: &str, reporting_user: &str) -> String {
    format!(
        "{}/users/{}/contact",
        base_url,
        urlencoding::encode(reporting_user)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::intake::models::{IncidentReport, IncidentType};
    use crate::features::users::models::{PageTarget, ReportedIdentity};

    fn report(revision_id: Option<u64>, thread_id: Option<&str>) -> IncidentReport {
        IncidentReport {
            reporting_user: "Alice".to_string(),
            reported_user: ReportedIdentity::None,
            page: PageTarget {
                title: "Main Page".to_string(),
                revision_id,
            },
            incident_type: IncidentType::ImmediateThreatPhysicalHarm,
            physical_harm_type: None,
            behavior_type: None,
            details: None,
            something_else_details: None,
            thread_id: thread_id.map(str::to_string),
        }
    }

    #[test]
    fn origin_follows_thread_identifier_shape() {
        assert_eq!(link_origin(Some("h-weather-2024")), LinkOrigin::Topic);
        assert_eq!(link_origin(Some("c-alice-1234")), LinkOrigin::Comment);
        assert_eq!(link_origin(None), LinkOrigin::Page);
    }

    #[test]
    fn permalink_prefers_the_revision() {
        let url = permalink("https://example.org", &report(Some(42), None));
        assert_eq!(url, "https://example.org/revisions/42");
    }

    #[test]
    fn permalink_falls_back_to_the_page_and_keeps_the_anchor() {
        let url = permalink("https://example.org", &report(None, Some("c-bob-9")));
        assert_eq!(url, "https://example.org/pages/Main%20Page#c-bob-9");
    }
}
