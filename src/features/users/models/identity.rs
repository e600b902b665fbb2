use serde::Serialize;

/// The reported party after resolution.
///
/// Unresolved lookups are tolerated at validation time; the business rules
/// downstream decide whether presence matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ReportedIdentity {
    /// A registered account, stored under its canonical name.
    Registered { name: String },
    /// An IP literal supplied directly by the reporter.
    Anonymous { ip: String },
    /// A name the directory could not resolve.
    Unresolved { name: String },
    /// The report names no specific user.
    None,
}

impl ReportedIdentity {
    /// Display form used in notifications and logs.
    pub fn display(&self) -> String {
        match self {
            ReportedIdentity::Registered { name } => name.clone(),
            ReportedIdentity::Anonymous { ip } => ip.clone(),
            ReportedIdentity::Unresolved { name } => name.clone(),
            ReportedIdentity::None => {
                crate::shared::messages::no_reported_user_placeholder().to_string()
            }
        }
    }
}

/// A page reference with an optional concrete revision. A missing revision
/// means the page has no revisions yet and the report targets the page
/// itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTarget {
    pub title: String,
    pub revision_id: Option<u64>,
}
