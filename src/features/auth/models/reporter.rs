use chrono::{DateTime, Utc};

/// The identity attached to an incoming request.
///
/// Authentication mechanics live upstream; this crate only consumes the
/// resolved identity. Anonymous requests still reach the intake pipeline so
/// the eligibility gate can answer them with the dedicated failure.
#[derive(Debug, Clone)]
pub enum Reporter {
    Anonymous { ip: String },
    Named(ReporterAccount),
}

impl Reporter {
    /// Display name used in logs and notifications.
    pub fn name(&self) -> &str {
        match self {
            Reporter::Anonymous { ip } => ip,
            Reporter::Named(account) => &account.name,
        }
    }

}

/// A registered account as the user directory knows it.
#[derive(Debug, Clone)]
pub struct ReporterAccount {
    pub name: String,
    pub email: Option<String>,
    pub email_confirmed: bool,
    pub edit_count: u32,
    pub registered_at: DateTime<Utc>,
    /// Any active block counts, including partial ones.
    pub blocked: bool,
    /// Temporary accounts are denied the report action; the denial is logged
    /// separately for observability.
    pub temporary: bool,
    /// High-level report-incident permission.
    pub authorized: bool,
}

impl ReporterAccount {
    pub fn account_age_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.registered_at).num_days()
    }
}
