mod identity;

pub use identity::{PageTarget, ReportedIdentity};
