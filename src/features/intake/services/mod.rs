mod intake_service;
mod rate_limiter;
mod recorder;

pub use intake_service::{IntakeOutcome, IntakeService};
pub use rate_limiter::{FixedWindowRateLimiter, ReportRateLimiter};
pub use recorder::{LogRecorder, ReportRecorder};
