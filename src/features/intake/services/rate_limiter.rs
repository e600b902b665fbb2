use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::core::config::RateLimitConfig;

/// Rate-limit capability. The pipeline increments exactly once per
/// authorized attempt, strictly after validation, so invalid submissions
/// never consume budget.
#[async_trait]
pub trait ReportRateLimiter: Send + Sync {
    /// Returns false when the reporter has exhausted the window's budget.
    async fn try_acquire(&self, reporter_name: &str) -> bool;
}

/// Fixed-window in-memory limiter keyed by reporter name.
pub struct FixedWindowRateLimiter {
    max_reports: u32,
    window: Duration,
    windows: Mutex<HashMap<String, (Instant, u32)>>,
}

impl FixedWindowRateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            max_reports: config.max_reports,
            window: Duration::from_secs(config.window_secs),
            windows: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ReportRateLimiter for FixedWindowRateLimiter {
    async fn try_acquire(&self, reporter_name: &str) -> bool {
        let mut windows = self.windows.lock().expect("rate limiter lock poisoned");
        let now = Instant::now();

        let entry = windows
            .entry(reporter_name.to_string())
            .or_insert((now, 0));

        if now.duration_since(entry.0) >= self.window {
            *entry = (now, 0);
        }

        if entry.1 >= self.max_reports {
            return false;
        }

        entry.1 += 1;
        true
    }
}
