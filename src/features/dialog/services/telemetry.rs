use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

/// One logical dialog event: step transitions, help-link clicks, close,
/// error display.
#[derive(Debug, Clone)]
pub struct FunnelEvent {
    pub name: String,
    pub context: HashMap<String, String>,
    /// Correlates all events of one reporting attempt.
    pub funnel_token: Option<String>,
}

/// Telemetry sink capability. Recording is fire-and-forget: implementations
/// swallow their own failures and never influence the dialog.
pub trait TelemetrySink: Send + Sync {
    fn record(&self, event: FunnelEvent);
}

/// Sink that writes events to the log.
#[derive(Default)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
    fn record(&self, event: FunnelEvent) {
        tracing::debug!(
            name = %event.name,
            funnel_token = ?event.funnel_token,
            context = ?event.context,
            "dialog event"
        );
    }
}

/// Dialog instrumentation. Disabled entirely unless the capability flag says
/// otherwise; the funnel token is generated lazily on the first event of an
/// attempt and cleared on submit or reset.
pub struct Instrumentation {
    enabled: bool,
    sink: Arc<dyn TelemetrySink>,
    funnel_token: Mutex<Option<String>>,
}

impl Instrumentation {
    pub fn new(enabled: bool, sink: Arc<dyn TelemetrySink>) -> Self {
        Self {
            enabled,
            sink,
            funnel_token: Mutex::new(None),
        }
    }

    /// Disabled instrumentation for contexts that do not log.
    pub fn disabled() -> Self {
        Self::new(false, Arc::new(TracingSink))
    }

    pub fn log_event(&self, name: &str, context: HashMap<String, String>) {
        if !self.enabled {
            return;
        }
        let token = {
            let mut guard = self.funnel_token.lock().expect("funnel token lock poisoned");
            guard
                .get_or_insert_with(|| Uuid::new_v4().to_string())
                .clone()
        };
        self.sink.record(FunnelEvent {
            name: name.to_string(),
            context,
            funnel_token: Some(token),
        });
    }

    /// Current token, if one was generated.
    pub fn funnel_token(&self) -> Option<String> {
        self.funnel_token
            .lock()
            .expect("funnel token lock poisoned")
            .clone()
    }

    pub fn clear_funnel_token(&self) {
        self.funnel_token
            .lock()
            .expect("funnel token lock poisoned")
            .take();
    }
}
