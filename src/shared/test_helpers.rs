#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};
#[cfg(test)]
use chrono::{Duration, Utc};

#[cfg(test)]
use crate::features::auth::{Reporter, ReporterAccount};

/// An eligible registered account: old enough, confirmed email, some edits,
/// no blocks.
#[cfg(test)]
pub fn account(name: &str) -> ReporterAccount {
    ReporterAccount {
        name: name.to_string(),
        email: Some(format!("{}@example.org", name.to_lowercase())),
        email_confirmed: true,
        edit_count: 25,
        registered_at: Utc::now() - Duration::days(365),
        blocked: false,
        temporary: false,
        authorized: true,
    }
}

#[cfg(test)]
async fn inject_reporter_middleware(mut request: Request, next: Next) -> Response {
    request
        .extensions_mut()
        .insert(Reporter::Named(account("Alice")));
    next.run(request).await
}

/// Wrap a router so every request carries an eligible named reporter,
/// standing in for the reporter-resolution middleware.
#[cfg(test)]
pub fn with_named_reporter(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_reporter_middleware))
}
