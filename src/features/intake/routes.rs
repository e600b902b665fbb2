use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};

use crate::core::error::AppError;
use crate::features::intake::handlers::{self, IntakeState};
use crate::features::intake::services::IntakeService;

/// Create routes for the intake feature
///
/// The reporter-resolution middleware must be applied by the caller.
pub fn routes(intake: Arc<IntakeService>) -> Router {
    let state = IntakeState { intake };

    Router::new()
        .route("/reportincident/v0/report", post(handlers::submit_report))
        .route_layer(middleware::from_fn_with_state(state.clone(), feature_gate))
        .with_state(state)
}

/// Answers like a missing route before the request body is read, so the flag
/// cannot be probed with malformed or over-length payloads.
async fn feature_gate(State(state): State<IntakeState>, req: Request, next: Next) -> Response {
    if !state.intake.enabled() {
        return AppError::FeatureDisabled.into_response();
    }
    next.run(req).await
}
