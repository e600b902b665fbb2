use utoipa::{Modify, OpenApi};

use crate::features::intake::dtos as intake_dtos;
use crate::features::intake::handlers as intake_handlers;
use crate::features::intake::models as intake_models;
use crate::shared::types::ErrorBody;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Incident reporting
        intake_handlers::submit_report,
    ),
    components(schemas(
        intake_dtos::ReportRequest,
        intake_dtos::ReportResponseDto,
        intake_dtos::SentEmailDto,
        intake_models::IncidentType,
        intake_models::PhysicalHarmType,
        ErrorBody,
    )),
    tags(
        (name = "incident-reporting", description = "Incident report intake")
    )
)]
pub struct ApiDoc;

/// Overrides the OpenAPI info block with values from configuration.
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
