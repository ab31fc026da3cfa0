use actix_web::{web, HttpResponse};

use crate::models::responses::HealthPayload;
use crate::response::ApiResponse;

/// Which optional collaborators were configured at startup.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Readiness {
    pub weather: bool,
    pub crime_extraction: bool,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses((status = 200, description = "Service is up; `status` is `degraded` when a collaborator is unconfigured", body = HealthPayload))
)]
pub(crate) async fn health(readiness: web::Data<Readiness>) -> HttpResponse {
    let status = if readiness.weather && readiness.crime_extraction { "ok" } else { "degraded" };
    ApiResponse::ok(HealthPayload {
        status: status.to_string(),
        weather_configured: readiness.weather,
        crime_extraction_configured: readiness.crime_extraction,
    })
}
