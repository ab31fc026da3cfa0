use actix_web::{web, HttpResponse, Result as ActixResult};
use validator::Validate;

use crate::assessment::RiskAssessor;
use crate::errors::AppError;
use crate::models::{EnvironmentalAssessment, PointQuery};
use crate::response::ApiResponse;

#[utoipa::path(
    get,
    path = "/environment",
    tag = "Risk Assessment",
    summary = "Environmental risk only",
    description = "Weather telemetry, landslide probability and the normalised environmental \
        risk index for a coordinate, without any crime signal.",
    params(
        ("lat" = f64, Query, description = "Latitude in decimal degrees", minimum = -90, maximum = 90),
        ("lon" = f64, Query, description = "Longitude in decimal degrees", minimum = -180, maximum = 180)
    ),
    responses(
        (status = 200, description = "Environmental assessment", body = EnvironmentalAssessment),
        (status = 400, description = "Invalid coordinates"),
        (status = 502, description = "Weather provider failed or timed out"),
        (status = 503, description = "Weather provider credential not configured")
    )
)]
pub(crate) async fn environment(
    assessor: web::Data<RiskAssessor>,
    query: web::Query<PointQuery>,
) -> ActixResult<HttpResponse> {
    query.validate().map_err(|e| {
        AppError::Validation(format!("Validation failed: {e}"))
    })?;

    let outcome = assessor.assess_environment(query.lat, query.lon).await?;
    Ok(ApiResponse::with_warnings(outcome.value, outcome.warnings))
}
