use actix_web::{web, HttpResponse, Result as ActixResult};
use validator::Validate;

use crate::assessment::RiskAssessor;
use crate::errors::AppError;
use crate::models::{PointQuery, SafetyAssessment};
use crate::response::ApiResponse;

/// Hybrid safety assessment for a traveller at a coordinate.
#[utoipa::path(
    get,
    path = "/assess",
    tag = "Risk Assessment",
    summary = "Traveller safety assessment",
    description = "Fuses live weather, landslide susceptibility and recent crime reports into a \
        0-100 safety score (higher is safer), a risk tag and a list of hazards.\n\n\
        The location lookup, crime search and crime extraction degrade gracefully: when any of \
        them fails the assessment is still returned and the envelope's `warnings` say what was \
        missing. Weather is required; without it no score is produced.",
    params(
        ("lat" = f64, Query, description = "Latitude in decimal degrees", example = 31.1048, minimum = -90, maximum = 90),
        ("lon" = f64, Query, description = "Longitude in decimal degrees", example = 77.1734, minimum = -180, maximum = 180)
    ),
    responses(
        (status = 200, description = "Safety assessment", body = SafetyAssessment),
        (status = 400, description = "Invalid or out-of-range coordinates"),
        (status = 502, description = "Weather provider failed or timed out"),
        (status = 503, description = "Weather provider credential not configured")
    )
)]
pub(crate) async fn assess(
    assessor: web::Data<RiskAssessor>,
    query: web::Query<PointQuery>,
) -> ActixResult<HttpResponse> {
    query.validate().map_err(|e| {
        AppError::Validation(format!("Validation failed: {e}"))
    })?;

    let outcome = assessor.assess_risk(query.lat, query.lon).await?;
    Ok(ApiResponse::with_warnings(outcome.value, outcome.warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::pipeline::tests::{assessor, clear_weather, robbery, shimla_geocode, snippets};
    use crate::repositories::fakes::{FakeExtractor, FakeGeocoder, FakeWeather};
    use actix_web::{http::StatusCode, test, App};

    fn app_data(weather: FakeWeather) -> web::Data<RiskAssessor> {
        web::Data::new(assessor(
            FakeGeocoder(Ok(shimla_geocode())),
            weather,
            snippets(),
            FakeExtractor::returning(vec![robbery()]),
        ))
    }

    #[actix_web::test]
    async fn returns_assessment_envelope() {
        let app = test::init_service(
            App::new()
                .app_data(app_data(FakeWeather::Reading(clear_weather())))
                .route("/assess", web::get().to(assess)),
        )
        .await;
        let req = test::TestRequest::get().uri("/assess?lat=31.1048&lon=77.1734").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["code"], 200);
        assert_eq!(body["payload"]["locationName"], "Shimla, Himachal Pradesh, India");
        assert_eq!(body["payload"]["boundingBox"].as_array().map(Vec::len), Some(4));
        assert!(body["payload"]["riskTag"].is_string());
        assert_eq!(body["payload"]["crimeHotspots"][0]["crime_type"], "robbery");
        assert!(body.get("warnings").is_none());
    }

    #[actix_web::test]
    async fn rejects_out_of_range_latitude() {
        let app = test::init_service(
            App::new()
                .app_data(app_data(FakeWeather::Reading(clear_weather())))
                .route("/assess", web::get().to(assess)),
        )
        .await;
        let req = test::TestRequest::get().uri("/assess?lat=91&lon=0").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn missing_weather_key_is_service_unavailable() {
        let app = test::init_service(
            App::new()
                .app_data(app_data(FakeWeather::MissingKey))
                .route("/assess", web::get().to(assess)),
        )
        .await;
        let req = test::TestRequest::get().uri("/assess?lat=31.1&lon=77.1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
