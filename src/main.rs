mod assessment;
mod config;
mod errors;
mod geo;
mod models;
mod repositories;
mod response;
mod routes;
mod validation;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use utoipa::openapi::Server;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::assessment::RiskAssessor;
use crate::config::API_PREFIX;
use crate::routes::health::Readiness;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SafeZone API",
        description = "Traveller safety scoring for a coordinate.\n\n\
            Combines live weather telemetry, a landslide susceptibility model and recent crime \
            reports gathered from web search into a 0-100 safety score, a risk tag and a list of \
            explainable hazards.\n\n\
            Data sources: OpenWeatherMap, OpenStreetMap Nominatim, DuckDuckGo instant answers.",
        version = "1.0.0"
    ),
    paths(
        routes::health::health,
        routes::assess::assess,
        routes::environment::environment,
        routes::crime::crime_signals,
    ),
    components(schemas(
        models::PointQuery, models::CrimeSignalQuery,
        models::HealthPayload, models::SafetyAssessment, models::RiskTag,
        models::EnvironmentalAssessment, models::WeatherSnapshot, models::RiskWeights,
        models::CrimeIncident, models::Severity,
        models::EnvironmentalHazard, models::HazardKind, models::HazardSeverity,
        models::CrimeSignalsPayload,
    )),
    tags(
        (name = "System", description = "Health and status"),
        (name = "Risk Assessment", description = "Hybrid environmental and crime risk scoring"),
        (name = "Crime Signals", description = "Crime-related search corpus"),
    )
)]
struct ApiDoc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();
    let cfg = config::Config::from_env();

    let assessor = web::Data::new(RiskAssessor::from_config(&cfg));
    let readiness = web::Data::new(Readiness {
        weather: cfg.weather_api_key.is_some(),
        crime_extraction: cfg.extraction_url.is_some(),
    });
    log::info!(
        "Collaborator timeouts: geocode {:?}, weather {:?}, search {:?}, extraction {:?}",
        cfg.timeouts.geocode,
        cfg.timeouts.weather,
        cfg.timeouts.search,
        cfg.timeouts.extraction
    );

    let bind = format!("{}:{}", cfg.host, cfg.port);
    log::info!("Starting SafeZone API on {bind}");
    log::info!("Swagger UI: http://{bind}{API_PREFIX}/docs/");

    let mut openapi = ApiDoc::openapi();
    openapi.servers = Some(vec![Server::new(API_PREFIX)]);

    let openapi_url: &'static str = Box::leak(format!("{API_PREFIX}/openapi.json").into_boxed_str());
    let docs_path: &'static str = Box::leak(format!("{API_PREFIX}/docs/{{_:.*}}").into_boxed_str());
    let health_path = format!("{API_PREFIX}/health");

    HttpServer::new(move || {
        App::new()
            .wrap(
                Logger::new(r#"%a "%r" %s %b %Dms "%{User-Agent}i""#)
                    .exclude(health_path.clone()),
            )
            .wrap(Cors::permissive())
            .app_data(assessor.clone())
            .app_data(readiness.clone())
            .service(SwaggerUi::new(docs_path).url(openapi_url, openapi.clone()))
            .service(web::scope(API_PREFIX).configure(routes::configure_routes))
    })
    .bind(&bind)?
    .run()
    .await
}
