//! External collaborators the assessment pipeline talks to.
//!
//! Each contract is a trait so the pipeline can be driven by in-process
//! fakes in tests; the HTTP implementations share one `reqwest::Client`.

pub(crate) mod extraction;
pub(crate) mod geocoding;
pub(crate) mod search;
pub(crate) mod weather;

use async_trait::async_trait;

use crate::errors::UpstreamError;
use crate::geo::Coordinate;
use crate::models::CrimeIncident;

pub(crate) use extraction::{DisabledExtractor, HttpCrimeExtractor};
pub(crate) use geocoding::NominatimRepository;
pub(crate) use search::DuckDuckGoRepository;
pub(crate) use weather::OpenWeatherRepository;

/// Raw reverse-geocoding answer, before any validation.
#[derive(Debug, Default, Clone)]
pub(crate) struct ReverseGeocode {
    /// Suburb, city, state, country, in that order, missing parts skipped.
    pub address_parts: Vec<String>,
    pub bounding_box: Vec<f64>,
    pub place_type: Option<String>,
}

/// Raw current-weather reading; every field may be absent.
#[derive(Debug, Default, Clone)]
pub(crate) struct WeatherReading {
    pub temperature: Option<f64>,
    pub rainfall_last_hour: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    pub humidity: Option<f64>,
    pub condition_label: Option<String>,
    pub visibility_meters: Option<f64>,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct SearchResponse {
    pub related_topics: Vec<String>,
    pub abstract_text: Option<String>,
    pub results: Vec<String>,
}

#[async_trait]
pub(crate) trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, point: Coordinate) -> Result<ReverseGeocode, UpstreamError>;
}

#[async_trait]
pub(crate) trait WeatherProvider: Send + Sync {
    async fn current(&self, point: Coordinate) -> Result<WeatherReading, UpstreamError>;
}

#[async_trait]
pub(crate) trait TextSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResponse, UpstreamError>;
}

#[async_trait]
pub(crate) trait CrimeExtractor: Send + Sync {
    async fn extract(
        &self,
        corpus: &[String],
        context: Coordinate,
    ) -> Result<Vec<CrimeIncident>, UpstreamError>;
}

pub(crate) fn http_client(user_agent: &str) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(user_agent.to_string())
        .build()
        .unwrap_or_else(|err| {
            log::warn!("Falling back to default HTTP client: {err}");
            reqwest::Client::new()
        })
}

/// Sends a prepared request and decodes a JSON body, mapping non-2xx to `Status`.
pub(crate) async fn fetch_json<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, UpstreamError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::Status(status.as_u16()));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| UpstreamError::Parse(e.to_string()))
}
