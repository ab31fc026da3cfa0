use async_trait::async_trait;
use serde::Deserialize;

use super::{fetch_json, WeatherProvider, WeatherReading};
use crate::errors::UpstreamError;
use crate::geo::Coordinate;

/// Current conditions from the OpenWeatherMap 2.5 API (metric units).
pub(crate) struct OpenWeatherRepository {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    main: Option<OwmMain>,
    wind: Option<OwmWind>,
    #[serde(default)]
    weather: Vec<OwmCondition>,
    visibility: Option<f64>,
    rain: Option<OwmRain>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    main: Option<String>,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

impl OpenWeatherRepository {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// OWM reports heavy rain as `Rain` with an intensity in the description.
    fn condition_label(condition: &OwmCondition) -> Option<String> {
        let main = condition.main.as_deref()?;
        if main == "Rain" && condition.description.to_ascii_lowercase().contains("heavy") {
            return Some("Heavy Rain".to_string());
        }
        Some(main.to_string())
    }

    fn into_reading(raw: OwmResponse) -> WeatherReading {
        let (temperature, humidity) = raw
            .main
            .map_or((None, None), |m| (m.temp, m.humidity));
        WeatherReading {
            temperature,
            rainfall_last_hour: raw.rain.and_then(|r| r.one_hour),
            wind_speed_ms: raw.wind.and_then(|w| w.speed),
            humidity,
            condition_label: raw.weather.first().and_then(Self::condition_label),
            visibility_meters: raw.visibility,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherRepository {
    async fn current(&self, point: Coordinate) -> Result<WeatherReading, UpstreamError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(UpstreamError::MissingCredential("OPENWEATHERMAP_API_KEY"))?;

        let request = self
            .client
            .get(format!("{}/data/2.5/weather", self.base_url))
            .query(&[
                ("lat", point.lat.to_string()),
                ("lon", point.lon.to_string()),
                ("appid", api_key.to_string()),
                ("units", "metric".to_string()),
            ]);
        let raw: OwmResponse = fetch_json(request).await?;
        Ok(Self::into_reading(raw))
    }
}
