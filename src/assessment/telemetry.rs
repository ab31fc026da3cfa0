use std::time::Duration;

use super::bounded;
use crate::errors::AppError;
use crate::geo::Coordinate;
use crate::models::{WeatherCondition, WeatherSnapshot};
use crate::repositories::{WeatherProvider, WeatherReading};
use crate::validation::sanitize_reading;

const DEFAULT_TEMPERATURE_C: f64 = 20.0;
const DEFAULT_HUMIDITY: f64 = 80.0;
const DEFAULT_VISIBILITY_M: f64 = 10_000.0;
const MS_TO_KMH: f64 = 3.6;

/// Fills gaps in a provider reading and converts to the units the scorer expects.
pub(crate) fn snapshot_from(reading: WeatherReading) -> WeatherSnapshot {
    let temperature = sanitize_reading(
        reading.temperature.unwrap_or(DEFAULT_TEMPERATURE_C),
        -90.0,
        60.0,
        DEFAULT_TEMPERATURE_C,
    );
    let rainfall_mm = sanitize_reading(reading.rainfall_last_hour.unwrap_or(0.0), 0.0, f64::MAX, 0.0);
    let wind_ms = sanitize_reading(reading.wind_speed_ms.unwrap_or(0.0), 0.0, f64::MAX, 0.0);
    let humidity = sanitize_reading(
        reading.humidity.unwrap_or(DEFAULT_HUMIDITY),
        0.0,
        100.0,
        DEFAULT_HUMIDITY,
    );
    let visibility_m = sanitize_reading(
        reading.visibility_meters.unwrap_or(DEFAULT_VISIBILITY_M),
        0.0,
        f64::MAX,
        DEFAULT_VISIBILITY_M,
    );
    let condition = reading
        .condition_label
        .as_deref()
        .map(WeatherCondition::from_label)
        .unwrap_or(WeatherCondition::Clear);

    WeatherSnapshot {
        temperature,
        rainfall_mm,
        wind_speed_kmh: wind_ms * MS_TO_KMH,
        humidity,
        condition,
        visibility_km: visibility_m / 1000.0,
    }
}

/// Current weather at `point`. Unlike the geocoder this has no fallback:
/// a missing credential, upstream failure or timeout fails the request.
pub(crate) async fn fetch(
    provider: &dyn WeatherProvider,
    point: Coordinate,
    limit: Duration,
) -> Result<WeatherSnapshot, AppError> {
    let reading = bounded(limit, provider.current(point)).await.map_err(|err| {
        log::error!("Weather fetch failed for {},{}: {err}", point.lat, point.lon);
        AppError::from(err)
    })?;
    Ok(snapshot_from(reading))
}
