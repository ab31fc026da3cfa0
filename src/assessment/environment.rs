//! Environmental sub-risks: weather and landslide, normalised to a 0-100 index.
//!
//! Everything here is a pure function of its inputs. Each sub-risk runs a raw
//! measurement through a logistic curve centred on the level where it starts
//! to matter for someone on foot, so small readings contribute almost nothing
//! and extreme readings saturate instead of running away.

use crate::geo::{landslide_zone, Coordinate};
use crate::models::{RiskWeights, WeatherSnapshot};

const PRONE_SUSCEPTIBILITY: f64 = 0.25;
const BASELINE_SUSCEPTIBILITY: f64 = 0.02;
const SEVERE_ALERT_FLOOR: f64 = 80.0;

#[inline]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[inline]
pub fn clip(lo: f64, v: f64, hi: f64) -> f64 {
    lo.max(v.min(hi))
}

#[inline]
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Per-factor weather risks on a 0-100 scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeatherRisk {
    pub rain: f64,
    pub wind: f64,
    pub visibility: f64,
    pub temperature: f64,
    pub combined: f64,
}

impl WeatherRisk {
    pub fn of(weather: &WeatherSnapshot) -> Self {
        let rain = 100.0 * sigmoid(0.15 * (weather.rainfall_mm - 20.0));
        let wind = 100.0 * sigmoid(0.15 * (weather.wind_speed_kmh - 35.0));
        let visibility = 100.0 * sigmoid(0.8 * (4.0 - weather.visibility_km));

        // Degrees outside the 16-32 °C comfort band.
        let temp_dev = 0.0_f64
            .max(16.0 - weather.temperature)
            .max(weather.temperature - 32.0);
        let temperature = 100.0 * sigmoid(0.25 * (temp_dev - 6.0));

        let mut combined = clip(
            0.0,
            0.5 * rain + 0.3 * wind + 0.15 * visibility + 0.05 * temperature,
            100.0,
        );
        if weather.condition.is_severe_alert() {
            combined = combined.max(SEVERE_ALERT_FLOOR);
        }

        Self { rain, wind, visibility, temperature, combined }
    }
}

/// Probability of a slide at `point` given the last hour of rain.
pub fn landslide_probability(point: Coordinate, rainfall_mm: f64) -> f64 {
    let base = match landslide_zone(point) {
        Some(zone) => {
            log::debug!("{},{} lies in landslide zone {}", point.lat, point.lon, zone.name);
            PRONE_SUSCEPTIBILITY
        }
        None => BASELINE_SUSCEPTIBILITY,
    };
    let rain_index = sigmoid(0.12 * (rainfall_mm - 15.0));
    clip(0.0, base * (1.0 + 0.8 * rain_index), 1.0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvironmentalScore {
    /// Weather and landslide risk, renormalised over their weights, 0-100, 2 decimals.
    pub raw_risk_index: f64,
    pub landslide_probability: f64,
    pub weather: WeatherRisk,
    pub weights: RiskWeights,
}

pub fn score(weather: &WeatherSnapshot, point: Coordinate, is_urban: bool) -> EnvironmentalScore {
    let weather_risk = WeatherRisk::of(weather);
    let landslide_probability = landslide_probability(point, weather.rainfall_mm);
    let slide_risk = 100.0 * landslide_probability;

    let weights = RiskWeights::for_area(is_urban);
    let index = weights.weather * (weather_risk.combined / 100.0)
        + weights.slide * (slide_risk / 100.0);
    let raw_risk_index = round2(clip(
        0.0,
        index / (weights.weather + weights.slide) * 100.0,
        100.0,
    ));

    EnvironmentalScore {
        raw_risk_index,
        landslide_probability,
        weather: weather_risk,
        weights,
    }
}
