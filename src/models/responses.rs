use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::geo::BoundingBox;

#[derive(Serialize, ToSchema)]
pub struct HealthPayload {
    pub status: String,
    pub weather_configured: bool,
    pub crime_extraction_configured: bool,
}

/// Main weather condition label as reported by the weather provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Drizzle,
    Rain,
    HeavyRain,
    Thunderstorm,
    Snow,
    Fog,
    Mist,
    Haze,
    Squall,
    Tornado,
    Other(String),
}

impl WeatherCondition {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Clear" => Self::Clear,
            "Clouds" => Self::Clouds,
            "Drizzle" => Self::Drizzle,
            "Rain" => Self::Rain,
            "Heavy Rain" => Self::HeavyRain,
            "Thunderstorm" => Self::Thunderstorm,
            "Snow" => Self::Snow,
            "Fog" => Self::Fog,
            "Mist" => Self::Mist,
            "Haze" => Self::Haze,
            "Squall" => Self::Squall,
            "Tornado" => Self::Tornado,
            "" => Self::Clear,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Clear => "Clear",
            Self::Clouds => "Clouds",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Thunderstorm => "Thunderstorm",
            Self::Snow => "Snow",
            Self::Fog => "Fog",
            Self::Mist => "Mist",
            Self::Haze => "Haze",
            Self::Squall => "Squall",
            Self::Tornado => "Tornado",
            Self::Other(label) => label,
        }
    }

    /// Conditions that floor the weather sub-risk at 80.
    pub fn is_severe_alert(&self) -> bool {
        matches!(self, Self::Thunderstorm | Self::Tornado | Self::Squall)
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<WeatherCondition> for String {
    fn from(c: WeatherCondition) -> Self {
        c.label().to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub rainfall_mm: f64,
    pub wind_speed_kmh: f64,
    pub humidity: f64,
    #[schema(value_type = String, example = "Rain")]
    pub condition: WeatherCondition,
    pub visibility_km: f64,
}

/// Share of the fused score given to each risk family.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, ToSchema)]
pub struct RiskWeights {
    pub weather: f64,
    pub slide: f64,
    pub crime: f64,
}

impl RiskWeights {
    pub const URBAN: Self = Self { weather: 0.40, slide: 0.20, crime: 0.40 };
    pub const RURAL: Self = Self { weather: 0.40, slide: 0.35, crime: 0.25 };

    pub fn for_area(is_urban: bool) -> Self {
        if is_urban {
            Self::URBAN
        } else {
            Self::RURAL
        }
    }
}

#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalAssessment {
    pub location_name: String,
    #[schema(value_type = Vec<f64>)]
    pub bounding_box: BoundingBox,
    pub weather: WeatherSnapshot,
    pub landslide_probability: f64,
    pub raw_risk_index: f64,
    pub is_urban: bool,
    pub weights: RiskWeights,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CrimeIncident {
    #[serde(default)]
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub crime_type: String,
    pub severity: Severity,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub time_estimate: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HazardKind {
    Landslide,
    Weather,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HazardSeverity {
    Medium,
    High,
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct EnvironmentalHazard {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "type")]
    pub kind: HazardKind,
    pub title: String,
    pub description: String,
    pub severity: HazardSeverity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub enum RiskTag {
    #[serde(rename = "safe")]
    Safe,
    #[serde(rename = "moderate")]
    Moderate,
    #[serde(rename = "high risk")]
    HighRisk,
}

impl RiskTag {
    /// 0-40 high risk, 41-70 moderate, 71-100 safe. A fractional score
    /// between two bands (40.5, 70.2) takes the upper one.
    pub fn from_score(score: f64) -> Self {
        if score <= 40.0 {
            Self::HighRisk
        } else if score <= 70.0 {
            Self::Moderate
        } else {
            Self::Safe
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Moderate => "moderate",
            Self::HighRisk => "high risk",
        }
    }
}

#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SafetyAssessment {
    pub location_name: String,
    #[schema(value_type = Vec<f64>)]
    pub bounding_box: BoundingBox,
    pub safety_score: f64,
    pub risk_tag: RiskTag,
    pub justification: String,
    pub crime_hotspots: Vec<CrimeIncident>,
    pub environmental_hazards: Vec<EnvironmentalHazard>,
}

#[derive(Serialize, ToSchema)]
pub struct CrimeSignalsPayload {
    pub location: String,
    pub queries: usize,
    pub failed_queries: usize,
    pub corpus: Vec<String>,
}
