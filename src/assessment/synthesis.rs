//! Fusion of environmental and crime risk into the final safety assessment.

use super::environment::clip;
use crate::geo::Coordinate;
use crate::models::{
    CrimeIncident, EnvironmentalAssessment, EnvironmentalHazard, HazardKind, HazardSeverity,
    RiskTag, SafetyAssessment, Severity, WeatherCondition,
};

const LANDSLIDE_HAZARD_THRESHOLD: f64 = 0.6;
const LANDSLIDE_HIGH_THRESHOLD: f64 = 0.8;

/// What the crime side of the pipeline produced.
#[derive(Clone, Debug)]
pub(crate) enum CrimeEvidence {
    /// Search or extraction could not run; the reason ends up in the justification.
    Unavailable(String),
    Reported(Vec<CrimeIncident>),
}

#[inline]
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub(crate) fn base_weight(severity: Severity) -> f64 {
    match severity {
        Severity::Low => 20.0,
        Severity::Medium => 50.0,
        Severity::High => 90.0,
    }
}

/// Most severe incident sets the level; every further incident adds with
/// diminishing returns (10 · log2(1 + extra)).
pub(crate) fn crime_risk(incidents: &[CrimeIncident]) -> f64 {
    let Some(worst) = incidents
        .iter()
        .map(|i| base_weight(i.severity))
        .max_by(f64::total_cmp)
    else {
        return 0.0;
    };
    let extra = (incidents.len() - 1) as f64;
    clip(0.0, worst + 10.0 * (1.0 + extra).log2(), 100.0)
}

pub(crate) fn hazards(
    point: Coordinate,
    landslide_probability: f64,
    condition: &WeatherCondition,
) -> Vec<EnvironmentalHazard> {
    let mut out = Vec::new();

    if landslide_probability > LANDSLIDE_HAZARD_THRESHOLD {
        out.push(EnvironmentalHazard {
            id: format!("landslide-{:.4}-{:.4}", point.lat, point.lon),
            lat: point.lat,
            lon: point.lon,
            kind: HazardKind::Landslide,
            title: "Landslide Warning".to_string(),
            description: format!(
                "Landslide probability is {:.0}% given recent rainfall and local terrain. \
                 Avoid steep slopes and hill roads.",
                landslide_probability * 100.0
            ),
            severity: if landslide_probability > LANDSLIDE_HIGH_THRESHOLD {
                HazardSeverity::High
            } else {
                HazardSeverity::Medium
            },
        });
    }

    let weather = match condition {
        WeatherCondition::Thunderstorm => Some((
            "Thunderstorm Alert",
            "Active thunderstorm nearby. Seek shelter and avoid open ground.",
            HazardSeverity::High,
        )),
        WeatherCondition::HeavyRain => Some((
            "Heavy Rain Warning",
            "Heavy rain may cause waterlogging and flash flooding.",
            HazardSeverity::Medium,
        )),
        WeatherCondition::Fog => Some((
            "Dense Fog Advisory",
            "Fog is reducing visibility. Take care on roads.",
            HazardSeverity::Medium,
        )),
        _ => None,
    };
    if let Some((title, description, severity)) = weather {
        out.push(EnvironmentalHazard {
            id: format!("weather-{:.4}-{:.4}", point.lat, point.lon),
            lat: point.lat,
            lon: point.lon,
            kind: HazardKind::Weather,
            title: title.to_string(),
            description: description.to_string(),
            severity,
        });
    }

    out
}

fn environmental_trigger(env: &EnvironmentalAssessment) -> String {
    let w = &env.weather;
    let p = env.landslide_probability;
    if p > LANDSLIDE_HAZARD_THRESHOLD {
        format!("a landslide probability of {:.0}%", p * 100.0)
    } else if w.condition.is_severe_alert()
        || matches!(w.condition, WeatherCondition::HeavyRain | WeatherCondition::Fog)
    {
        format!("{} conditions", w.condition)
    } else if w.rainfall_mm >= 10.0 {
        format!("heavy rainfall of {:.1} mm in the last hour", w.rainfall_mm)
    } else if w.visibility_km < 4.0 {
        format!("visibility down to {:.1} km", w.visibility_km)
    } else if w.wind_speed_kmh >= 35.0 {
        format!("winds of {:.0} km/h", w.wind_speed_kmh)
    } else if p >= 0.2 {
        format!("landslide-prone terrain ({:.0}% slide probability)", p * 100.0)
    } else {
        format!("{}, {:.1} mm of rain in the last hour", w.condition, w.rainfall_mm)
    }
}

fn crime_trigger(incidents: &[CrimeIncident]) -> String {
    let count = incidents.len();
    let plural = if count == 1 { "" } else { "s" };
    match incidents.iter().max_by_key(|i| i.severity) {
        Some(worst) => format!(
            "{count} recent crime report{plural}, the most severe a {}-severity {}",
            worst.severity.as_str(),
            worst.crime_type
        ),
        None => "no recent crime reports".to_string(),
    }
}

fn level(raw_risk_index: f64) -> &'static str {
    if raw_risk_index < 20.0 {
        "Low"
    } else if raw_risk_index < 50.0 {
        "Moderate"
    } else {
        "High"
    }
}

fn justify(
    env: &EnvironmentalAssessment,
    evidence: &CrimeEvidence,
    env_share: f64,
    crime_share: f64,
) -> String {
    let trigger = environmental_trigger(env);
    let level = level(env.raw_risk_index);
    match evidence {
        CrimeEvidence::Unavailable(reason) => format!(
            "Crime data was unavailable ({reason}), so this score reflects environmental \
             conditions only: {} environmental risk ({trigger}).",
            level.to_ascii_lowercase()
        ),
        CrimeEvidence::Reported(incidents) if incidents.is_empty() => format!(
            "{level} environmental risk ({trigger}); no recent crime reports were found."
        ),
        CrimeEvidence::Reported(incidents) if crime_share > env_share => {
            let crime = crime_trigger(incidents);
            if env.raw_risk_index < 20.0 {
                format!("Risk is driven mainly by {crime}, despite calm environmental conditions.")
            } else {
                format!("Risk is driven mainly by {crime}, compounded by {trigger}.")
            }
        }
        CrimeEvidence::Reported(incidents) => format!(
            "Risk is driven mainly by {trigger}, with {} also factored in.",
            crime_trigger(incidents)
        ),
    }
}

/// Produces the final assessment. Requires an environmental baseline; crime
/// evidence may be unavailable, in which case crime contributes nothing.
pub(crate) fn synthesize(
    env: &EnvironmentalAssessment,
    point: Coordinate,
    evidence: CrimeEvidence,
) -> SafetyAssessment {
    let crime = match &evidence {
        CrimeEvidence::Reported(incidents) => crime_risk(incidents),
        CrimeEvidence::Unavailable(_) => 0.0,
    };
    let w = env.weights.crime;
    let env_share = (1.0 - w) * env.raw_risk_index;
    let crime_share = w * crime;

    let safety_score = round2(clip(0.0, 100.0 - (env_share + crime_share), 100.0));
    let justification = justify(env, &evidence, env_share, crime_share);

    SafetyAssessment {
        location_name: env.location_name.clone(),
        bounding_box: env.bounding_box,
        safety_score,
        risk_tag: RiskTag::from_score(safety_score),
        justification,
        crime_hotspots: match evidence {
            CrimeEvidence::Reported(incidents) => incidents,
            CrimeEvidence::Unavailable(_) => Vec::new(),
        },
        environmental_hazards: hazards(point, env.landslide_probability, &env.weather.condition),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::BoundingBox;
    use crate::models::{RiskWeights, WeatherSnapshot};

    const P: Coordinate = Coordinate { lat: 28.6139, lon: 77.2090 };

    fn env(raw_risk_index: f64, urban: bool) -> EnvironmentalAssessment {
        EnvironmentalAssessment {
            location_name: "Connaught Place, New Delhi, Delhi, India".into(),
            bounding_box: BoundingBox::around(P),
            weather: WeatherSnapshot {
                temperature: 24.0,
                rainfall_mm: 0.0,
                wind_speed_kmh: 5.0,
                humidity: 50.0,
                condition: WeatherCondition::Clear,
                visibility_km: 10.0,
            },
            landslide_probability: 0.02,
            raw_risk_index,
            is_urban: urban,
            weights: RiskWeights::for_area(urban),
        }
    }

    fn incident(severity: Severity, crime_type: &str) -> CrimeIncident {
        CrimeIncident {
            id: "c".into(),
            lat: P.lat,
            lon: P.lon,
            crime_type: crime_type.into(),
            severity,
            summary: String::new(),
            source_url: String::new(),
            time_estimate: String::new(),
        }
    }

    #[test]
    fn crime_risk_curve() {
        assert_eq!(crime_risk(&[]), 0.0);
        assert_eq!(crime_risk(&[incident(Severity::High, "murder")]), 90.0);
        assert_eq!(crime_risk(&[incident(Severity::Low, "scam")]), 20.0);
        // worst = 50, one extra → +10
        let two = [incident(Severity::Low, "scam"), incident(Severity::Medium, "theft")];
        assert!((crime_risk(&two) - 60.0).abs() < 1e-9);
        let many: Vec<_> = (0..40).map(|_| incident(Severity::High, "assault")).collect();
        assert_eq!(crime_risk(&many), 100.0);
    }

    #[test]
    fn crime_risk_is_monotonic_in_count() {
        let mut incidents = Vec::new();
        let mut last = 0.0;
        for _ in 0..10 {
            incidents.push(incident(Severity::Medium, "theft"));
            let r = crime_risk(&incidents);
            assert!(r >= last);
            last = r;
        }
    }

    #[test]
    fn no_incidents_scores_on_environment_alone() {
        for (raw, urban) in [(0.0, true), (27.68, false), (83.1, true)] {
            let e = env(raw, urban);
            let a = synthesize(&e, P, CrimeEvidence::Reported(Vec::new()));
            let expected = 100.0 - (1.0 - e.weights.crime) * raw;
            assert!((a.safety_score - expected).abs() <= 0.005, "{raw}");
            assert!(a.justification.contains("no recent crime reports"));
        }
    }

    #[test]
    fn single_severe_incident_dominates_perfect_weather() {
        let a = synthesize(
            &env(0.0, true),
            P,
            CrimeEvidence::Reported(vec![incident(Severity::High, "murder")]),
        );
        assert!(a.safety_score <= 100.0 - 0.40 * 90.0);
        assert_eq!(a.safety_score, 64.0);
        assert_eq!(a.risk_tag, RiskTag::Moderate);
        assert!(a.justification.contains("1 recent crime report,"));
        assert!(a.justification.contains("high-severity murder"));
        assert!(a.justification.contains("despite calm"));
        assert_eq!(a.crime_hotspots.len(), 1);
    }

    #[test]
    fn violent_crime_with_bad_weather_is_high_risk() {
        let incidents = vec![
            incident(Severity::High, "assault"),
            incident(Severity::High, "robbery"),
            incident(Severity::Medium, "theft"),
        ];
        let a = synthesize(&env(70.0, true), P, CrimeEvidence::Reported(incidents));
        assert_eq!(a.risk_tag, RiskTag::HighRisk);
        assert!(a.safety_score <= 40.0);
    }

    #[test]
    fn unavailable_crime_data_degrades_gracefully() {
        let a = synthesize(&env(30.0, false), P, CrimeEvidence::Unavailable("search failed".into()));
        assert!((a.safety_score - (100.0 - 0.75 * 30.0)).abs() < 1e-9);
        assert!(a.justification.starts_with("Crime data was unavailable (search failed)"));
        assert!(a.crime_hotspots.is_empty());
    }

    #[test]
    fn environment_dominant_justification_names_trigger() {
        let mut e = env(60.0, false);
        e.weather.rainfall_mm = 32.0;
        e.weather.condition = WeatherCondition::Rain;
        let a = synthesize(&e, P, CrimeEvidence::Reported(vec![incident(Severity::Low, "scam")]));
        assert!(a.justification.starts_with("Risk is driven mainly by heavy rainfall of 32.0 mm"));
    }

    #[test]
    fn justification_is_never_empty() {
        let evidences = [
            CrimeEvidence::Unavailable("x".into()),
            CrimeEvidence::Reported(vec![]),
            CrimeEvidence::Reported(vec![incident(Severity::Low, "scam")]),
            CrimeEvidence::Reported(vec![incident(Severity::High, "murder")]),
        ];
        for raw in [0.0, 15.0, 45.0, 100.0] {
            for ev in evidences.iter().cloned() {
                assert!(!synthesize(&env(raw, true), P, ev).justification.trim().is_empty());
            }
        }
    }

    #[test]
    fn score_and_tag_stay_consistent() {
        for raw in [0.0, 10.0, 50.0, 100.0] {
            for n in 0..5 {
                let incidents = (0..n).map(|_| incident(Severity::High, "assault")).collect();
                let a = synthesize(&env(raw, true), P, CrimeEvidence::Reported(incidents));
                assert!((0.0..=100.0).contains(&a.safety_score));
                assert_eq!(a.risk_tag, RiskTag::from_score(a.safety_score));
            }
        }
    }

    #[test]
    fn landslide_hazard_thresholds() {
        assert!(hazards(P, 0.6, &WeatherCondition::Clear).is_empty());
        let medium = hazards(P, 0.7, &WeatherCondition::Clear);
        assert_eq!(medium.len(), 1);
        assert_eq!(medium[0].kind, HazardKind::Landslide);
        assert_eq!(medium[0].severity, HazardSeverity::Medium);
        assert_eq!(hazards(P, 0.85, &WeatherCondition::Clear)[0].severity, HazardSeverity::High);
    }

    #[test]
    fn weather_hazards() {
        let storm = hazards(P, 0.0, &WeatherCondition::Thunderstorm);
        assert_eq!(storm[0].kind, HazardKind::Weather);
        assert_eq!(storm[0].severity, HazardSeverity::High);
        assert_eq!((storm[0].lat, storm[0].lon), (P.lat, P.lon));
        assert_eq!(hazards(P, 0.0, &WeatherCondition::HeavyRain)[0].severity, HazardSeverity::Medium);
        assert_eq!(hazards(P, 0.0, &WeatherCondition::Fog)[0].severity, HazardSeverity::Medium);
        assert!(hazards(P, 0.0, &WeatherCondition::Rain).is_empty());
        assert!(hazards(P, 0.0, &WeatherCondition::Tornado).is_empty());
        assert_eq!(hazards(P, 0.9, &WeatherCondition::Fog).len(), 2);
    }
}
