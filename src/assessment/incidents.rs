use crate::geo::Coordinate;
use crate::models::CrimeIncident;

/// Incidents further than this from the assessed point are treated as mis-geocoded.
pub(crate) const MAX_INCIDENT_OFFSET_DEG: f64 = 0.5;

fn is_attributable_url(url: &str) -> bool {
    let Ok(parsed) = reqwest::Url::parse(url.trim()) else {
        return false;
    };
    matches!(parsed.scheme(), "http" | "https")
        && parsed.host_str().is_some_and(|host| !host.is_empty())
}

/// Enforces the extraction contract on whatever the extractor returned.
pub(crate) fn sanitize(incidents: Vec<CrimeIncident>, context: Coordinate) -> Vec<CrimeIncident> {
    incidents
        .into_iter()
        .filter(|i| {
            let plausible = Coordinate::new(i.lat, i.lon).is_some()
                && (i.lat - context.lat).abs() <= MAX_INCIDENT_OFFSET_DEG
                && (i.lon - context.lon).abs() <= MAX_INCIDENT_OFFSET_DEG;
            if !plausible {
                log::warn!(
                    "Dropping incident {:?} at {},{}: too far from {},{}",
                    i.id, i.lat, i.lon, context.lat, context.lon
                );
            }
            plausible
        })
        .enumerate()
        .map(|(n, mut i)| {
            if i.id.trim().is_empty() {
                i.id = format!("crime-{}", n + 1);
            }
            if !is_attributable_url(&i.source_url) {
                i.source_url.clear();
            }
            i
        })
        .collect()
}
