use std::time::Duration;

use super::bounded;
use crate::geo::{BoundingBox, Coordinate};
use crate::repositories::{ReverseGeocode, ReverseGeocoder};

pub(crate) const UNKNOWN_LOCATION: &str = "Unknown Location";

const URBAN_PLACE_TYPES: &[&str] = &["city", "town", "suburb", "urban"];

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct GeoContext {
    pub location_name: String,
    pub bounding_box: BoundingBox,
    pub is_urban: bool,
    /// False when the name is the placeholder and must not be searched for.
    pub named: bool,
    pub warnings: Vec<String>,
}

impl GeoContext {
    pub fn fallback(point: Coordinate, reason: String) -> Self {
        Self {
            location_name: UNKNOWN_LOCATION.to_string(),
            bounding_box: BoundingBox::around(point),
            is_urban: false,
            named: false,
            warnings: vec![reason],
        }
    }

    pub fn from_reverse(point: Coordinate, raw: ReverseGeocode) -> Self {
        let mut warnings = Vec::new();

        let parts: Vec<&str> = raw
            .address_parts
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect();
        let named = !parts.is_empty();
        let location_name = if named {
            parts.join(", ")
        } else {
            warnings.push("geocoder returned no address for this point".to_string());
            UNKNOWN_LOCATION.to_string()
        };

        let bounding_box = BoundingBox::from_slice(&raw.bounding_box).unwrap_or_else(|| {
            if raw.bounding_box.is_empty() {
                log::debug!("No bounding box returned for {location_name}");
                warnings.push("geocoder returned no bounding box; using a 0.01° box".to_string());
            } else {
                log::warn!("Discarding malformed bounding box {:?} for {location_name}", raw.bounding_box);
                warnings.push("geocoder bounding box was malformed; using a 0.01° box".to_string());
            }
            BoundingBox::around(point)
        });

        let is_urban = raw
            .place_type
            .as_deref()
            .map(|t| URBAN_PLACE_TYPES.contains(&t.trim().to_ascii_lowercase().as_str()))
            .unwrap_or(false);

        Self { location_name, bounding_box, is_urban, named, warnings }
    }
}

/// Reverse-geocodes `point`. Never fails: any upstream problem yields the fallback context.
pub(crate) async fn resolve(
    geocoder: &dyn ReverseGeocoder,
    point: Coordinate,
    limit: Duration,
) -> GeoContext {
    match bounded(limit, geocoder.reverse(point)).await {
        Ok(raw) => GeoContext::from_reverse(point, raw),
        Err(err) => {
            log::warn!("Reverse geocoding failed for {},{}: {err}", point.lat, point.lon);
            GeoContext::fallback(point, format!("location lookup failed ({err})"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::fakes::FakeGeocoder;

    const P: Coordinate = Coordinate { lat: 15.4909, lon: 73.8278 };

    fn raw(parts: &[&str], bbox: &[f64], place: Option<&str>) -> ReverseGeocode {
        ReverseGeocode {
            address_parts: parts.iter().map(|s| s.to_string()).collect(),
            bounding_box: bbox.to_vec(),
            place_type: place.map(str::to_string),
        }
    }

    #[test]
    fn joins_address_parts() {
        let ctx = GeoContext::from_reverse(
            P,
            raw(&["Panjim", " ", "Goa", "India"], &[15.4, 15.6, 73.7, 73.9], Some("city")),
        );
        assert_eq!(ctx.location_name, "Panjim, Goa, India");
        assert!(ctx.is_urban);
        assert!(ctx.named);
        assert!(ctx.warnings.is_empty());
        assert_eq!(ctx.bounding_box.south, 15.4);
    }

    #[test]
    fn inverted_box_is_replaced_with_default() {
        let ctx = GeoContext::from_reverse(P, raw(&["Goa"], &[15.6, 15.4, 73.7, 73.9], Some("village")));
        assert_eq!(ctx.bounding_box, BoundingBox::around(P));
        assert!(!ctx.is_urban);
        assert_eq!(ctx.warnings.len(), 1);
    }

    #[test]
    fn absent_box_is_reported_as_absent() {
        let ctx = GeoContext::from_reverse(P, raw(&["Goa"], &[], None));
        assert_eq!(ctx.bounding_box, BoundingBox::around(P));
        assert_eq!(ctx.warnings, vec!["geocoder returned no bounding box; using a 0.01° box"]);

        let ctx = GeoContext::from_reverse(P, raw(&["Goa"], &[15.4, 15.6], None));
        assert!(ctx.warnings[0].contains("malformed"), "{:?}", ctx.warnings);
    }

    #[test]
    fn place_types_are_matched_case_insensitively() {
        for t in ["City", "town", "SUBURB", "urban"] {
            assert!(GeoContext::from_reverse(P, raw(&["x"], &[], Some(t))).is_urban, "{t}");
        }
        for t in ["village", "hamlet", "administrative"] {
            assert!(!GeoContext::from_reverse(P, raw(&["x"], &[], Some(t))).is_urban, "{t}");
        }
    }

    #[test]
    fn empty_address_is_unnamed() {
        let ctx = GeoContext::from_reverse(P, raw(&[], &[15.4, 15.6, 73.7, 73.9], None));
        assert_eq!(ctx.location_name, UNKNOWN_LOCATION);
        assert!(!ctx.named);
    }

    #[tokio::test]
    async fn upstream_failure_degrades_to_fallback() {
        let ctx = resolve(&FakeGeocoder(Err(())), P, Duration::from_secs(1)).await;
        assert_eq!(ctx.location_name, UNKNOWN_LOCATION);
        assert_eq!(ctx.bounding_box, BoundingBox::around(P));
        assert!(!ctx.is_urban);
        assert!(!ctx.named);
        assert_eq!(ctx.warnings.len(), 1);
    }
}
