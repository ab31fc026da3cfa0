use async_trait::async_trait;
use serde::Deserialize;

use super::{fetch_json, ReverseGeocode, ReverseGeocoder};
use crate::errors::UpstreamError;
use crate::geo::Coordinate;

/// Reverse geocoding against a Nominatim instance.
pub(crate) struct NominatimRepository {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct NominatimReverse {
    #[serde(default)]
    address: NominatimAddress,
    #[serde(default)]
    boundingbox: Vec<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    extratags: Option<NominatimExtraTags>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    suburb: Option<String>,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimExtraTags {
    place: Option<String>,
}

impl NominatimRepository {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn into_reverse(raw: NominatimReverse) -> ReverseGeocode {
        let NominatimAddress { suburb, city, state, country } = raw.address;
        let address_parts = [suburb, city, state, country]
            .into_iter()
            .flatten()
            .collect();

        // Nominatim encodes the box as strings; an unparsable entry poisons the whole box.
        let bounding_box = raw
            .boundingbox
            .iter()
            .map(|s| s.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .unwrap_or_default();

        let place_type = raw
            .extratags
            .and_then(|t| t.place)
            .or(raw.kind);

        ReverseGeocode { address_parts, bounding_box, place_type }
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimRepository {
    async fn reverse(&self, point: Coordinate) -> Result<ReverseGeocode, UpstreamError> {
        let request = self.client.get(format!("{}/reverse", self.base_url)).query(&[
            ("lat", point.lat.to_string()),
            ("lon", point.lon.to_string()),
            ("format", "json".to_string()),
            ("extratags", "1".to_string()),
        ]);
        let raw: NominatimReverse = fetch_json(request).await?;
        Ok(Self::into_reverse(raw))
    }
}
