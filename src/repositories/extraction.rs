use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{fetch_json, CrimeExtractor};
use crate::errors::UpstreamError;
use crate::geo::Coordinate;
use crate::models::CrimeIncident;

/// Remote text-understanding service that turns search snippets into incidents.
pub(crate) struct HttpCrimeExtractor {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Serialize)]
struct ExtractionRequest<'a> {
    corpus: &'a [String],
    lat: f64,
    lon: f64,
}

/// Entries are decoded one by one so a single bad record cannot sink the batch.
#[derive(Deserialize)]
struct ExtractionResponse {
    #[serde(default)]
    incidents: Vec<serde_json::Value>,
}

impl ExtractionResponse {
    fn into_incidents(self) -> Vec<CrimeIncident> {
        let total = self.incidents.len();
        let kept: Vec<CrimeIncident> = self
            .incidents
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<CrimeIncident>(entry) {
                Ok(incident) => Some(incident),
                Err(err) => {
                    log::warn!("Skipping unreadable extracted incident: {err}");
                    None
                }
            })
            .collect();
        if kept.len() < total {
            log::warn!("Kept {} of {total} extracted incidents", kept.len());
        }
        kept
    }
}

impl HttpCrimeExtractor {
    pub fn new(client: reqwest::Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl CrimeExtractor for HttpCrimeExtractor {
    async fn extract(
        &self,
        corpus: &[String],
        context: Coordinate,
    ) -> Result<Vec<CrimeIncident>, UpstreamError> {
        let request = self.client.post(&self.endpoint).json(&ExtractionRequest {
            corpus,
            lat: context.lat,
            lon: context.lon,
        });
        let response: ExtractionResponse = fetch_json(request).await?;
        Ok(response.into_incidents())
    }
}

/// Stand-in used when no extraction endpoint is configured.
pub(crate) struct DisabledExtractor;

#[async_trait]
impl CrimeExtractor for DisabledExtractor {
    async fn extract(&self, _: &[String], _: Coordinate) -> Result<Vec<CrimeIncident>, UpstreamError> {
        Err(UpstreamError::NotConfigured("crime extraction"))
    }
}
