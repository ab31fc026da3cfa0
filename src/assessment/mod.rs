//! Hybrid risk assessment: geocontext and weather in parallel, environmental
//! scoring, crime-signal search and extraction, then fusion into one score.

pub(crate) mod crime_signal;
pub(crate) mod environment;
pub(crate) mod geocontext;
pub(crate) mod incidents;
pub(crate) mod pipeline;
pub(crate) mod synthesis;
pub(crate) mod telemetry;

pub(crate) use pipeline::RiskAssessor;

use std::future::Future;
use std::time::Duration;

use crate::errors::UpstreamError;

/// Runs a collaborator call under `limit`, folding expiry into `UpstreamError::Timeout`.
pub(crate) async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, UpstreamError>
where
    F: Future<Output = Result<T, UpstreamError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(UpstreamError::Timeout(Some(limit))),
    }
}
