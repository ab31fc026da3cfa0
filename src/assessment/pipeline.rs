use std::sync::Arc;

use super::crime_signal::{self, CrimeSignals};
use super::geocontext::{self, GeoContext};
use super::synthesis::{self, CrimeEvidence};
use super::{bounded, environment, incidents, telemetry};
use crate::config::{Config, Timeouts};
use crate::errors::AppError;
use crate::geo::Coordinate;
use crate::models::{EnvironmentalAssessment, SafetyAssessment};
use crate::repositories::{
    http_client, CrimeExtractor, DisabledExtractor, DuckDuckGoRepository, HttpCrimeExtractor,
    NominatimRepository, OpenWeatherRepository, ReverseGeocoder, TextSearch, WeatherProvider,
};

/// A result together with the degradations that went into it.
#[derive(Debug)]
pub(crate) struct Assessed<T> {
    pub value: T,
    pub warnings: Vec<String>,
}

/// Stateless per call; one instance is shared by all request handlers.
pub(crate) struct RiskAssessor {
    geocoder: Arc<dyn ReverseGeocoder>,
    weather: Arc<dyn WeatherProvider>,
    search: Arc<dyn TextSearch>,
    extractor: Arc<dyn CrimeExtractor>,
    timeouts: Timeouts,
}

impl RiskAssessor {
    pub fn new(
        geocoder: Arc<dyn ReverseGeocoder>,
        weather: Arc<dyn WeatherProvider>,
        search: Arc<dyn TextSearch>,
        extractor: Arc<dyn CrimeExtractor>,
        timeouts: Timeouts,
    ) -> Self {
        Self { geocoder, weather, search, extractor, timeouts }
    }

    pub fn from_config(cfg: &Config) -> Self {
        let client = http_client(&cfg.user_agent);
        if cfg.weather_api_key.is_none() {
            log::warn!("OPENWEATHERMAP_API_KEY is not set; every assessment will fail until it is");
        }
        let extractor: Arc<dyn CrimeExtractor> = match &cfg.extraction_url {
            Some(url) => Arc::new(HttpCrimeExtractor::new(client.clone(), url.clone())),
            None => {
                log::warn!("CRIME_EXTRACTION_URL is not set; crime risk will be reported as unavailable");
                Arc::new(DisabledExtractor)
            }
        };
        Self::new(
            Arc::new(NominatimRepository::new(client.clone(), &cfg.nominatim_url)),
            Arc::new(OpenWeatherRepository::new(
                client.clone(),
                &cfg.weather_url,
                cfg.weather_api_key.clone(),
            )),
            Arc::new(DuckDuckGoRepository::new(client, &cfg.search_url)),
            extractor,
            cfg.timeouts,
        )
    }

    async fn environment_with_context(
        &self,
        point: Coordinate,
    ) -> Result<(EnvironmentalAssessment, GeoContext), AppError> {
        // Independent upstreams run concurrently; a weather failure drops the
        // pending geocode instead of waiting it out.
        let (context, weather) = tokio::try_join!(
            async {
                Ok::<_, AppError>(
                    geocontext::resolve(self.geocoder.as_ref(), point, self.timeouts.geocode).await,
                )
            },
            telemetry::fetch(self.weather.as_ref(), point, self.timeouts.weather),
        )?;

        let score = environment::score(&weather, point, context.is_urban);
        log::debug!(
            "Environment at {},{}: weather risk {:.1} (rain {:.1}, wind {:.1}, visibility {:.1}, \
             temperature {:.1}), landslide p {:.3}, index {}",
            point.lat,
            point.lon,
            score.weather.combined,
            score.weather.rain,
            score.weather.wind,
            score.weather.visibility,
            score.weather.temperature,
            score.landslide_probability,
            score.raw_risk_index
        );

        let assessment = EnvironmentalAssessment {
            location_name: context.location_name.clone(),
            bounding_box: context.bounding_box,
            weather,
            landslide_probability: score.landslide_probability,
            raw_risk_index: score.raw_risk_index,
            is_urban: context.is_urban,
            weights: score.weights,
        };
        Ok((assessment, context))
    }

    pub async fn assess_environment(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<Assessed<EnvironmentalAssessment>, AppError> {
        let point = crate::validation::validate_coordinates(lat, lon)?;
        let (value, context) = self.environment_with_context(point).await?;
        Ok(Assessed { value, warnings: context.warnings })
    }

    pub async fn crime_signals(&self, location: &str) -> CrimeSignals {
        crime_signal::gather(self.search.as_ref(), location, self.timeouts.search).await
    }

    async fn crime_evidence(
        &self,
        context: &GeoContext,
        point: Coordinate,
        warnings: &mut Vec<String>,
    ) -> CrimeEvidence {
        if !context.named {
            return CrimeEvidence::Unavailable("location could not be resolved".to_string());
        }

        let signals = self.crime_signals(&context.location_name).await;
        if signals.is_unavailable() {
            return CrimeEvidence::Unavailable("crime search failed".to_string());
        }
        if signals.failed_queries > 0 {
            warnings.push(format!(
                "{} of {} crime searches failed",
                signals.failed_queries, signals.queries
            ));
        }
        if signals.corpus.is_empty() {
            return CrimeEvidence::Reported(Vec::new());
        }

        match bounded(
            self.timeouts.extraction,
            self.extractor.extract(&signals.corpus, point),
        )
        .await
        {
            Ok(raw) => CrimeEvidence::Reported(incidents::sanitize(raw, point)),
            Err(err) => {
                log::warn!("Crime extraction failed for {:?}: {err}", context.location_name);
                CrimeEvidence::Unavailable(format!("crime extraction failed: {err}"))
            }
        }
    }

    /// Full hybrid assessment. Fails only when the weather baseline cannot be obtained.
    pub async fn assess_risk(&self, lat: f64, lon: f64) -> Result<Assessed<SafetyAssessment>, AppError> {
        let point = crate::validation::validate_coordinates(lat, lon)?;
        let (env, context) = self.environment_with_context(point).await?;

        let mut warnings = context.warnings.clone();
        let evidence = self.crime_evidence(&context, point, &mut warnings).await;
        if let CrimeEvidence::Unavailable(reason) = &evidence {
            warnings.push(format!("crime data unavailable: {reason}"));
        }

        let assessment = synthesis::synthesize(&env, point, evidence);
        log::info!(
            "Assessed {} ({},{}): score {} ({})",
            assessment.location_name,
            lat,
            lon,
            assessment.safety_score,
            assessment.risk_tag.as_str()
        );
        Ok(Assessed { value: assessment, warnings })
    }
}
