use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub(crate) enum AppError {
    Validation(String),
    Configuration(String),
    Upstream(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "validation error: {msg}"),
            Self::Configuration(msg) => write!(f, "configuration error: {msg}"),
            Self::Upstream(msg) => write!(f, "upstream error: {msg}"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Validation(msg) => HttpResponse::BadRequest().json(ErrorBody {
                code: 400,
                message: msg,
            }),
            Self::Configuration(msg) => {
                log::error!("Configuration error: {msg}");
                HttpResponse::ServiceUnavailable().json(ErrorBody {
                    code: 503,
                    message: "weather provider is not configured",
                })
            }
            Self::Upstream(msg) => {
                log::error!("Upstream error: {msg}");
                HttpResponse::BadGateway().json(ErrorBody {
                    code: 502,
                    message: "weather telemetry unavailable",
                })
            }
        }
    }
}

/// Failure of a single collaborator call (geocoder, weather, search, extraction).
#[derive(Debug)]
pub(crate) enum UpstreamError {
    Request(String),
    Status(u16),
    Parse(String),
    /// The limit is known when the timeout came from our own deadline.
    Timeout(Option<Duration>),
    MissingCredential(&'static str),
    NotConfigured(&'static str),
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(msg) => write!(f, "request failed: {msg}"),
            Self::Status(code) => write!(f, "unexpected status {code}"),
            Self::Parse(msg) => write!(f, "malformed response: {msg}"),
            Self::Timeout(Some(d)) => write!(f, "timed out after {}s", d.as_secs_f32()),
            Self::Timeout(None) => f.write_str("timed out"),
            Self::MissingCredential(name) => write!(f, "missing credential {name}"),
            Self::NotConfigured(what) => write!(f, "{what} is not configured"),
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(None)
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::MissingCredential(name) => {
                Self::Configuration(format!("{name} is not set"))
            }
            other => Self::Upstream(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: u16,
    message: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn missing_credential_is_a_configuration_error() {
        let err = AppError::from(UpstreamError::MissingCredential("OPENWEATHERMAP_API_KEY"));
        assert!(matches!(err, AppError::Configuration(_)));
        assert_eq!(err.error_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn weather_timeout_is_a_bad_gateway() {
        let err = AppError::from(UpstreamError::Timeout(Some(Duration::from_secs(8))));
        assert!(matches!(err, AppError::Upstream(_)));
        assert_eq!(err.error_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn client_timeout_maps_to_timeout() {
        // Accepts the connection but never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let err = reqwest::Client::new()
            .get(format!("http://{addr}/"))
            .timeout(Duration::from_millis(50))
            .send()
            .await
            .unwrap_err();
        let upstream = UpstreamError::from(err);
        assert!(matches!(upstream, UpstreamError::Timeout(None)), "{upstream:?}");
        assert_eq!(upstream.to_string(), "timed out");
        drop(listener);
    }

    #[test]
    fn validation_is_a_bad_request() {
        let err = AppError::Validation("lat out of range".into());
        assert_eq!(err.error_response().status(), StatusCode::BAD_REQUEST);
    }
}
