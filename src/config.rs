use std::env;
use std::time::Duration;

pub(crate) const API_PREFIX: &str = "/api/v1";

const PLACEHOLDER_WEATHER_KEY: &str = "YOUR_OPENWEATHERMAP_API_KEY";

pub(crate) struct Config {
    pub host: String,
    pub port: u16,
    pub weather_api_key: Option<String>,
    pub nominatim_url: String,
    pub weather_url: String,
    pub search_url: String,
    pub extraction_url: Option<String>,
    pub user_agent: String,
    pub timeouts: Timeouts,
}

/// Upper bounds for each collaborator call made during one assessment.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Timeouts {
    pub geocode: Duration,
    pub weather: Duration,
    pub search: Duration,
    pub extraction: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            geocode: Duration::from_secs(5),
            weather: Duration::from_secs(8),
            search: Duration::from_secs(6),
            extraction: Duration::from_secs(20),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Timeouts::default();
        Self {
            host: env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            weather_api_key: weather_key(env::var("OPENWEATHERMAP_API_KEY").ok()),
            nominatim_url: env::var("NOMINATIM_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".into()),
            weather_url: env::var("OPENWEATHERMAP_URL")
                .unwrap_or_else(|_| "https://api.openweathermap.org".into()),
            search_url: env::var("SEARCH_URL")
                .unwrap_or_else(|_| "https://api.duckduckgo.com".into()),
            extraction_url: env::var("CRIME_EXTRACTION_URL")
                .ok()
                .filter(|u| !u.trim().is_empty()),
            user_agent: env::var("HTTP_USER_AGENT")
                .unwrap_or_else(|_| "SafeZone/1.0 (traveller safety scoring)".into()),
            timeouts: Timeouts {
                geocode: secs_from_env("GEOCODE_TIMEOUT_SECS", defaults.geocode),
                weather: secs_from_env("WEATHER_TIMEOUT_SECS", defaults.weather),
                search: secs_from_env("SEARCH_TIMEOUT_SECS", defaults.search),
                extraction: secs_from_env("EXTRACTION_TIMEOUT_SECS", defaults.extraction),
            },
        }
    }
}

/// Empty keys and the sample placeholder count as "not configured".
fn weather_key(raw: Option<String>) -> Option<String> {
    raw.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && k != PLACEHOLDER_WEATHER_KEY)
}

fn secs_from_env(name: &str, default: Duration) -> Duration {
    env::var(name)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|&s| s > 0)
        .map(Duration::from_secs)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_key_is_treated_as_missing() {
        assert_eq!(weather_key(None), None);
        assert_eq!(weather_key(Some("   ".into())), None);
        assert_eq!(weather_key(Some(PLACEHOLDER_WEATHER_KEY.into())), None);
        assert_eq!(weather_key(Some(" abc123 ".into())), Some("abc123".into()));
    }

    #[test]
    fn zero_timeout_falls_back_to_default() {
        env::set_var("SAFEZONE_TEST_TIMEOUT_ZERO", "0");
        env::set_var("SAFEZONE_TEST_TIMEOUT_BAD", "soon");
        env::set_var("SAFEZONE_TEST_TIMEOUT_OK", "3");
        let d = Duration::from_secs(9);
        assert_eq!(secs_from_env("SAFEZONE_TEST_TIMEOUT_ZERO", d), d);
        assert_eq!(secs_from_env("SAFEZONE_TEST_TIMEOUT_BAD", d), d);
        assert_eq!(secs_from_env("SAFEZONE_TEST_TIMEOUT_OK", d), Duration::from_secs(3));
    }
}
