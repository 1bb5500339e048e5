use crate::app::AppError;
use crate::domain::geo::Coordinates;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub places_api_key: String,
    pub places_base_url: String,
    pub places_timeout_ms: u64,
    pub default_search_radius_m: u32,
    pub map_search_radius_m: u32,
    pub db_path: String,
    pub http_bind: String,
    pub map_refresh_interval_ms: u64,
    pub map_center: Option<Coordinates>,
    pub map_span_deg: f64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        // a missing .env file is fine; the process environment still applies
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let places_api_key = non_empty(&lookup, "PLACES_API_KEY")
            .ok_or_else(|| AppError::config("PLACES_API_KEY is required"))?;

        let map_center = match non_empty(&lookup, "MAP_CENTER") {
            Some(raw) => Some(
                Coordinates::parse_pair(&raw)
                    .ok_or_else(|| AppError::config("MAP_CENTER must be \"lat,lng\""))?,
            ),
            None => None,
        };

        let places_timeout_ms = parse_or_default(&lookup, "PLACES_TIMEOUT_MS", 10_000_u64)?;
        if places_timeout_ms == 0 {
            return Err(AppError::config("PLACES_TIMEOUT_MS must be greater than zero"));
        }

        let map_refresh_interval_ms =
            parse_or_default(&lookup, "MAP_REFRESH_INTERVAL_MS", 10_000_u64)?;
        if map_refresh_interval_ms == 0 {
            return Err(AppError::config(
                "MAP_REFRESH_INTERVAL_MS must be greater than zero",
            ));
        }

        Ok(Self {
            places_api_key,
            places_base_url: non_empty(&lookup, "PLACES_BASE_URL")
                .unwrap_or_else(|| "https://maps.googleapis.com/maps/api".to_string()),
            places_timeout_ms,
            default_search_radius_m: parse_or_default(&lookup, "DEFAULT_SEARCH_RADIUS_M", 7000_u32)?,
            map_search_radius_m: parse_or_default(&lookup, "MAP_SEARCH_RADIUS_M", 6000_u32)?,
            db_path: non_empty(&lookup, "DB_PATH")
                .unwrap_or_else(|| "/var/lib/evadoom/evadoom.db".to_string()),
            http_bind: non_empty(&lookup, "HTTP_BIND").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            map_refresh_interval_ms,
            map_center,
            map_span_deg: parse_or_default(&lookup, "MAP_SPAN_DEG", 0.05_f64)?,
        })
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or_default<T, F>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::config(format!("{key} must be a valid number"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::AppConfig;
    use crate::domain::geo::Coordinates;

    #[test]
    fn rejects_missing_places_api_key() {
        let result = AppConfig::from_lookup(|_| None);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "invalid configuration: PLACES_API_KEY is required"
        );
    }

    #[test]
    fn applies_defaults_for_optional_fields() {
        let result = AppConfig::from_lookup(|key| match key {
            "PLACES_API_KEY" => Some("secret".to_string()),
            _ => None,
        })
        .expect("config should be valid");

        assert_eq!(result.places_api_key, "secret");
        assert_eq!(result.places_base_url, "https://maps.googleapis.com/maps/api");
        assert_eq!(result.places_timeout_ms, 10_000);
        assert_eq!(result.default_search_radius_m, 7000);
        assert_eq!(result.map_search_radius_m, 6000);
        assert_eq!(result.db_path, "/var/lib/evadoom/evadoom.db");
        assert_eq!(result.http_bind, "0.0.0.0:8080");
        assert_eq!(result.map_refresh_interval_ms, 10_000);
        assert_eq!(result.map_center, None);
        assert_eq!(result.map_span_deg, 0.05);
    }

    #[test]
    fn parses_map_center() {
        let result = AppConfig::from_lookup(|key| match key {
            "PLACES_API_KEY" => Some("secret".to_string()),
            "MAP_CENTER" => Some(" 52.52, 13.405 ".to_string()),
            _ => None,
        })
        .expect("config should be valid");

        assert_eq!(result.map_center, Some(Coordinates::new(52.52, 13.405)));
    }

    #[test]
    fn rejects_malformed_map_center() {
        let result = AppConfig::from_lookup(|key| match key {
            "PLACES_API_KEY" => Some("secret".to_string()),
            "MAP_CENTER" => Some("berlin".to_string()),
            _ => None,
        });

        assert_eq!(
            result.unwrap_err().to_string(),
            "invalid configuration: MAP_CENTER must be \"lat,lng\""
        );
    }

    #[test]
    fn rejects_invalid_numeric_values() {
        let result = AppConfig::from_lookup(|key| match key {
            "PLACES_API_KEY" => Some("secret".to_string()),
            "MAP_REFRESH_INTERVAL_MS" => Some("abc".to_string()),
            _ => None,
        });

        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "invalid configuration: MAP_REFRESH_INTERVAL_MS must be a valid number"
        );
    }

    #[test]
    fn rejects_zero_refresh_interval() {
        let result = AppConfig::from_lookup(|key| match key {
            "PLACES_API_KEY" => Some("secret".to_string()),
            "MAP_REFRESH_INTERVAL_MS" => Some("0".to_string()),
            _ => None,
        });

        assert_eq!(
            result.unwrap_err().to_string(),
            "invalid configuration: MAP_REFRESH_INTERVAL_MS must be greater than zero"
        );
    }
}
