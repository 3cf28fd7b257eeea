//! Configuration
//!
//! SerpAPI settings read from `.env` and the process environment.

use std::env;

use crate::types::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct Config {
    pub search: SearchConfig,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub serpapi_key: String,
    pub no_cache: bool,
    /// Interface language sent as `hl`
    pub language: Option<String>,
    /// Country sent as `gl`
    pub country: Option<String>,
}

impl Config {
    /// Load `.env` (if any) and read the process environment.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let serpapi_key = lookup("SERP_API_KEY")
            .ok_or_else(|| AppError::Config("Missing field 'SERP_API_KEY'".to_string()))?;
        if serpapi_key.trim().is_empty() {
            return Err(AppError::Config("API key not specified".to_string()));
        }

        let no_cache = match lookup("SERP_NO_CACHE") {
            Some(raw) => parse_bool("SERP_NO_CACHE", &raw)?,
            None => true,
        };

        Ok(Self {
            search: SearchConfig {
                serpapi_key,
                no_cache,
                language: non_empty(lookup("SERP_LANGUAGE")),
                country: non_empty(lookup("SERP_COUNTRY")),
            },
        })
    }
}

fn parse_bool(key: &str, raw: &str) -> AppResult<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::Config(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("Missing field 'SERP_API_KEY'"));
    }

    #[test]
    fn test_empty_api_key() {
        let err = Config::from_lookup(lookup_from(&[("SERP_API_KEY", "  ")])).unwrap_err();
        assert!(err.to_string().contains("API key not specified"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[("SERP_API_KEY", "abc123")])).unwrap();
        assert_eq!(config.search.serpapi_key, "abc123");
        assert!(config.search.no_cache);
        assert!(config.search.language.is_none());
        assert!(config.search.country.is_none());
    }

    #[test]
    fn test_optional_settings() {
        let config = Config::from_lookup(lookup_from(&[
            ("SERP_API_KEY", "abc123"),
            ("SERP_NO_CACHE", "false"),
            ("SERP_LANGUAGE", "en"),
            ("SERP_COUNTRY", ""),
        ]))
        .unwrap();
        assert!(!config.search.no_cache);
        assert_eq!(config.search.language.as_deref(), Some("en"));
        assert!(config.search.country.is_none());
    }

    #[test]
    fn test_invalid_no_cache() {
        let err = Config::from_lookup(lookup_from(&[
            ("SERP_API_KEY", "abc123"),
            ("SERP_NO_CACHE", "maybe"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
