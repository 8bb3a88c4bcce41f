use std::str::FromStr;
use std::time::Duration;

use crate::error::RankScoutError;
use crate::types::FailurePolicy;

/// Application configuration loaded from environment variables (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    // SerpApi
    pub serpapi_api_key: String,
    pub location: String,
    pub gl: String,
    pub hl: String,
    pub local_zoom: u8,

    // Organic scan bounds
    pub results_per_page: u32,
    pub max_pages: u32,
    pub max_rank: u32,

    // Pacing
    pub call_delay: Duration,

    // Matching
    pub brand_aliases: Vec<String>,

    // Failure handling
    pub organic_on_fetch_error: FailurePolicy,
    pub local_on_fetch_error: FailurePolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, RankScoutError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RankScoutError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let serpapi_api_key = get("SERPAPI_API_KEY").ok_or_else(|| {
            RankScoutError::Config("SERPAPI_API_KEY environment variable is required".into())
        })?;

        let brand_aliases = match get("BRAND_ALIASES") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            None => vec!["omkitchen".to_string(), "om kitchen".to_string()],
        };

        Ok(Self {
            serpapi_api_key,
            location: get("SERP_LOCATION")
                .unwrap_or_else(|| "Noida, Uttar Pradesh, India".to_string()),
            gl: get("SERP_GL").unwrap_or_else(|| "in".to_string()),
            hl: get("SERP_HL").unwrap_or_else(|| "en".to_string()),
            local_zoom: parse_or(&get, "SERP_LOCAL_ZOOM", 14)?,
            results_per_page: parse_or(&get, "SERP_RESULTS_PER_PAGE", 10)?,
            max_pages: parse_or(&get, "SERP_MAX_PAGES", 5)?,
            max_rank: parse_or(&get, "SERP_MAX_RANK", 50)?,
            call_delay: Duration::from_millis(parse_or(&get, "SERP_CALL_DELAY_MS", 1000)?),
            brand_aliases,
            organic_on_fetch_error: parse_or(
                &get,
                "ORGANIC_ON_FETCH_ERROR",
                FailurePolicy::Propagate,
            )?,
            local_on_fetch_error: parse_or(&get, "LOCAL_ON_FETCH_ERROR", FailurePolicy::Swallow)?,
        })
    }

    pub fn log_redacted(&self) {
        fn preview(val: &str) -> String {
            let n: usize = val.chars().take(5).map(char::len_utf8).sum();
            format!("{}...({} chars)", &val[..n], val.len())
        }

        tracing::info!("Config loaded:");
        tracing::info!("  SERPAPI_API_KEY: {}", preview(&self.serpapi_api_key));
        tracing::info!(
            location = self.location.as_str(),
            gl = self.gl.as_str(),
            hl = self.hl.as_str(),
            local_zoom = self.local_zoom,
            "  Locale"
        );
        tracing::info!(
            results_per_page = self.results_per_page,
            max_pages = self.max_pages,
            max_rank = self.max_rank,
            call_delay_ms = self.call_delay.as_millis() as u64,
            "  Scan bounds"
        );
        tracing::info!(
            brand_aliases = ?self.brand_aliases,
            organic_on_fetch_error = ?self.organic_on_fetch_error,
            local_on_fetch_error = ?self.local_on_fetch_error,
            "  Matching"
        );
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, RankScoutError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| RankScoutError::Config(format!("{key} is invalid ({raw:?}): {e}"))),
        None => Ok(default),
    }
}
