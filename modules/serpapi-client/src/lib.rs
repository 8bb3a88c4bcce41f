pub mod error;
pub mod types;

pub use error::{Result, SerpApiError};
pub use types::{LocalResult, OrganicResult, SearchRequest, SearchResponse};

use std::time::Duration;

const BASE_URL: &str = "https://serpapi.com";

pub struct SerpApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SerpApiClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(BASE_URL, api_key)
    }

    /// Point the client at a different host (mock servers, proxies).
    pub fn with_base_url(base_url: &str, api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Run one search. An in-body `error` comes back as `SerpApiError::NoResults`
    /// when the engine had nothing for the query, `SerpApiError::Search` otherwise.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let url = format!("{}/search.json", self.base_url);
        tracing::debug!(
            engine = request.param("engine").unwrap_or_default(),
            q = request.param("q").unwrap_or_default(),
            start = request.param("start"),
            "SerpApi search"
        );

        let resp = self
            .client
            .get(&url)
            .query(request.params())
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SerpApiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;

        match parsed.error.as_deref() {
            Some(message) => Err(SerpApiError::from_body_message(message)),
            None => Ok(parsed),
        }
    }
}
