use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use rankscout_common::{Config, ListingEntry, OrganicEntry};
use serpapi_client::{LocalResult, SearchRequest, SearchResponse, SerpApiClient, SerpApiError};

use crate::traits::SearchFetcher;

/// Locale and paging parameters shared by every SerpApi query.
#[derive(Debug, Clone)]
pub struct SearchLocale {
    pub location: String,
    pub gl: String,
    pub hl: String,
    pub results_per_page: u32,
    pub local_zoom: u8,
}

impl SearchLocale {
    pub fn from_config(config: &Config) -> Self {
        Self {
            location: config.location.clone(),
            gl: config.gl.clone(),
            hl: config.hl.clone(),
            results_per_page: config.results_per_page,
            local_zoom: config.local_zoom,
        }
    }
}

// --- SerpApi (Google Search, Maps, Local Finder) ---

pub struct SerpApiFetcher {
    client: SerpApiClient,
    locale: SearchLocale,
}

impl SerpApiFetcher {
    pub fn new(client: SerpApiClient, locale: SearchLocale) -> Self {
        Self { client, locale }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            SerpApiClient::new(&config.serpapi_api_key),
            SearchLocale::from_config(config),
        )
    }

    fn organic_request(&self, keyword: &str, page_index: u32) -> SearchRequest {
        let per_page = self.locale.results_per_page;
        SearchRequest::google(keyword)
            .location(&self.locale.location)
            .num(per_page)
            .start(page_index * per_page)
            .gl(&self.locale.gl)
            .hl(&self.locale.hl)
    }

    fn maps_request(&self, keyword: &str) -> SearchRequest {
        SearchRequest::google_maps(keyword).location(&self.locale.location)
    }

    fn local_finder_request(&self, keyword: &str) -> SearchRequest {
        SearchRequest::local_finder(keyword)
            .location(&self.locale.location)
            .zoom(self.locale.local_zoom)
            .hl(&self.locale.hl)
            .gl(&self.locale.gl)
    }

    /// An engine with nothing for the query is an empty page, not a failure.
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SerpApiError> {
        match self.client.search(request).await {
            Err(SerpApiError::NoResults(message)) => {
                debug!(message = %message, "SerpApi returned no results");
                Ok(SearchResponse::default())
            }
            other => other,
        }
    }
}

fn into_listings(results: Vec<LocalResult>) -> Vec<ListingEntry> {
    results
        .into_iter()
        .map(|r| ListingEntry {
            title: r.title,
            website: r.website,
        })
        .collect()
}

#[async_trait]
impl SearchFetcher for SerpApiFetcher {
    async fn organic_page(&self, keyword: &str, page_index: u32) -> Result<Vec<OrganicEntry>> {
        let resp = self
            .search(&self.organic_request(keyword, page_index))
            .await
            .context("SerpApi organic search failed")?;

        debug!(keyword, page_index, count = resp.organic_results.len(), "Organic page fetched");
        Ok(resp
            .organic_results
            .into_iter()
            .map(|r| OrganicEntry { link: r.link })
            .collect())
    }

    async fn primary_listings(&self, keyword: &str) -> Result<Vec<ListingEntry>> {
        let resp = self
            .search(&self.maps_request(keyword))
            .await
            .context("SerpApi maps search failed")?;

        debug!(keyword, count = resp.local_results.len(), "Maps listings fetched");
        Ok(into_listings(resp.local_results))
    }

    async fn fallback_listings(&self, keyword: &str) -> Result<Vec<ListingEntry>> {
        let resp = self
            .search(&self.local_finder_request(keyword))
            .await
            .context("SerpApi local finder search failed")?;

        debug!(keyword, count = resp.local_results.len(), "Local Finder listings fetched");
        Ok(into_listings(resp.local_results))
    }
}
