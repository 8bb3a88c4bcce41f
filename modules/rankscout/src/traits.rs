// Trait seam between the rank resolvers and whatever produces search results.
//
// SerpApiFetcher is the production implementation; MockFetcher (testing.rs)
// serves canned pages so resolver and pipeline tests run with no network.

use anyhow::Result;
use async_trait::async_trait;

use rankscout_common::{ListingEntry, OrganicEntry};

#[async_trait]
pub trait SearchFetcher: Send + Sync {
    /// One page of organic results. `page_index` starts at 0.
    async fn organic_page(&self, keyword: &str, page_index: u32) -> Result<Vec<OrganicEntry>>;

    /// Places from the primary listing source (Maps).
    async fn primary_listings(&self, keyword: &str) -> Result<Vec<ListingEntry>>;

    /// Places from the fallback listing source (Local Finder).
    async fn fallback_listings(&self, keyword: &str) -> Result<Vec<ListingEntry>>;
}
