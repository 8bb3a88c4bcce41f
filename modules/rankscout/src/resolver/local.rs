use anyhow::{Context, Result};
use tracing::{debug, warn};

use rankscout_common::{FailurePolicy, ListingEntry, RankOutcome, Target};

use crate::traits::SearchFetcher;

/// Finds the target's position in Maps / Local Finder listings.
///
/// The fallback source is consulted only when the primary one comes back
/// empty; the two lists are never merged. Every listing takes a rank slot and
/// there is no ceiling.
#[derive(Debug, Clone)]
pub struct LocalRankResolver {
    /// Lowercased substrings that identify the brand in a listing title.
    pub brand_aliases: Vec<String>,
    pub on_fetch_error: FailurePolicy,
}

impl LocalRankResolver {
    pub fn new<S: AsRef<str>>(brand_aliases: &[S]) -> Self {
        Self {
            brand_aliases: brand_aliases
                .iter()
                .map(|a| a.as_ref().to_lowercase())
                .filter(|a| !a.is_empty())
                .collect(),
            on_fetch_error: FailurePolicy::Swallow,
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_fetch_error = policy;
        self
    }

    pub async fn resolve<F>(&self, fetcher: &F, target: &Target) -> Result<RankOutcome>
    where
        F: SearchFetcher + ?Sized,
    {
        let target_domain = target.domain();
        let keyword = target.keyword.as_str();

        let primary = self.settle("primary", keyword, fetcher.primary_listings(keyword).await)?;
        let listings = if primary.is_empty() {
            debug!(keyword, "No primary listings, trying fallback");
            self.settle("fallback", keyword, fetcher.fallback_listings(keyword).await)?
        } else {
            primary
        };

        if listings.is_empty() {
            return Ok(RankOutcome::NotFound);
        }

        let position = listings
            .iter()
            .position(|place| self.is_match(place, &target_domain));

        Ok(match position {
            Some(idx) => {
                let rank = (idx + 1) as u32;
                debug!(keyword, rank, "Listing match");
                RankOutcome::Ranked(rank)
            }
            None => RankOutcome::NotFound,
        })
    }

    /// Title carries a brand alias, or the target domain appears in the
    /// listing's website field.
    pub fn is_match(&self, place: &ListingEntry, target_domain: &str) -> bool {
        let title = place.title.as_deref().unwrap_or_default().to_lowercase();
        let website = place.website.as_deref().unwrap_or_default().to_lowercase();

        self.brand_aliases
            .iter()
            .any(|alias| title.contains(alias.as_str()))
            || website.contains(target_domain)
    }

    fn settle(
        &self,
        source: &str,
        keyword: &str,
        result: Result<Vec<ListingEntry>>,
    ) -> Result<Vec<ListingEntry>> {
        match result {
            Ok(listings) => Ok(listings),
            Err(e) if self.on_fetch_error == FailurePolicy::Swallow => {
                warn!(keyword, source, error = %e, "Listing fetch failed, treating as empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e).with_context(|| format!("{source} listings for '{keyword}'")),
        }
    }
}
