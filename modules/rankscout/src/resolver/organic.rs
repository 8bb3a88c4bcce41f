use anyhow::{Context, Result};
use tracing::{debug, warn};

use rankscout_common::{normalize_domain, FailurePolicy, RankOutcome, Target};

use crate::traits::SearchFetcher;

/// Finds the target's position in organic web results.
///
/// Pages are fetched strictly in order, and only while the target is still
/// unfound. The rank counter runs across pages and counts only entries that
/// carry a non-empty link. Once it passes `max_rank` the scan stops with
/// `NotFound`, even if a match sits further down.
#[derive(Debug, Clone)]
pub struct OrganicRankResolver {
    pub max_pages: u32,
    pub max_rank: u32,
    pub on_fetch_error: FailurePolicy,
}

impl OrganicRankResolver {
    pub fn new(max_pages: u32, max_rank: u32) -> Self {
        Self {
            max_pages,
            max_rank,
            on_fetch_error: FailurePolicy::Propagate,
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
        let mut rank: u32 = 0;

        for page in 0..self.max_pages {
            let entries = match fetcher.organic_page(keyword, page).await {
                Ok(entries) => entries,
                Err(e) if self.on_fetch_error == FailurePolicy::Swallow => {
                    warn!(keyword, page, error = %e, "Organic fetch failed, treating page as empty");
                    Vec::new()
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("organic page {page} for '{keyword}'"));
                }
            };
            debug!(keyword, page, entries = entries.len(), "Scanning organic page");

            for entry in &entries {
                let Some(link) = entry.ranked_link() else {
                    continue;
                };

                rank += 1;
                if rank > self.max_rank {
                    debug!(keyword, max_rank = self.max_rank, "Organic ceiling reached");
                    return Ok(RankOutcome::NotFound);
                }

                if normalize_domain(link).contains(&target_domain) {
                    debug!(keyword, rank, link, "Organic match");
                    return Ok(RankOutcome::Ranked(rank));
                }
            }
        }

        Ok(RankOutcome::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use rankscout_common::OrganicEntry;

    use super::*;
    use crate::testing::MockFetcher;

    fn target(website: &str) -> Target {
        Target::new("kw", website)
    }

    #[tokio::test]
    async fn match_counts_across_pages() {
        let fetcher =
            MockFetcher::new().on_organic("kw", vec![vec!["a.com", "b.com"], vec!["example.com/foo"]]);

        let outcome = OrganicRankResolver::new(5, 50)
            .resolve(&fetcher, &target("example.com"))
            .await
            .unwrap();

        assert_eq!(outcome, RankOutcome::Ranked(3));
        assert_eq!(fetcher.organic_pages_fetched("kw"), vec![0, 1]);
    }

    #[tokio::test]
    async fn ceiling_breach_is_not_found_and_stops_fetching() {
        let fetcher = MockFetcher::new().on_organic(
            "kw",
            vec![vec!["a.com", "b.com", "c.com"], vec!["example.com"]],
        );

        let outcome = OrganicRankResolver::new(5, 2)
            .resolve(&fetcher, &target("example.com"))
            .await
            .unwrap();

        assert_eq!(outcome, RankOutcome::NotFound);
        assert_eq!(fetcher.organic_pages_fetched("kw"), vec![0]);
    }

    #[tokio::test]
    async fn match_at_exact_ceiling_counts() {
        let fetcher = MockFetcher::new().on_organic("kw", vec![vec!["a.com", "example.com"]]);

        let outcome = OrganicRankResolver::new(5, 2)
            .resolve(&fetcher, &target("example.com"))
            .await
            .unwrap();

        assert_eq!(outcome, RankOutcome::Ranked(2));
    }

    #[tokio::test]
    async fn empty_and_missing_links_take_no_slot() {
        let fetcher = MockFetcher::new().on_organic_entries(
            "kw",
            vec![vec![
                OrganicEntry::default(),
                OrganicEntry::new(""),
                OrganicEntry::new("a.com"),
                OrganicEntry::new("https://www.example.com/x"),
            ]],
        );

        let outcome = OrganicRankResolver::new(5, 50)
            .resolve(&fetcher, &target("https://example.com"))
            .await
            .unwrap();

        assert_eq!(outcome, RankOutcome::Ranked(2));
    }

    #[tokio::test]
    async fn substring_containment_matches_subdomains() {
        let fetcher = MockFetcher::new().on_organic("kw", vec![vec!["https://blog.example.com/post"]]);

        let outcome = OrganicRankResolver::new(1, 50)
            .resolve(&fetcher, &target("example.com"))
            .await
            .unwrap();

        assert_eq!(outcome, RankOutcome::Ranked(1));
    }

    #[tokio::test]
    async fn exhausting_pages_is_not_found() {
        let fetcher = MockFetcher::new().on_organic("kw", vec![vec!["a.com"], vec!["b.com"]]);

        let outcome = OrganicRankResolver::new(3, 50)
            .resolve(&fetcher, &target("example.com"))
            .await
            .unwrap();

        assert_eq!(outcome, RankOutcome::NotFound);
        assert_eq!(fetcher.organic_pages_fetched("kw"), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn fetch_failure_propagates_by_default() {
        let fetcher = MockFetcher::new()
            .on_organic("kw", vec![vec!["a.com"], vec!["example.com"]])
            .fail_organic_page("kw", 1);

        let err = OrganicRankResolver::new(5, 50)
            .resolve(&fetcher, &target("example.com"))
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("organic page 1"));
    }

    #[tokio::test]
    async fn swallow_policy_skips_failed_page() {
        let fetcher = MockFetcher::new()
            .on_organic("kw", vec![vec!["a.com"], vec!["b.com"], vec!["example.com"]])
            .fail_organic_page("kw", 1);

        let outcome = OrganicRankResolver::new(5, 50)
            .with_failure_policy(FailurePolicy::Swallow)
            .resolve(&fetcher, &target("example.com"))
            .await
            .unwrap();

        assert_eq!(outcome, RankOutcome::Ranked(2));
    }

    #[tokio::test]
    async fn rank_never_exceeds_ceiling() {
        let links: Vec<String> = (0..30).map(|i| format!("site{i}.com")).collect();
        for max_rank in [1, 5, 10, 29, 30] {
            for hit in 0..30 {
                let mut page: Vec<&str> = links.iter().map(String::as_str).collect();
                page[hit] = "example.com";
                let fetcher = MockFetcher::new().on_organic("kw", vec![page]);

                let outcome = OrganicRankResolver::new(1, max_rank)
                    .resolve(&fetcher, &target("example.com"))
                    .await
                    .unwrap();

                match outcome {
                    RankOutcome::Ranked(r) => {
                        assert!((1..=max_rank).contains(&r));
                        assert_eq!(r as usize, hit + 1);
                    }
                    RankOutcome::NotFound => assert!(hit as u32 >= max_rank),
                }
            }
        }
    }

    #[tokio::test]
    async fn repeated_runs_agree() {
        let fetcher = MockFetcher::new().on_organic("kw", vec![vec!["a.com", "example.com"]]);
        let resolver = OrganicRankResolver::new(5, 50);

        let first = resolver.resolve(&fetcher, &target("example.com")).await.unwrap();
        let second = resolver.resolve(&fetcher, &target("example.com")).await.unwrap();

        assert_eq!(first, second);
    }
}
