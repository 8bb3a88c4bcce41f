use anyhow::Result;
use tracing::debug;

use rankscout_common::{Config, RankOutcome, RowResult, Target};

use crate::resolver::{LocalRankResolver, OrganicRankResolver};
use crate::traits::SearchFetcher;

/// Where a single row is in its two-step run. Local always goes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowStage {
    PendingLocal,
    PendingOrganic { places_rank: RankOutcome },
    Done(RowResult),
}

/// Ranks one keyword/website pair: Places first, then organic search.
#[derive(Debug, Clone)]
pub struct RankPipeline {
    pub local: LocalRankResolver,
    pub organic: OrganicRankResolver,
}

impl RankPipeline {
    pub fn new(local: LocalRankResolver, organic: OrganicRankResolver) -> Self {
        Self { local, organic }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            local: LocalRankResolver::new(&config.brand_aliases)
                .with_failure_policy(config.local_on_fetch_error),
            organic: OrganicRankResolver::new(config.max_pages, config.max_rank)
                .with_failure_policy(config.organic_on_fetch_error),
        }
    }

    pub async fn run_row<F>(&self, fetcher: &F, target: &Target) -> Result<RowResult>
    where
        F: SearchFetcher + ?Sized,
    {
        let mut stage = RowStage::PendingLocal;
        loop {
            stage = match stage {
                RowStage::PendingLocal => {
                    let places_rank = self.local.resolve(fetcher, target).await?;
                    debug!(keyword = target.keyword.as_str(), %places_rank, "Places rank resolved");
                    RowStage::PendingOrganic { places_rank }
                }
                RowStage::PendingOrganic { places_rank } => {
                    let search_rank = self.organic.resolve(fetcher, target).await?;
                    debug!(keyword = target.keyword.as_str(), %search_rank, "Search rank resolved");
                    RowStage::Done(RowResult {
                        places_rank,
                        search_rank,
                    })
                }
                RowStage::Done(result) => return Ok(result),
            };
        }
    }
}
