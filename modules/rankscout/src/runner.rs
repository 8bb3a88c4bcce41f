use std::fmt;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use rankscout_common::{RowResult, PLACES_RANK_COLUMN, ROW_ERROR_LABEL, SEARCH_RANK_COLUMN};

use crate::pipeline::RankPipeline;
use crate::sheet::Sheet;
use crate::traits::SearchFetcher;

/// What the run does when a row's pipeline returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RowErrorPolicy {
    /// Stop the run and return the error. Nothing is written.
    Abort,
    /// Log the error, mark the row's rank cells, keep going.
    Skip,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub rows: usize,
    pub places_found: usize,
    pub search_found: usize,
    pub failed: usize,
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows={} places_found={} search_found={} failed={}",
            self.rows, self.places_found, self.search_found, self.failed
        )
    }
}

/// Rank every row of `input` in order and return a copy with both rank
/// columns filled in.
pub async fn rank_sheet<F>(
    pipeline: &RankPipeline,
    fetcher: &F,
    input: &Sheet,
    on_row_error: RowErrorPolicy,
) -> Result<(Sheet, RunStats)>
where
    F: SearchFetcher + ?Sized,
{
    let targets = input.targets()?;
    let total = targets.len();
    let mut stats = RunStats {
        rows: total,
        ..Default::default()
    };
    let mut places = Vec::with_capacity(total);
    let mut search = Vec::with_capacity(total);

    for (i, target) in targets.iter().enumerate() {
        info!("[{}/{}] {}", i + 1, total, target.keyword);
        if target.domain().is_empty() {
            warn!(
                row = i + 1,
                website = target.website.as_str(),
                "Website normalizes to an empty domain; every result will match"
            );
        }

        match pipeline.run_row(fetcher, target).await {
            Ok(RowResult {
                places_rank,
                search_rank,
            }) => {
                stats.places_found += places_rank.is_found() as usize;
                stats.search_found += search_rank.is_found() as usize;
                places.push(places_rank.to_string());
                search.push(search_rank.to_string());
            }
            Err(e) if on_row_error == RowErrorPolicy::Skip => {
                error!(row = i + 1, keyword = target.keyword.as_str(), error = %format!("{e:#}"), "Row failed, skipping");
                stats.failed += 1;
                places.push(ROW_ERROR_LABEL.to_string());
                search.push(ROW_ERROR_LABEL.to_string());
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("row {} (keyword '{}') failed", i + 1, target.keyword)
                });
            }
        }
    }

    let mut output = input.clone();
    output.set_column(PLACES_RANK_COLUMN, places)?;
    output.set_column(SEARCH_RANK_COLUMN, search)?;

    Ok((output, stats))
}
