use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::normalize_domain;

// --- Spreadsheet schema ---

pub const KEYWORD_COLUMN: &str = "Keyword";
pub const WEBSITE_COLUMN: &str = "Website";
pub const PLACES_RANK_COLUMN: &str = "Google Places Rank";
pub const SEARCH_RANK_COLUMN: &str = "Google Search Rank";

/// Rendered in place of a rank when the target was not found.
pub const NOT_FOUND_LABEL: &str = "Not in top 50";

/// Rendered in both rank columns of a row that was skipped after a failure.
pub const ROW_ERROR_LABEL: &str = "Error";

// --- Inputs ---

/// One keyword/website pair to rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub keyword: String,
    pub website: String,
}

impl Target {
    pub fn new(keyword: impl Into<String>, website: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            website: website.into(),
        }
    }

    /// The website reduced to the bare domain used for all comparisons.
    pub fn domain(&self) -> String {
        normalize_domain(self.website.as_str())
    }
}

/// One organic web result. Only the link matters for ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganicEntry {
    pub link: Option<String>,
}

impl OrganicEntry {
    pub fn new(link: &str) -> Self {
        Self {
            link: Some(link.to_string()),
        }
    }

    /// The link, if present and non-empty.
    pub fn ranked_link(&self) -> Option<&str> {
        self.link.as_deref().filter(|l| !l.is_empty())
    }
}

/// One Maps or Local Finder listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub title: Option<String>,
    pub website: Option<String>,
}

impl ListingEntry {
    pub fn new(title: &str, website: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            website: Some(website.to_string()),
        }
    }
}

// --- Outcomes ---

/// Result of scanning one result source for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankOutcome {
    /// 1-based position of the first match.
    Ranked(u32),
    NotFound,
}

impl RankOutcome {
    pub fn rank(&self) -> Option<u32> {
        match self {
            RankOutcome::Ranked(n) => Some(*n),
            RankOutcome::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, RankOutcome::Ranked(_))
    }
}

impl fmt::Display for RankOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankOutcome::Ranked(n) => write!(f, "{n}"),
            RankOutcome::NotFound => f.write_str(NOT_FOUND_LABEL),
        }
    }
}

/// Both ranks for one spreadsheet row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowResult {
    pub places_rank: RankOutcome,
    pub search_rank: RankOutcome,
}

// --- Policies ---

/// What a resolver does when one of its fetch calls fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Return the error to the caller.
    Propagate,
    /// Log it and treat the failed call as having returned nothing.
    Swallow,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "propagate" => Ok(FailurePolicy::Propagate),
            "swallow" => Ok(FailurePolicy::Swallow),
            other => Err(format!("expected 'propagate' or 'swallow', got '{other}'")),
        }
    }
}
