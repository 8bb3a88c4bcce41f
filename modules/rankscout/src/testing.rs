// Test mock for the SearchFetcher seam.
//
// MockFetcher serves canned organic pages and listings per keyword, fails on
// request, and records every call so tests can assert which sources were hit
// and in what order.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use rankscout_common::{ListingEntry, OrganicEntry};

use crate::traits::SearchFetcher;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchCall {
    Organic { keyword: String, page: u32 },
    Primary(String),
    Fallback(String),
}

/// Keyword-keyed fetcher. Unregistered keywords and pages past the last
/// registered one come back empty rather than failing.
#[derive(Default)]
pub struct MockFetcher {
    organic: HashMap<String, Vec<Vec<OrganicEntry>>>,
    primary: HashMap<String, Vec<ListingEntry>>,
    fallback: HashMap<String, Vec<ListingEntry>>,
    failing_pages: HashSet<(String, u32)>,
    failing_primary: HashSet<String>,
    failing_fallback: HashSet<String>,
    calls: Mutex<Vec<FetchCall>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register organic pages as plain links, one inner vec per page.
    pub fn on_organic(self, keyword: &str, pages: Vec<Vec<&str>>) -> Self {
        let pages = pages
            .into_iter()
            .map(|page| page.into_iter().map(OrganicEntry::new).collect())
            .collect();
        self.on_organic_entries(keyword, pages)
    }

    pub fn on_organic_entries(mut self, keyword: &str, pages: Vec<Vec<OrganicEntry>>) -> Self {
        self.organic.insert(keyword.to_string(), pages);
        self
    }

    pub fn on_primary(mut self, keyword: &str, listings: Vec<ListingEntry>) -> Self {
        self.primary.insert(keyword.to_string(), listings);
        self
    }

    pub fn on_fallback(mut self, keyword: &str, listings: Vec<ListingEntry>) -> Self {
        self.fallback.insert(keyword.to_string(), listings);
        self
    }

    pub fn fail_organic_page(mut self, keyword: &str, page: u32) -> Self {
        self.failing_pages.insert((keyword.to_string(), page));
        self
    }

    pub fn fail_primary(mut self, keyword: &str) -> Self {
        self.failing_primary.insert(keyword.to_string());
        self
    }

    pub fn fail_fallback(mut self, keyword: &str) -> Self {
        self.failing_fallback.insert(keyword.to_string());
        self
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Organic page indexes fetched for `keyword`, in call order.
    pub fn organic_pages_fetched(&self, keyword: &str) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                FetchCall::Organic { keyword: k, page } if k == keyword => Some(page),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: FetchCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SearchFetcher for MockFetcher {
    async fn organic_page(&self, keyword: &str, page_index: u32) -> Result<Vec<OrganicEntry>> {
        self.record(FetchCall::Organic {
            keyword: keyword.to_string(),
            page: page_index,
        });
        if self
            .failing_pages
            .contains(&(keyword.to_string(), page_index))
        {
            bail!("MockFetcher: organic page {page_index} for '{keyword}' set to fail");
        }
        Ok(self
            .organic
            .get(keyword)
            .and_then(|pages| pages.get(page_index as usize))
            .cloned()
            .unwrap_or_default())
    }

    async fn primary_listings(&self, keyword: &str) -> Result<Vec<ListingEntry>> {
        self.record(FetchCall::Primary(keyword.to_string()));
        if self.failing_primary.contains(keyword) {
            bail!("MockFetcher: primary listings for '{keyword}' set to fail");
        }
        Ok(self.primary.get(keyword).cloned().unwrap_or_default())
    }

    async fn fallback_listings(&self, keyword: &str) -> Result<Vec<ListingEntry>> {
        self.record(FetchCall::Fallback(keyword.to_string()));
        if self.failing_fallback.contains(keyword) {
            bail!("MockFetcher: fallback listings for '{keyword}' set to fail");
        }
        Ok(self.fallback.get(keyword).cloned().unwrap_or_default())
    }
}
