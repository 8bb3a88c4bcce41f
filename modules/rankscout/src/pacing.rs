//! Spacing between upstream API calls.
//!
//! SerpApi meters per account, so every outgoing call goes through one
//! [`Pacer`] that keeps consecutive calls at least `interval` apart. The
//! resolvers never sleep themselves; [`PacedFetcher`] wraps the real fetcher.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

use rankscout_common::{ListingEntry, OrganicEntry};

use crate::traits::SearchFetcher;

#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl Pacer {
    /// A zero interval disables pacing.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_call: Mutex::new(None),
        }
    }

    /// Wait until at least `interval` has passed since the previous call, then
    /// mark a new call as started. The first call never waits.
    pub async fn wait(&self) {
        if self.interval.is_zero() {
            return;
        }

        let mut last = self.last_call.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.interval {
                let remaining = self.interval - elapsed;
                debug!(wait_ms = remaining.as_millis() as u64, "Pacing upstream call");
                sleep(remaining).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// A [`SearchFetcher`] that waits on a shared [`Pacer`] before every call.
pub struct PacedFetcher<F> {
    inner: F,
    pacer: Pacer,
}

impl<F: SearchFetcher> PacedFetcher<F> {
    pub fn new(inner: F, pacer: Pacer) -> Self {
        Self { inner, pacer }
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }
}

#[async_trait]
impl<F: SearchFetcher> SearchFetcher for PacedFetcher<F> {
    async fn organic_page(&self, keyword: &str, page_index: u32) -> Result<Vec<OrganicEntry>> {
        self.pacer.wait().await;
        self.inner.organic_page(keyword, page_index).await
    }

    async fn primary_listings(&self, keyword: &str) -> Result<Vec<ListingEntry>> {
        self.pacer.wait().await;
        self.inner.primary_listings(keyword).await
    }

    async fn fallback_listings(&self, keyword: &str) -> Result<Vec<ListingEntry>> {
        self.pacer.wait().await;
        self.inner.fallback_listings(keyword).await
    }
}
