//! The two collections of the marketplace view, sharing one cache.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use ledgerpage_core::{LedgerService, Result, SessionProvider};

use crate::cache::MetadataCache;
use crate::config::FeedConfig;
use crate::controller::PaginationController;
use crate::source::{Listings, Revenue};
use crate::trigger::ScrollTrigger;

/// Listings and revenue for one session, backed by a single metadata cache.
#[derive(Debug, Clone)]
pub struct LedgerFeeds {
    config: FeedConfig,
    cache: MetadataCache,
    listings: PaginationController<Listings>,
    revenue: PaginationController<Revenue>,
}

impl LedgerFeeds {
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn new(
        service: Arc<dyn LedgerService>,
        session: Arc<dyn SessionProvider>,
        config: FeedConfig,
    ) -> Result<Self> {
        config.validate()?;

        let cache = MetadataCache::new(Arc::clone(&service), Arc::clone(&session));
        let listings = PaginationController::new(
            Listings::new(Arc::clone(&service)),
            cache.clone(),
            Arc::clone(&session),
            config.page_size,
        );
        let revenue = PaginationController::new(
            Revenue::new(service),
            cache.clone(),
            session,
            config.page_size,
        );

        Ok(Self {
            config,
            cache,
            listings,
            revenue,
        })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    pub fn listings(&self) -> &PaginationController<Listings> {
        &self.listings
    }

    pub fn revenue(&self) -> &PaginationController<Revenue> {
        &self.revenue
    }

    pub fn listings_trigger(&self) -> ScrollTrigger<Listings> {
        ScrollTrigger::new(self.listings.clone(), self.config.trigger_threshold)
    }

    pub fn revenue_trigger(&self) -> ScrollTrigger<Revenue> {
        ScrollTrigger::new(self.revenue.clone(), self.config.trigger_threshold)
    }

    /// Start re-merging both collections on metadata resolution.
    pub fn watch_metadata(&self) -> [JoinHandle<()>; 2] {
        [self.listings.watch_metadata(), self.revenue.watch_metadata()]
    }

    /// Explicit refresh: empty the cache and restart both collections.
    pub fn refresh(&self) {
        info!("refreshing feeds");
        self.cache.clear();
        self.listings.reset();
        self.revenue.reset();
    }

    /// Tear down both collections.
    pub fn close(&self) {
        self.listings.close();
        self.revenue.close();
    }
}
