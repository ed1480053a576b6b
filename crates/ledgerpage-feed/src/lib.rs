//! ledgerpage-feed - Incremental pagination and aggregation engine.
//!
//! Each paginated collection is driven by a [`PaginationController`]. Pages
//! are joined with asset metadata from a shared [`MetadataCache`] into
//! [`DisplayRecord`]s; records show placeholder metadata until it resolves
//! and are rebuilt in place when it does. A [`ScrollTrigger`] turns "near
//! the end of the list" signals into page requests.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ledgerpage_core::{LedgerService, SessionProvider};
//! use ledgerpage_feed::{FeedConfig, LedgerFeeds, Viewport};
//!
//! # async fn example(
//! #     service: Arc<dyn LedgerService>,
//! #     session: Arc<dyn SessionProvider>,
//! # ) -> ledgerpage_core::Result<()> {
//! let feeds = LedgerFeeds::new(service, session, FeedConfig::default())?;
//! let _watchers = feeds.watch_metadata();
//!
//! let trigger = feeds.listings_trigger();
//! trigger.observe(Viewport::default()).await;
//!
//! for item in &feeds.listings().snapshot().items {
//!     println!("{} {} {}", item.record.token_id, item.location(), item.record.price);
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod controller;
pub mod feeds;
pub mod source;
pub mod summary;
pub mod trigger;

#[cfg(test)]
mod testing;

pub use aggregate::DisplayRecord;
pub use cache::{MetadataCache, PendingBatch};
pub use config::FeedConfig;
pub use controller::{
    FetchOutcome, PaginationController, PaginationState, Phase, SkipReason, Status,
};
pub use feeds::LedgerFeeds;
pub use source::{Listings, PageSource, Revenue};
pub use summary::{ListingSummary, RevenueSummary};
pub use trigger::{Decision, ScrollTrigger, Viewport};
