//! Paging shared by the listing and revenue commands.

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::debug;

use ledgerpage_core::{ServiceUrl, TokenId};
use ledgerpage_feed::{
    DisplayRecord, FetchOutcome, LedgerFeeds, PageSource, PaginationController, PaginationState,
    ScrollTrigger, Viewport,
};
use ledgerpage_rpc::{RpcLedger, StaticSession};

use crate::session::storage;

#[derive(Args, Debug)]
pub struct FeedArgs {
    /// Number of pages to load
    #[arg(long, default_value_t = 1)]
    pub pages: u32,

    /// Records per page (overrides the stored value)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Ledger service base URL (overrides the stored value)
    #[arg(long, env = "LEDGERPAGE_SERVICE")]
    pub service: Option<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// JSON document printed with `--json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedOutput<'a, R, S> {
    pub items: &'a [DisplayRecord<R>],
    pub summary: S,
    pub total: u64,
    pub has_more: bool,
}

/// Build the feeds for the stored session.
pub fn open_feeds(args: &FeedArgs) -> Result<LedgerFeeds> {
    let session = storage::require_session()?;

    let service = match &args.service {
        Some(url) => ServiceUrl::new(url).context("Invalid service URL")?,
        None => session.service.clone(),
    };
    let config = session.feed_config(args.page_size)?;

    let ledger = RpcLedger::new(service).context("Failed to create ledger client")?;
    let provider = StaticSession::new(Some(session.account));

    LedgerFeeds::new(Arc::new(ledger), Arc::new(provider), config)
        .context("Invalid feed configuration")
}

/// Scroll through up to `pages` pages, then wait for their metadata.
pub async fn load<S: PageSource>(
    trigger: &ScrollTrigger<S>,
    pages: u32,
) -> Result<PaginationState<S::Record>> {
    let controller = trigger.controller();
    let mut viewport = Viewport::default();

    for _ in 0..pages {
        match trigger.observe(viewport).await {
            Some(FetchOutcome::Appended { added, skipped }) => {
                debug!(added, skipped, "page loaded");
            }
            Some(FetchOutcome::Failed(e)) => return Err(e).context("Failed to fetch page"),
            Some(outcome) => {
                debug!(?outcome, "paging stopped");
                break;
            }
            None => break,
        }
        let len = controller.snapshot().len();
        viewport = Viewport::at(len.saturating_sub(1));
    }

    settle_metadata(controller).await;
    Ok(controller.snapshot())
}

async fn settle_metadata<S: PageSource>(controller: &PaginationController<S>) {
    let ids: BTreeSet<TokenId> = controller
        .snapshot()
        .items
        .iter()
        .map(DisplayRecord::token_id)
        .collect();

    let cache = controller.cache();
    for id in ids {
        cache.resolve(id).await;
    }
    controller.refresh_metadata();
}
