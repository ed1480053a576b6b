//! Aggregate figures derived from the records loaded so far.
//!
//! Summaries are recomputed from scratch over all items on every call,
//! which is O(n) per page. That keeps them trivially consistent with the
//! item list after resets and re-merges.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use ledgerpage_core::{DistributionRecord, ListingRecord, TokenAmount, TokenId};

use crate::aggregate::DisplayRecord;
use crate::controller::PaginationState;

/// Totals over loaded revenue distributions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSummary {
    pub total: TokenAmount,
    pub records: usize,
    /// Number of distinct tokens that received revenue.
    pub tokens: usize,
    pub latest: Option<DateTime<Utc>>,
    pub per_token: BTreeMap<TokenId, TokenAmount>,
}

/// Totals over loaded marketplace listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    pub listings: usize,
    /// Lowest asking price.
    pub floor: Option<TokenAmount>,
    pub total_value: TokenAmount,
    /// Chargers across listings whose metadata has resolved.
    pub chargers: u64,
    /// Listings still showing placeholder metadata.
    pub unresolved: usize,
}

pub fn summarize_revenue(items: &[DisplayRecord<DistributionRecord>]) -> RevenueSummary {
    let mut per_token: BTreeMap<TokenId, TokenAmount> = BTreeMap::new();
    for item in items {
        let slot = per_token.entry(item.record.token_id).or_default();
        *slot = slot.saturating_add(item.record.amount);
    }

    RevenueSummary {
        total: items.iter().map(|item| item.record.amount).sum(),
        records: items.len(),
        tokens: per_token.len(),
        latest: items
            .iter()
            .max_by_key(|item| item.record.distributed_at)
            .and_then(|item| item.record.distributed_at_utc()),
        per_token,
    }
}

pub fn summarize_listings(items: &[DisplayRecord<ListingRecord>]) -> ListingSummary {
    let mut seen = HashSet::new();
    let mut chargers = 0u64;
    for item in items.iter().filter(|item| item.is_resolved()) {
        if seen.insert(item.token_id()) {
            chargers = chargers.saturating_add(item.metadata.charger_count);
        }
    }

    ListingSummary {
        listings: items.len(),
        floor: items.iter().map(|item| item.record.price).min(),
        total_value: items.iter().map(|item| item.record.price).sum(),
        chargers,
        unresolved: items.iter().filter(|item| !item.is_resolved()).count(),
    }
}

impl PaginationState<DistributionRecord> {
    pub fn summary(&self) -> RevenueSummary {
        summarize_revenue(&self.items)
    }
}

impl PaginationState<ListingRecord> {
    pub fn summary(&self) -> ListingSummary {
        summarize_listings(&self.items)
    }
}
