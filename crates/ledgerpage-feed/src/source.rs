//! Paginated record collections.

use std::sync::Arc;

use async_trait::async_trait;

use ledgerpage_core::{
    AccountId, DistributionRecord, LedgerService, ListingRecord, PageResult, RawRecord, Result,
};

/// A cursor-paginated collection on the ledger.
#[async_trait]
pub trait PageSource: Send + Sync + 'static {
    /// Record type of this collection.
    type Record: RawRecord;

    /// Short name used in logs.
    const NAME: &'static str;

    /// Fetch the page starting at `cursor` (`None` for the first page).
    async fn fetch_page(
        &self,
        account: &AccountId,
        cursor: Option<u64>,
        limit: u32,
    ) -> Result<PageResult<Self::Record>>;
}

/// Marketplace listings.
#[derive(Clone)]
pub struct Listings {
    service: Arc<dyn LedgerService>,
}

impl Listings {
    pub fn new(service: Arc<dyn LedgerService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl PageSource for Listings {
    type Record = ListingRecord;

    const NAME: &'static str = "listings";

    async fn fetch_page(
        &self,
        _account: &AccountId,
        cursor: Option<u64>,
        limit: u32,
    ) -> Result<PageResult<ListingRecord>> {
        self.service.get_listings(cursor, limit).await
    }
}

/// Revenue distributions paid to the active account.
#[derive(Clone)]
pub struct Revenue {
    service: Arc<dyn LedgerService>,
}

impl Revenue {
    /// Cursor sent for the first page.
    pub const FIRST_CURSOR: u64 = 0;

    pub fn new(service: Arc<dyn LedgerService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl PageSource for Revenue {
    type Record = DistributionRecord;

    const NAME: &'static str = "revenue";

    async fn fetch_page(
        &self,
        account: &AccountId,
        cursor: Option<u64>,
        limit: u32,
    ) -> Result<PageResult<DistributionRecord>> {
        self.service
            .get_user_revenue_transactions(account, cursor.unwrap_or(Self::FIRST_CURSOR), limit)
            .await
    }
}
