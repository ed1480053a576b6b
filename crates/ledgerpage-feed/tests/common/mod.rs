use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use ledgerpage_core::{
    AccountId, AssetMetadata, Attribute, DistributionRecord, LedgerService, ListingRecord,
    PageResult, Result, SessionProvider, TokenAmount, TokenId,
};

pub fn listing(id: u64) -> ListingRecord {
    ListingRecord {
        token_id: TokenId::new(id),
        price: TokenAmount::from_raw(id),
    }
}

pub fn page(ids: &[u64], next_cursor: Option<u64>, has_more: bool) -> PageResult<ListingRecord> {
    PageResult {
        items: ids.iter().copied().map(listing).collect(),
        next_cursor,
        total: 3,
        has_more,
    }
}

/// Serves scripted listing pages; metadata calls wait for `release_metadata`.
pub struct ScriptedLedger {
    pages: Mutex<VecDeque<PageResult<ListingRecord>>>,
    locations: Mutex<HashMap<TokenId, String>>,
    metadata_gate: Semaphore,
    pub page_calls: AtomicUsize,
    pub metadata_calls: AtomicUsize,
}

impl ScriptedLedger {
    pub fn new(pages: Vec<PageResult<ListingRecord>>) -> Arc<Self> {
        Arc::new(Self {
            pages: Mutex::new(pages.into()),
            locations: Mutex::new(HashMap::new()),
            metadata_gate: Semaphore::new(0),
            page_calls: AtomicUsize::new(0),
            metadata_calls: AtomicUsize::new(0),
        })
    }

    pub fn set_location(&self, id: u64, location: &str) {
        self.locations
            .lock()
            .unwrap()
            .insert(TokenId::new(id), location.to_string());
    }

    pub fn release_metadata(&self, n: usize) {
        self.metadata_gate.add_permits(n);
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerService for ScriptedLedger {
    async fn get_listings(
        &self,
        _cursor: Option<u64>,
        _limit: u32,
    ) -> Result<PageResult<ListingRecord>> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(self
            .pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| PageResult::last(Vec::new())))
    }

    async fn get_user_revenue_transactions(
        &self,
        _account: &AccountId,
        _cursor: u64,
        _limit: u32,
    ) -> Result<PageResult<DistributionRecord>> {
        Ok(PageResult::last(Vec::new()))
    }

    async fn get_asset_metadata(&self, ids: &[TokenId]) -> Result<AssetMetadata> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        self.metadata_gate.acquire().await.unwrap().forget();
        let locations = self.locations.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| {
                locations
                    .get(id)
                    .map(|location| (*id, vec![Attribute::text("location", location.clone())]))
            })
            .collect())
    }
}

pub struct LoggedIn;

impl SessionProvider for LoggedIn {
    fn current_account(&self) -> Option<AccountId> {
        AccountId::new("2vxsx-fae").ok()
    }
}
