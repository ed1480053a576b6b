//! In-memory ledger used by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use ledgerpage_core::error::TransportError;
use ledgerpage_core::{
    AccountId, AssetMetadata, Attribute, DistributionRecord, Error, LedgerService,
    ListingRecord, PageResult, RecordId, Result, SessionProvider, TokenAmount, TokenId,
};

pub(crate) fn listing(id: u64) -> ListingRecord {
    ListingRecord {
        token_id: TokenId::new(id),
        price: TokenAmount::from_raw(id * 100_000_000),
    }
}

pub(crate) fn distribution(record: u64, token: u64, amount: u64) -> DistributionRecord {
    DistributionRecord {
        record_id: RecordId::new(record),
        token_id: TokenId::new(token),
        amount: TokenAmount::from_raw(amount),
        distributed_at: 1_700_000_000_000_000_000 + record,
    }
}

pub(crate) fn page<T>(items: Vec<T>, next_cursor: Option<u64>, has_more: bool) -> PageResult<T> {
    let total = items.len() as u64;
    PageResult {
        items,
        next_cursor,
        total,
        has_more,
    }
}

pub(crate) fn transport_error() -> Error {
    Error::Transport(TransportError::Connection {
        message: "connection reset".to_string(),
    })
}

/// A scripted ledger. Pages are served in order; metadata is looked up in a map.
pub(crate) struct FakeLedger {
    listings: Mutex<VecDeque<Result<PageResult<ListingRecord>>>>,
    revenue: Mutex<VecDeque<Result<PageResult<DistributionRecord>>>>,
    metadata: Mutex<HashMap<TokenId, Vec<Attribute>>>,
    metadata_error: Mutex<Option<Error>>,
    page_gate: Semaphore,
    metadata_gate: Semaphore,
    pub listing_calls: AtomicUsize,
    pub revenue_calls: AtomicUsize,
    pub metadata_calls: AtomicUsize,
    pub cursors: Mutex<Vec<Option<u64>>>,
    pub metadata_batches: Mutex<Vec<Vec<TokenId>>>,
}

impl FakeLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::with_gates(Semaphore::MAX_PERMITS, Semaphore::MAX_PERMITS))
    }

    /// Page calls block until [`FakeLedger::release_pages`] is called.
    pub fn with_held_pages() -> Arc<Self> {
        Arc::new(Self::with_gates(0, Semaphore::MAX_PERMITS))
    }

    /// Metadata calls block until [`FakeLedger::release_metadata`] is called.
    pub fn with_held_metadata() -> Arc<Self> {
        Arc::new(Self::with_gates(Semaphore::MAX_PERMITS, 0))
    }

    fn with_gates(pages: usize, metadata: usize) -> Self {
        Self {
            listings: Mutex::new(VecDeque::new()),
            revenue: Mutex::new(VecDeque::new()),
            metadata: Mutex::new(HashMap::new()),
            metadata_error: Mutex::new(None),
            page_gate: Semaphore::new(pages),
            metadata_gate: Semaphore::new(metadata),
            listing_calls: AtomicUsize::new(0),
            revenue_calls: AtomicUsize::new(0),
            metadata_calls: AtomicUsize::new(0),
            cursors: Mutex::new(Vec::new()),
            metadata_batches: Mutex::new(Vec::new()),
        }
    }

    pub fn push_listings(&self, page: Result<PageResult<ListingRecord>>) {
        self.listings.lock().unwrap().push_back(page);
    }

    pub fn push_revenue(&self, page: Result<PageResult<DistributionRecord>>) {
        self.revenue.lock().unwrap().push_back(page);
    }

    pub fn set_metadata(&self, id: u64, location: &str) {
        self.metadata.lock().unwrap().insert(
            TokenId::new(id),
            vec![
                Attribute::text("name", format!("Charger #{}", id)),
                Attribute::text("location", location),
                Attribute::nat("chargerCount", 2),
                Attribute::nat("price", id * 100_000_000),
            ],
        );
    }

    pub fn fail_metadata(&self, error: Error) {
        *self.metadata_error.lock().unwrap() = Some(error);
    }

    pub fn release_pages(&self, n: usize) {
        self.page_gate.add_permits(n);
    }

    pub fn release_metadata(&self, n: usize) {
        self.metadata_gate.add_permits(n);
    }

    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }

    pub fn listing_calls(&self) -> usize {
        self.listing_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerService for FakeLedger {
    async fn get_listings(
        &self,
        cursor: Option<u64>,
        _limit: u32,
    ) -> Result<PageResult<ListingRecord>> {
        self.listing_calls.fetch_add(1, Ordering::SeqCst);
        self.cursors.lock().unwrap().push(cursor);
        let permit = self.page_gate.acquire().await.unwrap();
        permit.forget();
        self.listings
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(page(Vec::new(), None, false)))
    }

    async fn get_user_revenue_transactions(
        &self,
        _account: &AccountId,
        cursor: u64,
        _limit: u32,
    ) -> Result<PageResult<DistributionRecord>> {
        self.revenue_calls.fetch_add(1, Ordering::SeqCst);
        self.cursors.lock().unwrap().push(Some(cursor));
        let permit = self.page_gate.acquire().await.unwrap();
        permit.forget();
        self.revenue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(page(Vec::new(), None, false)))
    }

    async fn get_asset_metadata(&self, ids: &[TokenId]) -> Result<AssetMetadata> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        self.metadata_batches.lock().unwrap().push(ids.to_vec());
        let permit = self.metadata_gate.acquire().await.unwrap();
        permit.forget();

        if let Some(error) = self.metadata_error.lock().unwrap().clone() {
            return Err(error);
        }

        let metadata = self.metadata.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| metadata.get(id).map(|attrs| (*id, attrs.clone())))
            .collect())
    }
}

/// A session whose account can be switched by the test.
pub(crate) struct TestSession(Mutex<Option<AccountId>>);

impl TestSession {
    pub fn logged_in() -> Arc<Self> {
        Arc::new(Self(Mutex::new(Some(AccountId::new("2vxsx-fae").unwrap()))))
    }

    pub fn anonymous() -> Arc<Self> {
        Arc::new(Self(Mutex::new(None)))
    }

    pub fn login(&self) {
        *self.0.lock().unwrap() = Some(AccountId::new("2vxsx-fae").unwrap());
    }
}

impl SessionProvider for TestSession {
    fn current_account(&self) -> Option<AccountId> {
        self.0.lock().unwrap().clone()
    }
}
