//! Lazily populated asset metadata cache.
//!
//! Lookups never wait: an unknown token gets a placeholder entry right away
//! and a background call to the ledger is scheduled for it. Concurrent
//! requests for a token that is already being fetched share the pending
//! call through the in-flight table, which only holds a token until its
//! call completes.
//!
//! Completed resolutions are announced on a broadcast channel carrying the
//! token id, so that views can re-merge the affected records.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tracing::{debug, instrument, warn};

use ledgerpage_core::{
    AssetMetadata, Error, LedgerService, MetadataEntry, Result, SessionProvider, TokenId,
};

/// Capacity of the resolution event channel.
const EVENT_CAPACITY: usize = 256;

/// A metadata call shared by every token it covers.
pub type PendingBatch = Shared<BoxFuture<'static, ()>>;

/// Cache-aside store of [`MetadataEntry`] values keyed by token.
///
/// Cloning is cheap; clones share the same entries.
#[derive(Clone)]
pub struct MetadataCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    service: Arc<dyn LedgerService>,
    session: Arc<dyn SessionProvider>,
    state: Mutex<CacheState>,
    events: broadcast::Sender<TokenId>,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<TokenId, MetadataEntry>,
    in_flight: HashMap<TokenId, PendingBatch>,
    generation: u64,
}

impl MetadataCache {
    pub fn new(service: Arc<dyn LedgerService>, session: Arc<dyn SessionProvider>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(CacheInner {
                service,
                session,
                state: Mutex::new(CacheState::default()),
                events,
            }),
        }
    }

    /// Returns the entry for `id`, scheduling a resolution if it is unknown.
    ///
    /// The returned entry is a placeholder until the resolution lands.
    pub fn get(&self, id: TokenId) -> MetadataEntry {
        self.request(&[id]);
        self.peek(id).unwrap_or_else(|| MetadataEntry::placeholder(id))
    }

    /// Returns the cached entry for `id` without scheduling anything.
    pub fn peek(&self, id: TokenId) -> Option<MetadataEntry> {
        self.inner.lock().entries.get(&id).cloned()
    }

    /// Schedule one batched resolution covering every unknown id.
    ///
    /// Ids that are already cached, placeholders included, are left alone.
    /// Returns the pending call, or `None` if nothing had to be fetched.
    pub fn request(&self, ids: &[TokenId]) -> Option<PendingBatch> {
        if self.inner.session.current_account().is_none() {
            debug!(count = ids.len(), "no active account, metadata not requested");
            return None;
        }

        let mut seen = HashSet::new();
        let pending = {
            let mut state = self.inner.lock();
            let missing: Vec<TokenId> = ids
                .iter()
                .copied()
                .filter(|id| !state.entries.contains_key(id) && seen.insert(*id))
                .collect();

            if missing.is_empty() {
                return None;
            }

            for id in &missing {
                state.entries.insert(*id, MetadataEntry::placeholder(*id));
            }

            let pending = resolve_batch(
                Arc::clone(&self.inner.service),
                Arc::downgrade(&self.inner),
                missing.clone(),
                state.generation,
            )
            .boxed()
            .shared();

            for id in missing {
                state.in_flight.insert(id, pending.clone());
            }
            pending
        };

        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(pending.clone());
            }
            Err(_) => warn!("no async runtime, metadata resolves only when awaited"),
        }

        Some(pending)
    }

    /// Wait for the entry of `id` to settle and return it.
    ///
    /// Joins an in-flight call when there is one, otherwise starts one. A
    /// failed or unknown token yields its placeholder.
    pub async fn resolve(&self, id: TokenId) -> MetadataEntry {
        let in_flight = self.inner.lock().in_flight.get(&id).cloned();
        if let Some(pending) = in_flight.or_else(|| self.request(&[id])) {
            pending.await;
        }
        self.peek(id).unwrap_or_else(|| MetadataEntry::placeholder(id))
    }

    /// Drop every entry and forget in-flight calls.
    ///
    /// Calls issued before the clear still complete, but their results are
    /// discarded. The next `get` for any token fetches it again.
    pub fn clear(&self) {
        let mut state = self.inner.lock();
        state.generation += 1;
        state.entries.clear();
        state.in_flight.clear();
        debug!(generation = state.generation, "metadata cache cleared");
    }

    /// Subscribe to resolution events.
    pub fn subscribe(&self) -> broadcast::Receiver<TokenId> {
        self.inner.events.subscribe()
    }

    /// Number of cached entries, placeholders included.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of tokens with a call in flight.
    pub fn in_flight(&self) -> usize {
        self.inner.lock().in_flight.len()
    }
}

impl std::fmt::Debug for MetadataCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("MetadataCache")
            .field("entries", &state.entries.len())
            .field("in_flight", &state.in_flight.len())
            .field("generation", &state.generation)
            .finish()
    }
}

impl CacheInner {
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn complete(&self, ids: Vec<TokenId>, generation: u64, result: Result<AssetMetadata>) {
        let mut resolved = Vec::with_capacity(ids.len());
        {
            let mut state = self.lock();
            if state.generation != generation {
                debug!(count = ids.len(), "discarding metadata from a cleared cache");
                return;
            }

            for id in &ids {
                state.in_flight.remove(id);
            }

            match result {
                Ok(mut found) => {
                    for id in ids {
                        match found.remove(&id) {
                            Some(attributes) => {
                                state
                                    .entries
                                    .insert(id, MetadataEntry::from_attributes(id, &attributes));
                                resolved.push(id);
                            }
                            None => {
                                let err = Error::MetadataResolution {
                                    token_id: id,
                                    reason: "not returned by the ledger".to_string(),
                                };
                                warn!(error = %err, "keeping placeholder");
                            }
                        }
                    }
                }
                Err(err) => {
                    warn!(
                        error = %err,
                        count = ids.len(),
                        "metadata resolution failed, keeping placeholders"
                    );
                }
            }
        }

        for id in resolved {
            // No subscribers is fine.
            let _ = self.events.send(id);
        }
    }
}

#[instrument(skip(service, cache), fields(count = ids.len()))]
async fn resolve_batch(
    service: Arc<dyn LedgerService>,
    cache: Weak<CacheInner>,
    ids: Vec<TokenId>,
    generation: u64,
) {
    debug!("resolving metadata");
    let result = service.get_asset_metadata(&ids).await;

    if let Some(cache) = cache.upgrade() {
        cache.complete(ids, generation, result);
    }
}
