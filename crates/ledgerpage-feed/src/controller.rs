//! Cursor state machine for one growing collection.
//!
//! A controller owns the [`PaginationState`] of a single collection. At
//! most one page fetch is in flight at a time; a fetch requested while one
//! is running is dropped rather than queued. State lives in a
//! [`tokio::sync::watch`] channel so views can subscribe to every change.
//!
//! Completions are tagged with the epoch they started in. A reset or close
//! bumps the epoch, and a completion from an older epoch is thrown away.

use std::sync::{Arc, Weak};

use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use ledgerpage_core::{Error, SessionProvider, TokenId};

use crate::aggregate::{self, DisplayRecord};
use crate::cache::MetadataCache;
use crate::source::PageSource;

/// Coarse phase of a collection, derived from its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Fetching,
    Exhausted,
}

/// Read-only snapshot of one paginated collection.
#[derive(Debug, Clone)]
pub struct PaginationState<R> {
    /// Cursor for the next page; `None` before the first page.
    pub cursor: Option<u64>,
    /// Records in arrival order, unique by primary key.
    pub items: Vec<DisplayRecord<R>>,
    pub has_more: bool,
    pub busy: bool,
    /// Collection size reported by the most recent page.
    pub total: u64,
    /// Pages fetched successfully since the last reset.
    pub pages: u64,
    /// Failure of the most recent fetch, if it failed.
    pub error: Option<Error>,
    /// Incremented by every reset.
    pub epoch: u64,
    pub(crate) closed: bool,
}

impl<R> PaginationState<R> {
    fn initial(epoch: u64) -> Self {
        Self {
            cursor: None,
            items: Vec::new(),
            has_more: true,
            busy: false,
            total: 0,
            pages: 0,
            error: None,
            epoch,
            closed: false,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.busy {
            Phase::Fetching
        } else if !self.has_more {
            Phase::Exhausted
        } else {
            Phase::Idle
        }
    }

    pub fn is_exhausted(&self) -> bool {
        !self.has_more
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Why a fetch request did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another fetch is in flight.
    Busy,
    /// The last page has been reached.
    Exhausted,
    /// The owning view was torn down.
    Closed,
    /// No active account.
    AuthRequired,
}

/// Result of one [`PaginationController::fetch_next`] call.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// A page arrived; `skipped` records were already present.
    Appended { added: usize, skipped: usize },
    /// Nothing was fetched.
    Skipped(SkipReason),
    /// The fetch failed; the error is also recorded in the state.
    Failed(Error),
    /// The page arrived after a reset or close and was dropped.
    Discarded,
}

/// Cheap view of the fields a trigger needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub epoch: u64,
    pub pages: u64,
    pub len: usize,
    pub busy: bool,
    pub has_more: bool,
    pub closed: bool,
}

/// Drives one paginated collection.
///
/// Cloning is cheap; clones drive the same state.
pub struct PaginationController<S: PageSource> {
    inner: Arc<ControllerInner<S>>,
}

impl<S: PageSource> Clone for PaginationController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ControllerInner<S: PageSource> {
    source: S,
    cache: MetadataCache,
    session: Arc<dyn SessionProvider>,
    page_size: u32,
    state: watch::Sender<PaginationState<S::Record>>,
}

impl<S: PageSource> PaginationController<S> {
    pub fn new(
        source: S,
        cache: MetadataCache,
        session: Arc<dyn SessionProvider>,
        page_size: u32,
    ) -> Self {
        let (state, _) = watch::channel(PaginationState::initial(0));
        Self {
            inner: Arc::new(ControllerInner {
                source,
                cache,
                session,
                page_size,
                state,
            }),
        }
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> PaginationState<S::Record> {
        self.inner.state.borrow().clone()
    }

    pub fn status(&self) -> Status {
        let state = self.inner.state.borrow();
        Status {
            epoch: state.epoch,
            pages: state.pages,
            len: state.items.len(),
            busy: state.busy,
            has_more: state.has_more,
            closed: state.closed,
        }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<PaginationState<S::Record>> {
        self.inner.state.subscribe()
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.inner.cache
    }

    /// Fetch and append the next page.
    ///
    /// Does nothing while a fetch is in flight, after the last page, after
    /// [`close`](Self::close), or without an active account. Failures are
    /// recorded in the state and never retried automatically.
    #[instrument(skip(self), fields(source = S::NAME))]
    pub async fn fetch_next(&self) -> FetchOutcome {
        let Some(account) = self.inner.session.current_account() else {
            self.inner.state.send_if_modified(|state| {
                if state.closed || matches!(state.error, Some(Error::AuthRequired)) {
                    return false;
                }
                state.error = Some(Error::AuthRequired);
                true
            });
            debug!("no active account, fetch skipped");
            return FetchOutcome::Skipped(SkipReason::AuthRequired);
        };

        let mut start = Err(SkipReason::Busy);
        self.inner.state.send_if_modified(|state| {
            start = if state.closed {
                Err(SkipReason::Closed)
            } else if state.busy {
                Err(SkipReason::Busy)
            } else if !state.has_more {
                Err(SkipReason::Exhausted)
            } else {
                state.busy = true;
                Ok((state.cursor, state.epoch))
            };
            start.is_ok()
        });

        let (cursor, epoch) = match start {
            Ok(start) => start,
            Err(reason) => {
                debug!(?reason, "fetch skipped");
                return FetchOutcome::Skipped(reason);
            }
        };

        debug!(?cursor, limit = self.inner.page_size, "fetching page");
        let result = self
            .inner
            .source
            .fetch_page(&account, cursor, self.inner.page_size)
            .await;

        let mut outcome = FetchOutcome::Discarded;
        match result {
            Ok(page) => {
                self.inner.state.send_if_modified(|state| {
                    if state.closed || state.epoch != epoch {
                        return false;
                    }

                    let incoming = aggregate::merge(&page.items, &self.inner.cache);
                    let (added, skipped) = aggregate::dedup_append(&mut state.items, incoming);
                    state.cursor = page.next_cursor;
                    state.has_more = page.has_more;
                    state.total = page.total;
                    state.pages += 1;
                    state.busy = false;
                    state.error = None;

                    debug!(
                        added,
                        skipped,
                        next_cursor = ?page.next_cursor,
                        has_more = page.has_more,
                        "page appended"
                    );
                    outcome = FetchOutcome::Appended { added, skipped };
                    true
                });
            }
            Err(err) => {
                warn!(error = %err, "page fetch failed");
                self.inner.state.send_if_modified(|state| {
                    if state.closed || state.epoch != epoch {
                        return false;
                    }
                    state.busy = false;
                    state.error = Some(err.clone());
                    outcome = FetchOutcome::Failed(err);
                    true
                });
            }
        }

        if matches!(outcome, FetchOutcome::Discarded) {
            debug!(epoch, "stale page discarded");
        }
        outcome
    }

    /// Manual retry after a failure: clears the recorded error and fetches.
    pub async fn retry(&self) -> FetchOutcome {
        self.inner.state.send_if_modified(|state| state.error.take().is_some());
        self.fetch_next().await
    }

    /// Discard every item and start over from the first page.
    ///
    /// A fetch in flight when this is called completes into the void.
    pub fn reset(&self) {
        self.inner.state.send_if_modified(|state| {
            if state.closed {
                return false;
            }
            *state = PaginationState::initial(state.epoch + 1);
            info!(source = S::NAME, epoch = state.epoch, "pagination reset");
            true
        });
    }

    /// Tear down: drop in-flight results and ignore further fetches.
    pub fn close(&self) {
        self.inner.state.send_modify(|state| {
            state.closed = true;
            state.busy = false;
            state.epoch += 1;
        });
        debug!(source = S::NAME, "pagination closed");
    }

    /// Rebuild the records of `id` from the cache.
    pub fn apply_metadata(&self, id: TokenId) {
        self.inner.apply_metadata(id);
    }

    /// Rebuild every record from the cache.
    pub fn refresh_metadata(&self) {
        self.inner.refresh_metadata();
    }

    /// Keep records in step with metadata resolutions.
    ///
    /// Entries that resolved before the call are merged right away. The
    /// returned task ends when the controller is closed or dropped.
    pub fn watch_metadata(&self) -> JoinHandle<()> {
        let weak: Weak<ControllerInner<S>> = Arc::downgrade(&self.inner);
        let mut events = self.inner.cache.subscribe();
        let mut state_rx = self.inner.state.subscribe();
        self.inner.refresh_metadata();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    event = events.recv() => {
                        let Some(inner) = weak.upgrade() else { break };
                        match event {
                            Ok(id) => inner.apply_metadata(id),
                            Err(RecvError::Lagged(missed)) => {
                                debug!(missed, "metadata events lagged, rebuilding all records");
                                inner.refresh_metadata();
                            }
                            Err(RecvError::Closed) => break,
                        }
                    }
                    changed = state_rx.changed() => {
                        if changed.is_err() || state_rx.borrow_and_update().closed {
                            break;
                        }
                    }
                }
            }
            debug!(source = S::NAME, "metadata watch stopped");
        })
    }
}

impl<S: PageSource> ControllerInner<S> {
    fn apply_metadata(&self, id: TokenId) {
        let Some(entry) = self.cache.peek(id) else {
            return;
        };
        self.state.send_if_modified(|state| {
            match aggregate::remerge(&state.items, &entry) {
                Some(items) => {
                    state.items = items;
                    true
                }
                None => false,
            }
        });
    }

    fn refresh_metadata(&self) {
        self.state.send_if_modified(|state| {
            let items = aggregate::remerge_all(&state.items, |id| self.cache.get(id));
            if items == state.items {
                return false;
            }
            state.items = items;
            true
        });
    }
}

impl<S: PageSource> std::fmt::Debug for PaginationController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationController")
            .field("source", &S::NAME)
            .field("status", &self.status())
            .finish()
    }
}
