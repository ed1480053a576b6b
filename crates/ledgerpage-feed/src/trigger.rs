//! Near-end-of-content trigger.
//!
//! The sentinel is the last rendered item. Each sentinel may request at most
//! one page; the trigger re-arms itself once a fetch has succeeded, even one
//! that added nothing, or a reset has started a new epoch.

use std::sync::Mutex;

use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::controller::{FetchOutcome, PaginationController};
use crate::source::PageSource;

/// Visible range reported by the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Index of the last item currently visible, `None` if nothing is.
    pub last_visible: Option<usize>,
}

impl Viewport {
    pub fn at(last_visible: usize) -> Self {
        Self {
            last_visible: Some(last_visible),
        }
    }
}

/// What the trigger decided for one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The next page should be requested.
    Fire,
    /// The sentinel is not close to the viewport.
    NotNearEnd,
    /// This sentinel has already requested a page.
    AlreadyFired,
    Busy,
    Exhausted,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sentinel {
    epoch: u64,
    pages: u64,
}

/// Requests the next page when the viewport reaches the end of the list.
pub struct ScrollTrigger<S: PageSource> {
    controller: PaginationController<S>,
    threshold: usize,
    fired: Mutex<Option<Sentinel>>,
}

impl<S: PageSource> ScrollTrigger<S> {
    /// `threshold` is how many items before the last one count as "near".
    pub fn new(controller: PaginationController<S>, threshold: usize) -> Self {
        Self {
            controller,
            threshold,
            fired: Mutex::new(None),
        }
    }

    /// Decide whether `viewport` crosses the sentinel.
    ///
    /// A `Fire` decision consumes the current sentinel.
    pub fn evaluate(&self, viewport: Viewport) -> Decision {
        let status = self.controller.status();
        if status.closed {
            return Decision::Closed;
        }
        if status.busy {
            return Decision::Busy;
        }
        if !status.has_more {
            return Decision::Exhausted;
        }

        // An empty list has its sentinel at the top, which is always in view.
        let near_end = status.len == 0
            || viewport.last_visible.is_some_and(|last| {
                last.saturating_add(self.threshold).saturating_add(1) >= status.len
            });
        if !near_end {
            return Decision::NotNearEnd;
        }

        let sentinel = Sentinel {
            epoch: status.epoch,
            pages: status.pages,
        };
        let mut fired = self.fired.lock().unwrap_or_else(|e| e.into_inner());
        if *fired == Some(sentinel) {
            trace!(?sentinel, "sentinel already fired");
            return Decision::AlreadyFired;
        }
        *fired = Some(sentinel);
        Decision::Fire
    }

    /// Evaluate `viewport` and fetch the next page if it crosses the sentinel.
    pub async fn observe(&self, viewport: Viewport) -> Option<FetchOutcome> {
        match self.evaluate(viewport) {
            Decision::Fire => {
                debug!(source = S::NAME, "sentinel crossed, fetching next page");
                Some(self.controller.fetch_next().await)
            }
            _ => None,
        }
    }

    /// Like [`observe`](Self::observe), but runs the fetch on a task.
    pub fn spawn_observe(&self, viewport: Viewport) -> Option<JoinHandle<FetchOutcome>> {
        match self.evaluate(viewport) {
            Decision::Fire => {
                debug!(source = S::NAME, "sentinel crossed, fetching next page");
                let controller = self.controller.clone();
                Some(tokio::spawn(async move { controller.fetch_next().await }))
            }
            _ => None,
        }
    }

    /// Let the current sentinel fire again, e.g. after a failed fetch.
    pub fn rearm(&self) {
        *self.fired.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn controller(&self) -> &PaginationController<S> {
        &self.controller
    }
}
