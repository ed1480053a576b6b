//! Engine configuration.

use serde::{Deserialize, Serialize};

use ledgerpage_core::error::{Error, InvalidInputError};

/// Largest page the ledger serves.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Tunables shared by every collection of a [`LedgerFeeds`](crate::LedgerFeeds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Records requested per page.
    pub page_size: u32,
    /// Items before the last one at which the scroll trigger fires.
    pub trigger_threshold: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            trigger_threshold: 3,
        }
    }
}

impl FeedConfig {
    /// Check the values are usable.
    ///
    /// # Errors
    ///
    /// Returns an error if `page_size` is zero or above [`MAX_PAGE_SIZE`].
    pub fn validate(&self) -> Result<(), Error> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(InvalidInputError::Other {
                message: format!(
                    "page size must be between 1 and {}, got {}",
                    MAX_PAGE_SIZE, self.page_size
                ),
            }
            .into());
        }
        Ok(())
    }
}
