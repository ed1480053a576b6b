//! Raw record types.

use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::amount::TokenAmount;
use crate::types::{RecordId, TokenId};

/// A record fetched from a paginated ledger query.
///
/// Every record has a primary key used for page-merge deduplication and
/// references the token whose metadata it is displayed with.
pub trait RawRecord: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Primary key type.
    type Key: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// Returns the primary key of this record.
    fn primary_key(&self) -> Self::Key;

    /// Returns the token this record refers to.
    fn token_id(&self) -> TokenId;
}

/// A marketplace listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    /// The listed token.
    pub token_id: TokenId,

    /// Asking price.
    pub price: TokenAmount,
}

impl RawRecord for ListingRecord {
    type Key = TokenId;

    fn primary_key(&self) -> TokenId {
        self.token_id
    }

    fn token_id(&self) -> TokenId {
        self.token_id
    }
}

/// A revenue-distribution event paid out for a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionRecord {
    /// Ledger-assigned record id.
    pub record_id: RecordId,

    /// The token the revenue was distributed for.
    pub token_id: TokenId,

    /// Distributed amount.
    pub amount: TokenAmount,

    /// Distribution time in nanoseconds since the Unix epoch.
    pub distributed_at: u64,
}

impl DistributionRecord {
    /// Returns the distribution time as a UTC timestamp.
    ///
    /// Returns `None` if the nanosecond value does not fit the supported range.
    pub fn distributed_at_utc(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.distributed_at)
            .ok()
            .map(DateTime::<Utc>::from_timestamp_nanos)
    }
}

impl RawRecord for DistributionRecord {
    type Key = RecordId;

    fn primary_key(&self) -> RecordId {
        self.record_id
    }

    fn token_id(&self) -> TokenId {
        self.token_id
    }
}
