//! ledgerpage-core - Core ledger types and traits.

pub mod amount;
pub mod error;
pub mod records;
pub mod traits;
pub mod types;

pub use amount::{DECIMALS, TokenAmount};
pub use error::Error;
pub use records::{
    Attribute, AttributeValue, DistributionRecord, ListingRecord, MetadataEntry, PageResult,
    RawRecord, WirePage,
};
pub use traits::{AssetMetadata, LedgerService, SessionProvider};
pub use types::{AccountId, RecordId, ServiceUrl, TokenId};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
