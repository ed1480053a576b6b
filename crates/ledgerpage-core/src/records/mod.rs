//! Ledger records, pages and asset metadata.
//!
//! These are the shapes the remote service hands back. They are immutable
//! once fetched; the engine only ever builds new values from them.

mod metadata;
mod page;
mod types;

pub use metadata::{Attribute, AttributeValue, MetadataEntry, PLACEHOLDER};
pub use page::{PageResult, WirePage};
pub use types::{DistributionRecord, ListingRecord, RawRecord};
