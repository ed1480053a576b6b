//! Ledger service trait.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;
use crate::records::{Attribute, DistributionRecord, ListingRecord, PageResult};
use crate::types::{AccountId, TokenId};

/// Raw attribute lists keyed by token.
pub type AssetMetadata = HashMap<TokenId, Vec<Attribute>>;

/// The remote, ledger-style asset service.
///
/// Implementations are transport specific; the engine only relies on the
/// shapes below.
#[async_trait]
pub trait LedgerService: Send + Sync {
    /// Fetch one page of marketplace listings.
    async fn get_listings(
        &self,
        cursor: Option<u64>,
        limit: u32,
    ) -> Result<PageResult<ListingRecord>>;

    /// Fetch one page of revenue distributions paid to `account`.
    async fn get_user_revenue_transactions(
        &self,
        account: &AccountId,
        cursor: u64,
        limit: u32,
    ) -> Result<PageResult<DistributionRecord>>;

    /// Fetch raw attributes for a batch of tokens.
    ///
    /// Tokens unknown to the ledger are absent from the returned map.
    async fn get_asset_metadata(&self, ids: &[TokenId]) -> Result<AssetMetadata>;
}

#[async_trait]
impl<T: LedgerService + ?Sized> LedgerService for Arc<T> {
    async fn get_listings(
        &self,
        cursor: Option<u64>,
        limit: u32,
    ) -> Result<PageResult<ListingRecord>> {
        (**self).get_listings(cursor, limit).await
    }

    async fn get_user_revenue_transactions(
        &self,
        account: &AccountId,
        cursor: u64,
        limit: u32,
    ) -> Result<PageResult<DistributionRecord>> {
        (**self)
            .get_user_revenue_transactions(account, cursor, limit)
            .await
    }

    async fn get_asset_metadata(&self, ids: &[TokenId]) -> Result<AssetMetadata> {
        (**self).get_asset_metadata(ids).await
    }
}
