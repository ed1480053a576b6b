//! RPC-backed ledger service.

use async_trait::async_trait;
use tracing::{debug, instrument};

use ledgerpage_core::{
    AccountId, AssetMetadata, DistributionRecord, LedgerService, ListingRecord, PageResult,
    Result, ServiceUrl, TokenId, WirePage,
};

use crate::client::RpcClient;
use crate::endpoints::*;

/// A network-backed ledger service.
#[derive(Debug, Clone)]
pub struct RpcLedger {
    client: RpcClient,
}

impl RpcLedger {
    /// Create a ledger client for the given service URL.
    pub fn new(service: ServiceUrl) -> Result<Self> {
        Ok(Self {
            client: RpcClient::new(service)?,
        })
    }

    pub fn service(&self) -> &ServiceUrl {
        self.client.service()
    }
}

#[async_trait]
impl LedgerService for RpcLedger {
    #[instrument(skip(self))]
    async fn get_listings(
        &self,
        cursor: Option<u64>,
        limit: u32,
    ) -> Result<PageResult<ListingRecord>> {
        let page: WirePage<ListingRecord> = self
            .client
            .query(GET_LISTINGS, &ListingsQuery { cursor, limit })
            .await?;
        let page = page.into_page()?;
        debug!(items = page.items.len(), has_more = page.has_more, "listings page");
        Ok(page)
    }

    #[instrument(skip(self, account), fields(account = %account))]
    async fn get_user_revenue_transactions(
        &self,
        account: &AccountId,
        cursor: u64,
        limit: u32,
    ) -> Result<PageResult<DistributionRecord>> {
        let query = RevenueQuery {
            account: account.as_str(),
            cursor,
            limit,
        };
        let page: WirePage<DistributionRecord> = self
            .client
            .query(GET_USER_REVENUE_TRANSACTIONS, &query)
            .await?;
        let page = page.into_page()?;
        debug!(items = page.items.len(), has_more = page.has_more, "revenue page");
        Ok(page)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn get_asset_metadata(&self, ids: &[TokenId]) -> Result<AssetMetadata> {
        if ids.is_empty() {
            return Ok(AssetMetadata::new());
        }

        let query = MetadataQuery {
            ids: ids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
        };
        let response: MetadataResponse = self.client.query(GET_ASSET_METADATA, &query).await?;
        debug!(resolved = response.assets.len(), "asset metadata");

        Ok(response
            .assets
            .into_iter()
            .map(|asset| (asset.token_id, asset.attributes))
            .collect())
    }
}
