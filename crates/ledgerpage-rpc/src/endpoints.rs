//! RPC method names and request/response types.

use serde::{Deserialize, Serialize};

use ledgerpage_core::{Attribute, TokenId};

// ============================================================================
// Method Names
// ============================================================================

pub const GET_LISTINGS: &str = "getListings";

pub const GET_USER_REVENUE_TRANSACTIONS: &str = "getUserRevenueTransactions";

pub const GET_ASSET_METADATA: &str = "getAssetMetadata";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query for getListings.
#[derive(Debug, Serialize)]
pub struct ListingsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<u64>,
    pub limit: u32,
}

/// Query for getUserRevenueTransactions.
#[derive(Debug, Serialize)]
pub struct RevenueQuery<'a> {
    pub account: &'a str,
    pub cursor: u64,
    pub limit: u32,
}

/// Query for getAssetMetadata. `ids` is a comma-separated list.
#[derive(Debug, Serialize)]
pub struct MetadataQuery {
    pub ids: String,
}

/// Response from getAssetMetadata.
#[derive(Debug, Deserialize)]
pub struct MetadataResponse {
    #[serde(default)]
    pub assets: Vec<AssetAttributes>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAttributes {
    pub token_id: TokenId,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
