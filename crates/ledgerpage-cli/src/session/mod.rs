//! Persisted login state.

pub mod storage;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use ledgerpage_core::{AccountId, ServiceUrl};
use ledgerpage_feed::FeedConfig;

/// The session stored between invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliSession {
    pub account: AccountId,
    pub service: ServiceUrl,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl CliSession {
    /// Engine configuration for this session, with `page_size` overriding
    /// the stored value.
    pub fn feed_config(&self, page_size: Option<u32>) -> Result<FeedConfig> {
        let mut config = FeedConfig::default();
        if let Some(size) = page_size.or(self.page_size) {
            config.page_size = size;
        }
        config.validate().context("Invalid page size")?;
        Ok(config)
    }
}
