//! Asset metadata entries and their raw attribute form.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::amount::TokenAmount;
use crate::types::TokenId;

/// Text shown for metadata fields that have not been resolved yet.
pub const PLACEHOLDER: &str = "loading";

/// A raw attribute value as returned by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    Text(String),
    Nat(u64),
}

impl AttributeValue {
    fn as_text(&self) -> String {
        match self {
            AttributeValue::Text(s) => s.clone(),
            AttributeValue::Nat(n) => n.to_string(),
        }
    }

    fn as_nat(&self) -> Option<u64> {
        match self {
            AttributeValue::Nat(n) => Some(*n),
            AttributeValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// A `(key, value)` attribute pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute(pub String, pub AttributeValue);

impl Attribute {
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self(key.into(), AttributeValue::Text(value.into()))
    }

    pub fn nat(key: impl Into<String>, value: u64) -> Self {
        Self(key.into(), AttributeValue::Nat(value))
    }

    pub fn key(&self) -> &str {
        &self.0
    }

    pub fn value(&self) -> &AttributeValue {
        &self.1
    }
}

/// Display attributes of one asset token.
///
/// Entries with `resolved == false` are placeholders, shown while the
/// attributes are being fetched or after a fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataEntry {
    pub token_id: TokenId,
    pub name: String,
    pub location: String,
    pub charger_count: u64,
    pub price: TokenAmount,
    pub resolved: bool,
}

impl MetadataEntry {
    /// A placeholder entry for a token whose attributes are not known yet.
    pub fn placeholder(token_id: TokenId) -> Self {
        Self {
            token_id,
            name: PLACEHOLDER.to_string(),
            location: PLACEHOLDER.to_string(),
            charger_count: 0,
            price: TokenAmount::ZERO,
            resolved: false,
        }
    }

    /// Build a resolved entry from a raw attribute list.
    ///
    /// Fields are looked up by key; missing or unreadable fields keep their
    /// placeholder value. Later duplicates of a key win.
    pub fn from_attributes(token_id: TokenId, attributes: &[Attribute]) -> Self {
        let mut entry = Self::placeholder(token_id);
        entry.resolved = true;

        for Attribute(key, value) in attributes {
            match key.as_str() {
                "name" => entry.name = value.as_text(),
                "location" => entry.location = value.as_text(),
                "chargerCount" | "charger_count" => match value.as_nat() {
                    Some(n) => entry.charger_count = n,
                    None => debug!(%token_id, ?value, "unreadable charger count"),
                },
                "price" => match value.as_nat() {
                    Some(raw) => entry.price = TokenAmount::from_raw(raw),
                    None => debug!(%token_id, ?value, "unreadable price"),
                },
                _ => {}
            }
        }

        entry
    }

    pub fn is_placeholder(&self) -> bool {
        !self.resolved
    }
}
