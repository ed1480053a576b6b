//! Joining raw records with their metadata.
//!
//! A [`DisplayRecord`] is never edited in place. When its metadata changes
//! a new record is built and swapped in at the same position, so consumers
//! holding an older snapshot keep seeing consistent values.

use std::collections::HashSet;

use serde::Serialize;

use ledgerpage_core::{MetadataEntry, RawRecord, TokenId};

use crate::cache::MetadataCache;

/// A raw record joined with the metadata of the token it refers to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRecord<R> {
    pub record: R,
    pub metadata: MetadataEntry,
}

impl<R: RawRecord> DisplayRecord<R> {
    pub fn new(record: R, metadata: MetadataEntry) -> Self {
        Self { record, metadata }
    }

    /// Primary key of the underlying record.
    pub fn key(&self) -> R::Key {
        self.record.primary_key()
    }

    pub fn token_id(&self) -> TokenId {
        self.record.token_id()
    }

    pub fn is_resolved(&self) -> bool {
        self.metadata.resolved
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn location(&self) -> &str {
        &self.metadata.location
    }
}

/// Build display records for `raw`, in order, using `lookup` for metadata.
///
/// Output depends only on `raw` and what `lookup` returns.
pub fn merge_with<R, F>(raw: &[R], mut lookup: F) -> Vec<DisplayRecord<R>>
where
    R: RawRecord,
    F: FnMut(TokenId) -> MetadataEntry,
{
    raw.iter()
        .map(|record| DisplayRecord::new(record.clone(), lookup(record.token_id())))
        .collect()
}

/// Build display records for a freshly fetched page.
///
/// Every unknown token is requested from the cache in one batch first;
/// records whose metadata is still pending carry a placeholder.
pub fn merge<R: RawRecord>(raw: &[R], cache: &MetadataCache) -> Vec<DisplayRecord<R>> {
    let ids: Vec<TokenId> = raw.iter().map(RawRecord::token_id).collect();
    cache.request(&ids);
    merge_with(raw, |id| cache.get(id))
}

/// Rebuild the records referring to `entry.token_id`.
///
/// Returns `None` when no record is affected or nothing changed. Order and
/// primary keys are preserved.
pub fn remerge<R: RawRecord>(
    items: &[DisplayRecord<R>],
    entry: &MetadataEntry,
) -> Option<Vec<DisplayRecord<R>>> {
    let affected = items
        .iter()
        .any(|item| item.token_id() == entry.token_id && item.metadata != *entry);
    if !affected {
        return None;
    }

    Some(
        items
            .iter()
            .map(|item| {
                if item.token_id() == entry.token_id {
                    DisplayRecord::new(item.record.clone(), entry.clone())
                } else {
                    item.clone()
                }
            })
            .collect(),
    )
}

/// Rebuild every record from `lookup`, keeping order.
pub fn remerge_all<R, F>(items: &[DisplayRecord<R>], lookup: F) -> Vec<DisplayRecord<R>>
where
    R: RawRecord,
    F: FnMut(TokenId) -> MetadataEntry,
{
    let raw: Vec<R> = items.iter().map(|item| item.record.clone()).collect();
    merge_with(&raw, lookup)
}

/// Append `incoming` to `existing`, dropping records whose primary key is
/// already present (including duplicates within `incoming`).
///
/// Returns `(added, skipped)`.
pub fn dedup_append<R: RawRecord>(
    existing: &mut Vec<DisplayRecord<R>>,
    incoming: Vec<DisplayRecord<R>>,
) -> (usize, usize) {
    let mut keys: HashSet<R::Key> = existing.iter().map(DisplayRecord::key).collect();
    let before = existing.len();
    let offered = incoming.len();

    existing.extend(incoming.into_iter().filter(|item| keys.insert(item.key())));

    let added = existing.len() - before;
    (added, offered - added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeLedger, TestSession, distribution, listing};
    use ledgerpage_core::{ListingRecord, RecordId};

    fn resolved(id: u64, location: &str) -> MetadataEntry {
        let mut entry = MetadataEntry::placeholder(TokenId::new(id));
        entry.location = location.to_string();
        entry.resolved = true;
        entry
    }

    #[test]
    fn merge_with_is_order_preserving_and_pure() {
        let raw = vec![listing(3), listing(1), listing(2)];
        let lookup = |id: TokenId| resolved(id.get(), "Seoul");

        let a = merge_with(&raw, lookup);
        let b = merge_with(&raw, lookup);

        assert_eq!(a, b);
        let keys: Vec<u64> = a.iter().map(|r| r.key().get()).collect();
        assert_eq!(keys, vec![3, 1, 2]);
    }

    #[test]
    fn remerge_replaces_placeholder_in_place() {
        let raw = vec![listing(4), listing(5), listing(6)];
        let items = merge_with(&raw, MetadataEntry::placeholder);

        let updated = remerge(&items, &resolved(5, "Seoul")).unwrap();

        assert_eq!(updated.len(), 3);
        assert_eq!(updated[1].key(), TokenId::new(5));
        assert_eq!(updated[1].location(), "Seoul");
        assert_eq!(updated[0], items[0]);
        assert_eq!(updated[2], items[2]);
    }

    #[test]
    fn remerge_ignores_unrelated_tokens() {
        let items = merge_with(&[listing(1)], MetadataEntry::placeholder);
        assert!(remerge(&items, &resolved(2, "Busan")).is_none());

        let items = merge_with(&[listing(1)], |id| resolved(id.get(), "Busan"));
        assert!(remerge(&items, &resolved(1, "Busan")).is_none());
    }

    #[test]
    fn remerge_updates_every_record_of_a_token() {
        let raw = vec![distribution(1, 7, 10), distribution(2, 8, 10), distribution(3, 7, 10)];
        let items = merge_with(&raw, MetadataEntry::placeholder);

        let updated = remerge(&items, &resolved(7, "Ulsan")).unwrap();
        let locations: Vec<&str> = updated.iter().map(DisplayRecord::location).collect();
        assert_eq!(locations, vec!["Ulsan", "loading", "Ulsan"]);
        assert_eq!(updated[2].key(), RecordId::new(3));
    }

    #[test]
    fn dedup_append_drops_known_keys() {
        let mut items = merge_with(&[listing(1), listing(2)], MetadataEntry::placeholder);
        let incoming = merge_with(
            &[listing(2), listing(3), listing(3)],
            MetadataEntry::placeholder,
        );

        let (added, skipped) = dedup_append(&mut items, incoming);

        assert_eq!((added, skipped), (1, 2));
        let keys: Vec<u64> = items.iter().map(|r| r.key().get()).collect();
        assert_eq!(keys, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn merge_uses_placeholders_until_resolved() {
        let ledger = FakeLedger::with_held_metadata();
        ledger.set_metadata(5, "Seoul");
        let cache = MetadataCache::new(ledger.clone(), TestSession::logged_in());

        let raw: Vec<ListingRecord> = vec![listing(5)];
        let first = merge(&raw, &cache);
        assert_eq!(first[0].location(), "loading");
        assert!(!first[0].is_resolved());

        ledger.release_metadata(1);
        let entry = cache.resolve(TokenId::new(5)).await;

        let second = remerge(&first, &entry).unwrap();
        assert_eq!(second[0].key(), first[0].key());
        assert_eq!(second[0].location(), "Seoul");

        assert_eq!(merge(&raw, &cache), second);
        assert_eq!(ledger.metadata_calls(), 1);
    }
}
