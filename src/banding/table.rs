//! Sorted per-band key tables and the immutable snapshot built from them.

use super::key::{BandKey, KeyEncoder};

/// One band's entries, sorted by key.
///
/// Built once per rebuild and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct BandTable<K> {
    entries: Vec<(BandKey, K)>,
}

impl<K> BandTable<K> {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sort `entries` by key and freeze them.
    pub fn from_unsorted(mut entries: Vec<(BandKey, K)>) -> Self {
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        Self { entries }
    }

    /// Ids whose key equals `key`.
    ///
    /// Binary search for the start of the run, then for its end: O(log n + m).
    pub fn matches(&self, key: &[u8]) -> impl Iterator<Item = &K> + '_ {
        let start = self.entries.partition_point(|(k, _)| k.as_slice() < key);
        let run = self.entries[start..].partition_point(|(k, _)| k.as_slice() == key);
        self.entries[start..start + run].iter().map(|(_, id)| id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether entries are in key order.
    pub fn is_sorted(&self) -> bool {
        self.entries.windows(2).all(|w| w[0].0 <= w[1].0)
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.entries.capacity()
    }
}

/// A complete set of band tables: everything a query can see.
#[derive(Debug, Clone)]
pub struct Snapshot<K> {
    tables: Vec<BandTable<K>>,
    /// Number of distinct ids indexed.
    items: usize,
}

impl<K> Snapshot<K> {
    /// Snapshot with `bands` empty tables (the state before any rebuild).
    pub fn empty(bands: usize) -> Self {
        Self {
            tables: (0..bands).map(|_| BandTable::empty()).collect(),
            items: 0,
        }
    }

    pub fn new(tables: Vec<BandTable<K>>, items: usize) -> Self {
        Self { tables, items }
    }

    /// Call `visit` for every id sharing at least one band key with
    /// `signature`. Ids matching several bands are visited several times.
    pub fn for_each_candidate<'a>(
        &'a self,
        encoder: &KeyEncoder,
        signature: &[u64],
        mut visit: impl FnMut(&'a K),
    ) {
        for (band, table) in self.tables.iter().enumerate() {
            if table.is_empty() {
                continue;
            }
            let key = encoder.band_key(signature, band);
            table.matches(&key).for_each(&mut visit);
        }
    }

    pub fn tables(&self) -> &[BandTable<K>] {
        &self.tables
    }

    pub fn items(&self) -> usize {
        self.items
    }
}
