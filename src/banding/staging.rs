//! Staging area for index mutations.
//!
//! Holds, per id, the latest signature and a tombstone flag. `add` and
//! `remove` only ever touch this map; a rebuild reads it to produce the next
//! snapshot and then purges tombstoned entries.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Largest number of entries preallocated from a capacity hint.
const MAX_PREALLOCATED: usize = 1 << 20;

#[derive(Debug, Clone)]
struct StagedEntry {
    signature: Arc<[u64]>,
    tombstoned: bool,
}

/// Latest signature per id plus pending deletions.
#[derive(Debug)]
pub struct Staging<K> {
    entries: HashMap<K, StagedEntry>,
    tombstones: usize,
}

impl<K: Eq + Hash> Staging<K> {
    /// Empty staging area, preallocated for up to `capacity` ids.
    ///
    /// The hint is capped and a failed reservation is ignored: the map grows
    /// on demand either way.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut entries = HashMap::new();
        let _ = entries.try_reserve(capacity.min(MAX_PREALLOCATED));
        Self {
            entries,
            tombstones: 0,
        }
    }

    /// Record `signature` for `id`, replacing any earlier one and clearing
    /// a pending deletion.
    pub fn put(&mut self, id: K, signature: Vec<u64>) {
        let entry = StagedEntry {
            signature: signature.into(),
            tombstoned: false,
        };
        if let Some(old) = self.entries.insert(id, entry) {
            if old.tombstoned {
                self.tombstones -= 1;
            }
        }
    }

    /// Mark `id` for deletion.
    ///
    /// Returns false when the id is not staged at all.
    pub fn tombstone(&mut self, id: &K) -> bool {
        match self.entries.get_mut(id) {
            Some(entry) => {
                if !entry.tombstoned {
                    entry.tombstoned = true;
                    self.tombstones += 1;
                }
                true
            }
            None => false,
        }
    }

    /// Iterate over ids that are not tombstoned.
    pub fn live(&self) -> impl Iterator<Item = (&K, &Arc<[u64]>)> {
        self.entries
            .iter()
            .filter(|(_, e)| !e.tombstoned)
            .map(|(id, e)| (id, &e.signature))
    }

    /// Drop tombstoned entries. Returns how many were dropped.
    pub fn purge(&mut self) -> usize {
        let purged = self.tombstones;
        if purged > 0 {
            self.entries.retain(|_, e| !e.tombstoned);
            self.tombstones = 0;
        }
        purged
    }

    pub fn contains(&self, id: &K) -> bool {
        self.entries.contains_key(id)
    }

    pub fn live_count(&self) -> usize {
        self.entries.len() - self.tombstones
    }

    pub fn tombstone_count(&self) -> usize {
        self.tombstones
    }

    #[cfg(test)]
    fn capacity(&self) -> usize {
        self.entries.capacity()
    }
}

impl<K: Eq + Hash + Clone> Staging<K> {
    /// Purge tombstoned entries and hand out the live ones.
    ///
    /// Signatures are shared, not copied, so the caller can build from the
    /// result after releasing the staging lock.
    pub fn take_live(&mut self) -> (Vec<(K, Arc<[u64]>)>, usize) {
        let purged = self.purge();
        let live = self
            .live()
            .map(|(id, signature)| (id.clone(), Arc::clone(signature)))
            .collect();
        (live, purged)
    }
}
