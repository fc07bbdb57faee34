//! Banded LSH index over MinHash signatures.
//!
//! # Architecture
//!
//! ```text
//!   add / remove
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Staging    │ ◄── latest signature + tombstone per id
//! └──────┬───────┘
//!        │ index(): build b sorted tables off to the side
//!        ▼
//! ┌──────────────┐
//! │   Snapshot   │ ◄── swapped in whole; the only state query reads
//! └──────────────┘
//! ```
//!
//! Mutations are invisible to [`MinHashLsh::query`] until the next
//! [`MinHashLsh::index`]. A rebuild replaces every band table at once, so a
//! concurrent query sees either the old snapshot or the new one.
//!
//! # Example
//!
//! ```rust
//! use minlsh::banding::MinHashLsh;
//! use minlsh::hash::MinHash;
//!
//! let lsh = MinHashLsh::narrow(128, 0.5, 16).unwrap();
//!
//! let mut mh = MinHash::new(7, 128).unwrap();
//! mh.push_all(["a", "b", "c", "d"]);
//! lsh.add("doc-1", mh.signature()).unwrap();
//!
//! // Nothing is searchable before index().
//! assert!(lsh.query(mh.view()).unwrap().is_empty());
//!
//! lsh.index();
//! assert!(lsh.query(mh.view()).unwrap().contains("doc-1"));
//! ```

mod key;
mod staging;
mod table;

pub use key::{BandKey, KeyEncoder};
pub use table::{BandTable, Snapshot};

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace, warn};

use crate::config::{KeyWidth, LshConfig, RemovePolicy};
use crate::error::{LshError, Result};
use crate::hash::params::{optimal_params, LshParams};
use staging::Staging;

/// Counters describing the staged and indexed state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Staged ids that are not tombstoned.
    pub staged_live: usize,
    /// Staged ids awaiting removal at the next rebuild.
    pub staged_tombstoned: usize,
    /// Ids in the current snapshot.
    pub indexed: usize,
    /// Completed `index()` calls.
    pub rebuilds: u64,
}

/// MinHash LSH index with stage-then-rebuild semantics.
///
/// `K` is an opaque caller-chosen id; the index only compares and hashes it.
/// All methods take `&self`, so one index can be shared across threads.
pub struct MinHashLsh<K> {
    config: LshConfig,
    params: LshParams,
    encoder: KeyEncoder,
    staging: Mutex<Staging<K>>,
    snapshot: RwLock<Arc<Snapshot<K>>>,
    /// Serializes rebuilds so snapshots are published in staging order.
    rebuild_lock: Mutex<()>,
    rebuilds: AtomicU64,
}

impl<K> MinHashLsh<K>
where
    K: Eq + Hash + Clone,
{
    /// Build an index from a full configuration.
    ///
    /// Fails with [`LshError::InvalidConfiguration`] for zero hashes, a
    /// threshold outside (0, 1], or no feasible banding.
    pub fn new(config: LshConfig) -> Result<Self> {
        config.validate()?;
        let params = optimal_params(config.num_hash, config.threshold)?;
        debug!(
            num_hash = config.num_hash,
            threshold = config.threshold,
            rows = params.rows,
            bands = params.bands,
            false_positive = params.false_positive,
            false_negative = params.false_negative,
            key_width = ?config.key_width,
            "configured minhash lsh"
        );

        Ok(Self {
            encoder: KeyEncoder::new(config.key_width, params.rows),
            staging: Mutex::new(Staging::with_capacity(config.capacity_hint)),
            snapshot: RwLock::new(Arc::new(Snapshot::empty(params.bands))),
            rebuild_lock: Mutex::new(()),
            rebuilds: AtomicU64::new(0),
            params,
            config,
        })
    }

    /// Index with 2-byte band values.
    pub fn narrow(num_hash: usize, threshold: f64, capacity_hint: usize) -> Result<Self> {
        Self::new(
            LshConfig::new(num_hash, threshold)
                .with_capacity_hint(capacity_hint)
                .with_key_width(KeyWidth::Narrow),
        )
    }

    /// Index with full 8-byte band values.
    pub fn wide(num_hash: usize, threshold: f64, capacity_hint: usize) -> Result<Self> {
        Self::new(
            LshConfig::new(num_hash, threshold)
                .with_capacity_hint(capacity_hint)
                .with_key_width(KeyWidth::Wide),
        )
    }

    /// Stage `signature` under `id`, replacing any earlier signature and
    /// cancelling a pending removal.
    ///
    /// Not visible to [`query`](Self::query) until the next [`index`](Self::index).
    pub fn add(&self, id: K, signature: Vec<u64>) -> Result<()> {
        LshError::check_shape(self.config.num_hash, signature.len())?;
        self.staging.lock().put(id, signature);
        trace!("staged signature");
        Ok(())
    }

    /// Stage removal of `id`.
    ///
    /// Under [`RemovePolicy::Ignore`] an id that was never added is a no-op;
    /// under [`RemovePolicy::Strict`] it fails with [`LshError::UnknownId`].
    pub fn remove(&self, id: &K) -> Result<()> {
        let known = self.staging.lock().tombstone(id);
        match (known, self.config.remove_policy) {
            (true, _) => {
                trace!("staged removal");
                Ok(())
            }
            (false, RemovePolicy::Ignore) => Ok(()),
            (false, RemovePolicy::Strict) => {
                warn!("remove called for unknown id");
                Err(LshError::UnknownId)
            }
        }
    }

    /// Rebuild every band table from the staging area and publish them.
    ///
    /// Tombstoned ids are left out and purged from staging. The staging lock
    /// is held only while the live entries are collected, so `add` and
    /// `remove` proceed during the build; their effects land in the next
    /// rebuild. Queries running during the rebuild keep reading the previous
    /// snapshot.
    pub fn index(&self) {
        let _rebuilding = self.rebuild_lock.lock();
        let start = Instant::now();
        let (live, purged) = self.staging.lock().take_live();

        let mut tables = Vec::with_capacity(self.params.bands);
        for band in 0..self.params.bands {
            let mut entries = Vec::with_capacity(live.len());
            for (id, signature) in &live {
                let key = self.encoder.band_key(signature, band);
                debug_assert_eq!(key.len(), self.encoder.key_len());
                entries.push((key, id.clone()));
            }
            let table = BandTable::from_unsorted(entries);
            debug_assert!(table.is_sorted());
            tables.push(table);
        }

        let items = live.len();
        drop(live);
        *self.snapshot.write() = Arc::new(Snapshot::new(tables, items));
        let rebuild = self.rebuilds.fetch_add(1, Ordering::Relaxed) + 1;

        debug!(
            items,
            purged,
            bands = self.params.bands,
            rebuild,
            elapsed_us = start.elapsed().as_micros() as u64,
            "rebuilt band tables"
        );
    }

    /// Ids sharing at least one band with `signature` in the last built
    /// snapshot. Empty if [`index`](Self::index) has never run.
    pub fn query(&self, signature: &[u64]) -> Result<HashSet<K>> {
        LshError::check_shape(self.config.num_hash, signature.len())?;
        let snapshot = self.snapshot();

        let mut found = HashSet::new();
        snapshot.for_each_candidate(&self.encoder, signature, |id| {
            if !found.contains(id) {
                found.insert(id.clone());
            }
        });
        Ok(found)
    }

    /// The current snapshot. Holding it pins that snapshot even across
    /// later rebuilds.
    pub fn snapshot(&self) -> Arc<Snapshot<K>> {
        Arc::clone(&*self.snapshot.read())
    }

    /// `(rows per band, bands)`.
    pub fn params(&self) -> (usize, usize) {
        (self.params.rows, self.params.bands)
    }

    /// Full banding parameters, including their error masses.
    pub fn lsh_params(&self) -> LshParams {
        self.params
    }

    pub fn config(&self) -> &LshConfig {
        &self.config
    }

    /// Whether `id` has a staged entry (live or tombstoned).
    pub fn contains_staged(&self, id: &K) -> bool {
        self.staging.lock().contains(id)
    }

    pub fn stats(&self) -> IndexStats {
        let (staged_live, staged_tombstoned) = {
            let staging = self.staging.lock();
            (staging.live_count(), staging.tombstone_count())
        };
        IndexStats {
            staged_live,
            staged_tombstoned,
            indexed: self.snapshot().items(),
            rebuilds: self.rebuilds.load(Ordering::Relaxed),
        }
    }
}

impl<K> std::fmt::Debug for MinHashLsh<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinHashLsh")
            .field("num_hash", &self.config.num_hash)
            .field("threshold", &self.config.threshold)
            .field("rows", &self.params.rows)
            .field("bands", &self.params.bands)
            .field("key_width", &self.config.key_width)
            .finish_non_exhaustive()
    }
}
