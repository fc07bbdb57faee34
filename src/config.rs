//! Index configuration.

use crate::error::{LshError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bytes of each signature value kept in a band key.
///
/// Only the low-order bytes of every value are packed, so `Narrow` keys
/// trade a small rise in accidental collisions for a 4x smaller table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KeyWidth {
    /// 2 bytes per value.
    #[default]
    Narrow,
    /// 8 bytes per value (the full value).
    Wide,
}

impl KeyWidth {
    /// Number of bytes each value occupies in a band key.
    #[inline]
    pub const fn bytes(self) -> usize {
        match self {
            KeyWidth::Narrow => 2,
            KeyWidth::Wide => 8,
        }
    }
}

/// What `remove` does with an id the index has never seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RemovePolicy {
    /// Silently ignore it.
    #[default]
    Ignore,
    /// Fail with [`LshError::UnknownId`].
    Strict,
}

/// Configuration for a [`MinHashLsh`](crate::banding::MinHashLsh) index.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LshConfig {
    /// Signature length L. Every added or queried signature must match it.
    pub num_hash: usize,
    /// Target Jaccard similarity, in (0, 1].
    pub threshold: f64,
    /// Expected number of items. Only used to preallocate; it never changes
    /// which items a query returns.
    pub capacity_hint: usize,
    /// Band key packing.
    pub key_width: KeyWidth,
    /// Handling of unknown ids in `remove`.
    pub remove_policy: RemovePolicy,
}

impl Default for LshConfig {
    fn default() -> Self {
        Self {
            num_hash: 128,
            threshold: 0.5,
            capacity_hint: 0,
            key_width: KeyWidth::Narrow,
            remove_policy: RemovePolicy::Ignore,
        }
    }
}

impl LshConfig {
    pub fn new(num_hash: usize, threshold: f64) -> Self {
        Self {
            num_hash,
            threshold,
            ..Self::default()
        }
    }

    pub fn with_capacity_hint(mut self, capacity_hint: usize) -> Self {
        self.capacity_hint = capacity_hint;
        self
    }

    pub fn with_key_width(mut self, key_width: KeyWidth) -> Self {
        self.key_width = key_width;
        self
    }

    pub fn with_remove_policy(mut self, remove_policy: RemovePolicy) -> Self {
        self.remove_policy = remove_policy;
        self
    }

    /// Reject configurations no index can be built from.
    pub fn validate(&self) -> Result<()> {
        if self.num_hash == 0 {
            return Err(LshError::invalid("num_hash must be positive"));
        }
        // NaN fails both comparisons.
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(LshError::invalid(format!(
                "threshold must be in (0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}
