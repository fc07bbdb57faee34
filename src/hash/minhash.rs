//! MinHash for Jaccard similarity estimation.
//!
//! MinHash provides locality-sensitive hashing for set similarity,
//! estimating the Jaccard coefficient J(A,B) = |A ∩ B| / |A ∪ B|.
//!
//! ## Algorithm
//!
//! Each element is hashed once to a 64-bit base value `x`. Hash function `i`
//! is the affine permutation
//!
//! ```text
//! h_i(x) = (a_i · x + b_i) mod p,    p = 2^61 − 1
//! ```
//!
//! and `MinHash_i(S) = min_{x ∈ S} h_i(x)`. The probability that two sets
//! agree in slot `i` equals their Jaccard similarity.
//!
//! The `(a_i, b_i)` pairs are drawn from a `StdRng` seeded by the caller, so
//! two generators built from the same seed and length produce comparable
//! signatures.
//!
//! ## References
//!
//! - Broder (1997). "On the resemblance and containment of documents"
//! - Broder et al. (2000). "Min-wise independent permutations"

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::{LshError, Result};

/// Mersenne prime 2^61 − 1, the modulus of every permutation.
const MERSENNE_61: u64 = (1 << 61) - 1;

/// Slot value before any element has been pushed.
pub const EMPTY_SLOT: u64 = u64::MAX;

/// Streaming MinHash signature generator.
///
/// Owns its hash-function family and a running signature. Not meant to be
/// shared between writers: build one signature per owner, then hand the
/// finished `Vec<u64>` to the index.
#[derive(Debug, Clone)]
pub struct MinHash {
    seed: u64,
    /// Multipliers, each in `[1, p)`.
    a: Vec<u64>,
    /// Offsets, each in `[0, p)`.
    b: Vec<u64>,
    mins: Vec<u64>,
}

impl MinHash {
    /// Derive `num_hash` hash functions from `seed`.
    ///
    /// Fails with [`LshError::InvalidConfiguration`] when `num_hash` is 0.
    pub fn new(seed: u64, num_hash: usize) -> Result<Self> {
        if num_hash == 0 {
            return Err(LshError::invalid("num_hash must be positive"));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut a = Vec::with_capacity(num_hash);
        let mut b = Vec::with_capacity(num_hash);
        for _ in 0..num_hash {
            a.push(rng.random_range(1..MERSENNE_61));
            b.push(rng.random_range(0..MERSENNE_61));
        }

        Ok(Self {
            seed,
            a,
            b,
            mins: vec![EMPTY_SLOT; num_hash],
        })
    }

    /// Fold one element into the running signature.
    pub fn push(&mut self, element: &[u8]) {
        let x = xxh3_64(element) % MERSENNE_61;
        for ((slot, &a), &b) in self.mins.iter_mut().zip(&self.a).zip(&self.b) {
            let h = permute(a, b, x);
            if h < *slot {
                *slot = h;
            }
        }
    }

    /// Push every element of an iterator.
    pub fn push_all<I, T>(&mut self, elements: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        for element in elements {
            self.push(element.as_ref());
        }
    }

    /// Copy of the current signature.
    pub fn signature(&self) -> Vec<u64> {
        self.mins.clone()
    }

    /// Read-only view of the current signature.
    pub fn view(&self) -> &[u64] {
        &self.mins
    }

    /// Forget all pushed elements, keeping the hash functions.
    pub fn reset(&mut self) {
        self.mins.fill(EMPTY_SLOT);
    }

    /// Number of hash functions (signature length).
    pub fn num_hash(&self) -> usize {
        self.mins.len()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[inline]
fn permute(a: u64, b: u64, x: u64) -> u64 {
    ((a as u128 * x as u128 + b as u128) % MERSENNE_61 as u128) as u64
}

/// Estimate Jaccard similarity as the fraction of agreeing slots.
///
/// Returns 0.0 for signatures of different (or zero) length.
pub fn estimate_jaccard(a: &[u64], b: &[u64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let matches = a.iter().zip(b).filter(|(x, y)| x == y).count();
    matches as f64 / a.len() as f64
}

/// Signature of the union of two sets: the element-wise minimum.
///
/// Both signatures must come from generators with the same seed and length.
pub fn merge(a: &[u64], b: &[u64]) -> Result<Vec<u64>> {
    LshError::check_shape(a.len(), b.len())?;
    Ok(a.iter().zip(b).map(|(&x, &y)| x.min(y)).collect())
}
