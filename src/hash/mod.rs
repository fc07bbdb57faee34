//! MinHash signatures and the banding parameter search.
//!
//! ## MinHash: Jaccard Similarity for Sets
//!
//! **Problem**: Given millions of documents, find near-duplicates.
//! Exact Jaccard comparison is O(n²), too slow.
//!
//! **Key insight** (Broder 1997): For a random permutation π of the universe,
//!
//! ```text
//! P[min(π(A)) = min(π(B))] = |A ∩ B| / |A ∪ B| = Jaccard(A, B)
//! ```
//!
//! The minimum element of A ∪ B is equally likely to be any element.
//! It's in A ∩ B with probability |A ∩ B| / |A ∪ B|.
//!
//! **Algorithm**:
//! 1. Represent documents as sets of elements (shingles, tokens, k-mers)
//! 2. Apply L hash functions (simulating permutations)
//! 3. Signature = [min h₁(S), min h₂(S), ..., min h_L(S)]
//! 4. Jaccard ≈ (# matching positions) / L
//!
//! **Amplification with bands**: Divide the signature into b bands of r rows.
//! Similar items collide in *any* band with high probability; dissimilar
//! items rarely agree on all r rows of some band. [`params`] picks r and b
//! for a target threshold.
//!
//! ```rust
//! use minlsh::hash::{estimate_jaccard, MinHash};
//!
//! let mut a = MinHash::new(1, 128).unwrap();
//! a.push_all(["the", "quick", "brown", "fox"]);
//! let mut b = MinHash::new(1, 128).unwrap();
//! b.push_all(["the", "quick", "brown", "dog"]);
//!
//! let est = estimate_jaccard(a.view(), b.view());
//! assert!(est > 0.3 && est < 0.9);
//! ```
//!
//! ## References
//!
//! - Broder (1997). "On the resemblance and containment of documents." (MinHash)
//! - Indyk & Motwani (1998). "Approximate nearest neighbors: towards removing
//!   the curse of dimensionality." (LSH theory)
//! - Leskovec, Rajaraman & Ullman. "Mining of Massive Datasets", ch. 3 (banding)

pub mod minhash;
pub mod params;

pub use minhash::{estimate_jaccard, merge, MinHash, EMPTY_SLOT};
pub use params::{optimal_params, LshParams};
