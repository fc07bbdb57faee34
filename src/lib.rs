//! minlsh: MinHash signatures and a banded LSH index for Jaccard similarity.
//!
//! Finds, among many stored sets, those whose estimated Jaccard similarity to
//! a query set exceeds a threshold, without comparing against every item.
//!
//! - `hash/`: signature generation ([`MinHash`]) and band/row selection
//!   ([`optimal_params`])
//! - `banding/`: the stage-then-rebuild index ([`MinHashLsh`])
//!
//! # Critical Nuances
//!
//! ## Results are candidates, not answers
//!
//! A query returns ids sharing at least one band with the query signature.
//! Items below the threshold can appear (false positives) and items above it
//! can be missed (false negatives). [`LshParams`] reports the integrated
//! mass of both for the chosen banding. Verify candidates with
//! [`estimate_jaccard`] or an exact comparison when precision matters.
//!
//! An item queried with its own signature is always returned: identical
//! signatures agree on every band.
//!
//! ## Nothing is visible until `index()`
//!
//! `add` and `remove` only stage changes. `index()` rebuilds every band
//! table and swaps the new set in at once, so batch mutations and rebuild
//! once rather than after every call.
//!
//! ## Signatures must come from the same generator family
//!
//! Two signatures are only comparable if they were produced with the same
//! seed and length. The index checks length, not provenance.
//!
//! # Example
//!
//! ```rust
//! use minlsh::{MinHash, MinHashLsh};
//!
//! let words = ["hello", "world", "minhash", "one", "two", "three", "four",
//!              "five", "six", "seven", "eight", "nine", "ten"];
//! let mut full = MinHash::new(1, 256).unwrap();
//! full.push_all(words);
//!
//! let lsh = MinHashLsh::narrow(256, 0.5, 1).unwrap();
//! lsh.add("s1", full.signature()).unwrap();
//! lsh.index();
//!
//! let mut subset = MinHash::new(1, 256).unwrap();
//! subset.push_all(&words[3..]);
//! assert!(lsh.query(subset.view()).unwrap().contains("s1"));
//! ```

pub mod banding;
pub mod config;
pub mod error;
pub mod hash;

pub use banding::{IndexStats, MinHashLsh};
pub use config::{KeyWidth, LshConfig, RemovePolicy};
pub use error::{LshError, Result};
pub use hash::{estimate_jaccard, merge, optimal_params, LshParams, MinHash};
