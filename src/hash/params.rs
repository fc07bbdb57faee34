//! Band/row selection for MinHash LSH.
//!
//! With `b` bands of `r` rows, two items of true similarity `s` share at
//! least one band with probability
//!
//! ```text
//! f(s) = 1 − (1 − s^r)^b
//! ```
//!
//! For a threshold `t`, the false-positive mass is `∫₀ᵗ f(s) ds` and the
//! false-negative mass is `∫ₜ¹ (1 − f(s)) ds`. [`optimal_params`] searches
//! every `(r, b)` with `r·b ≤ L` for the smallest sum of the two.
//!
//! Raising the threshold pushes the optimum toward more rows per band
//! (stricter AND within a band); lowering it favors more bands.

use crate::error::{LshError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Midpoint-rule step for both integrals.
const INTEGRATION_STEP: f64 = 0.01;

/// Errors closer than this are treated as equal.
const ERROR_TOLERANCE: f64 = 1e-12;

/// Banding parameters chosen for a signature length and threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LshParams {
    /// Rows per band (r).
    pub rows: usize,
    /// Number of bands (b).
    pub bands: usize,
    /// Integrated false-positive probability below the threshold.
    pub false_positive: f64,
    /// Integrated false-negative probability above the threshold.
    pub false_negative: f64,
}

impl LshParams {
    /// Combined error the parameters were selected on.
    pub fn error(&self) -> f64 {
        self.false_positive + self.false_negative
    }

    /// Signature slots actually covered by bands (`r·b`).
    pub fn used_hashes(&self) -> usize {
        self.rows * self.bands
    }

    /// Similarity at which the S-curve is steepest, `(1/b)^(1/r)`.
    pub fn approx_threshold(&self) -> f64 {
        (1.0 / self.bands as f64).powf(1.0 / self.rows as f64)
    }

    /// Probability that items of similarity `s` collide in at least one band.
    pub fn collision_probability(&self, s: f64) -> f64 {
        collision_probability(s, self.rows, self.bands)
    }
}

#[inline]
fn collision_probability(s: f64, rows: usize, bands: usize) -> f64 {
    1.0 - (1.0 - s.powf(rows as f64)).powf(bands as f64)
}

fn integrate(f: impl Fn(f64) -> f64, lo: f64, hi: f64) -> f64 {
    let steps = ((hi - lo) / INTEGRATION_STEP).round().max(0.0) as usize;
    (0..steps)
        .map(|i| f(lo + (i as f64 + 0.5) * INTEGRATION_STEP) * INTEGRATION_STEP)
        .sum()
}

/// False-positive mass for `rows`/`bands` below `threshold`.
pub fn false_positive_probability(threshold: f64, rows: usize, bands: usize) -> f64 {
    integrate(|s| collision_probability(s, rows, bands), 0.0, threshold)
}

/// False-negative mass for `rows`/`bands` above `threshold`.
pub fn false_negative_probability(threshold: f64, rows: usize, bands: usize) -> f64 {
    integrate(|s| 1.0 - collision_probability(s, rows, bands), threshold, 1.0)
}

/// Pick `(r, b)` with `r·b ≤ num_hash` minimizing false-positive plus
/// false-negative mass at `threshold`.
///
/// Ties go to fewer bands, then to more rows.
pub fn optimal_params(num_hash: usize, threshold: f64) -> Result<LshParams> {
    if num_hash == 0 {
        return Err(LshError::invalid("num_hash must be positive"));
    }
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(LshError::invalid(format!(
            "threshold must be in (0, 1], got {threshold}"
        )));
    }

    let mut best: Option<LshParams> = None;
    for bands in 1..=num_hash {
        // Visiting rows from high to low keeps the larger r on ties.
        for rows in (1..=num_hash / bands).rev() {
            let false_positive = false_positive_probability(threshold, rows, bands);
            let false_negative = false_negative_probability(threshold, rows, bands);
            let candidate = LshParams {
                rows,
                bands,
                false_positive,
                false_negative,
            };
            match best {
                Some(current) if candidate.error() >= current.error() - ERROR_TOLERANCE => {}
                _ => best = Some(candidate),
            }
        }
    }

    best.ok_or_else(|| {
        LshError::invalid(format!(
            "no feasible banding for num_hash={num_hash}, threshold={threshold}"
        ))
    })
}
