//! Exact null distribution of the concordance score with tied groups
//!
//! Harding's recurrence counts, for every number of concordant pairs, the
//! permutations of the multiset of timepoint labels that produce it. The
//! counts grow factorially with the number of observations, so the table is
//! accumulated in 128-bit integers and rebuilt in double-double arithmetic
//! when those overflow.
//!
//! Each group of `t` tied observations costs up to `2t` passes over the
//! half table, so construction is O(N·M) for N observations and maximal
//! score M.

use crate::traits::NullDistribution;
use num_traits::{CheckedAdd, CheckedSub, Zero};
use rhythm_core::{max_score, DoubleDouble, Error, Result};
use tracing::{debug, instrument, warn};

/// Permutation count representation used by the recurrence
trait Count: Copy + Zero + CheckedAdd + CheckedSub {
    fn one() -> Self;
    fn as_f64(&self) -> f64;
}

impl Count for i128 {
    fn one() -> Self {
        1
    }

    fn as_f64(&self) -> f64 {
        *self as f64
    }
}

impl Count for DoubleDouble {
    fn one() -> Self {
        DoubleDouble::new(1.0)
    }

    fn as_f64(&self) -> f64 {
        self.to_f64()
    }
}

/// Exact upper-tail table for one replicate layout
#[derive(Debug, Clone)]
pub struct HardingDistribution {
    replicates: Vec<usize>,
    max_score: i64,
    total_permutations: f64,
    cdf: Vec<f64>,
}

impl HardingDistribution {
    /// Build the table for the given replicate counts
    #[instrument(skip(replicates), fields(groups = replicates.len()))]
    pub fn new(replicates: &[usize]) -> Result<Self> {
        if replicates.len() < 2 {
            return Err(Error::InsufficientData {
                expected: 2,
                actual: replicates.len(),
            });
        }
        if replicates.contains(&0) {
            return Err(Error::InvalidParameter(
                "replicate counts must be at least 1".to_string(),
            ));
        }

        let m = max_score(replicates);
        let (total, cdf) = match upper_tail::<i128>(replicates, m) {
            Some(table) => table,
            None => {
                warn!(max_score = m, "permutation counts overflow i128, using double-double");
                upper_tail::<DoubleDouble>(replicates, m).ok_or_else(|| {
                    Error::Computation(format!(
                        "exact null distribution overflows for max score {m}; \
                         use the normal approximation"
                    ))
                })?
            }
        };

        if !total.is_finite() || total <= 0.0 {
            return Err(Error::Computation(format!(
                "permutation total is not representable for max score {m}; \
                 use the normal approximation"
            )));
        }

        debug!(max_score = m, total_permutations = total, "built exact table");

        Ok(Self {
            replicates: replicates.to_vec(),
            max_score: m,
            total_permutations: total,
            cdf,
        })
    }

    pub fn replicates(&self) -> &[usize] {
        &self.replicates
    }

    /// Upper-tail probabilities on the half-integer grid
    ///
    /// Entry `2j` is P(C ≥ j) for the concordant-pair count C, and entry
    /// `2j + 1` is the midpoint between `2j` and `2j + 2`. There are
    /// `2M + 1` entries.
    pub fn cdf(&self) -> &[f64] {
        &self.cdf
    }

    /// Number of distinct label permutations, N! / ∏ tᵢ!
    pub fn total_permutations(&self) -> f64 {
        self.total_permutations
    }
}

impl NullDistribution for HardingDistribution {
    fn name(&self) -> &str {
        "exact"
    }

    fn max_score(&self) -> i64 {
        self.max_score
    }

    fn p_value(&self, score: i64) -> f64 {
        if score == 0 {
            return 1.0;
        }
        let m = self.max_score;
        let idx = (2 * ((score.abs() + m) / 2)).min(2 * m) as usize;
        (2.0 * self.cdf[idx]).clamp(0.0, 1.0)
    }
}

/// Run the recurrence in `T`, returning the total and the 2M+1 table
///
/// `None` means an intermediate count left the range of `T`.
fn upper_tail<T: Count>(replicates: &[usize], m: i64) -> Option<(f64, Vec<f64>)> {
    let m = m as usize;
    let half = m / 2;

    let mut sizes = replicates.to_vec();
    sizes.sort_unstable();

    let mut cf = vec![T::one(); half + 1];
    let mut remaining: usize = sizes.iter().sum();

    for &size in &sizes[..sizes.len() - 1] {
        remaining -= size;
        let tail = remaining;

        if tail < half {
            for t in (tail + 1)..=(size + tail).min(half) {
                for j in (t..=half).rev() {
                    cf[j] = cf[j].checked_sub(&cf[j - t])?;
                }
            }
        }
        for s in 1..=size.min(half) {
            for j in s..=half {
                cf[j] = cf[j].checked_add(&cf[j - s])?;
            }
        }
    }

    let total = if m % 2 == 1 {
        cf[half].checked_add(&cf[half])?
    } else {
        cf[half].checked_add(&cf[half - 1])?
    };

    // P(C >= j) counts; past the midpoint use the mirrored lower tail so
    // small tail counts never come from cancelling two huge totals
    let mut upper = Vec::with_capacity(m + 1);
    upper.push(total);
    for j in 1..=m {
        let count = if j - 1 <= half {
            total.checked_sub(&cf[j - 1])?
        } else {
            cf[m - j]
        };
        upper.push(count);
    }

    let total_f = total.as_f64();
    let mut table = Vec::with_capacity(2 * m + 1);
    for j in 0..=m {
        table.push(upper[j].as_f64() / total_f);
        if j < m {
            let mid = upper[j].checked_add(&upper[j + 1])?;
            table.push(mid.as_f64() / (2.0 * total_f));
        }
    }

    Some((total_f, table))
}
