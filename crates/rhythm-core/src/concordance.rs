//! Pairwise concordance (Kendall-type) primitives
//!
//! Every series is reduced to its vector of pairwise orderings. Both operands
//! of a score must use the same pairing order, which is fixed here as the
//! row-major lower triangle: for `i` in `1..n`, for `j` in `0..i`, the entry
//! is `sign(z[i] - z[j])`.

use crate::{Error, Result};
use std::cmp::Ordering;

/// Number of unordered pairs in a series of length `n`
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Pairwise sign vector of a series
///
/// Entries are in {-1, 0, 1}; zero marks an exact tie. Pairs that cannot be
/// ordered (NaN) also yield zero, so callers validate series beforehand.
pub fn tau_vector(series: &[f64]) -> Vec<i8> {
    let n = series.len();
    let mut signs = Vec::with_capacity(pair_count(n));
    for i in 1..n {
        let zi = series[i];
        for &zj in &series[..i] {
            signs.push(match zi.partial_cmp(&zj) {
                Some(Ordering::Greater) => 1,
                Some(Ordering::Less) => -1,
                _ => 0,
            });
        }
    }
    signs
}

/// Dot product of two precomputed tau vectors
pub fn dot(a: &[i8], b: &[i8]) -> Result<i64> {
    if a.len() != b.len() {
        return Err(Error::size_mismatch(a.len(), b.len(), "tau vector dot product"));
    }
    Ok(a.iter().zip(b).map(|(&x, &y)| i64::from(x * y)).sum())
}

/// Concordance score between a series and a reference
///
/// Counts concordant minus discordant pairs; pairs tied in either operand
/// contribute nothing.
pub fn score(data: &[f64], reference: &[f64]) -> Result<i64> {
    if data.len() != reference.len() {
        return Err(Error::size_mismatch(reference.len(), data.len(), "concordance score"));
    }
    dot(&tau_vector(data), &tau_vector(reference))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arange(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn test_tau_vector_ordering() {
        let data = [1.0, 3.0, 5.0, 7.0, 9.0, 2.0, 4.0, 6.0, 8.0, 10.0];
        let expected: [i8; 45] = [
            1, 1, 1, 1, 1, 1, 1, 1, 1, 1, //
            1, -1, -1, -1, -1, 1, 1, -1, -1, -1, //
            1, 1, 1, 1, -1, -1, 1, 1, 1, 1, //
            1, 1, -1, 1, 1, 1, 1, 1, 1, 1, //
            1, 1, 1, 1, 1,
        ];
        assert_eq!(tau_vector(&data), expected.to_vec());
    }

    #[test]
    fn test_flat_operands_score_zero() {
        assert_eq!(score(&arange(12), &[1.0; 12]).unwrap(), 0);
        assert_eq!(score(&[1.0; 12], &arange(12)).unwrap(), 0);
    }

    #[test]
    fn test_known_scores() {
        assert_eq!(score(&[1.0, 3.0, 2.0, 4.0], &arange(4)).unwrap(), 4);
        assert_eq!(score(&[4.0, 3.0, 2.0, 1.0], &arange(4)).unwrap(), -6);
        assert_eq!(score(&[1.0, 2.0, 4.0, 3.0], &[3.0, 2.0, 1.0, 4.0]).unwrap(), -2);
    }

    #[test]
    fn test_self_score_is_max() {
        let data = [0.4, -2.0, 9.1, 3.3, 0.0, 1.5, 7.7];
        let n = data.len();
        assert_eq!(score(&data, &data).unwrap(), pair_count(n) as i64);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(score(&[1.0, 2.0], &[1.0, 2.0, 3.0]).is_err());
        assert!(dot(&[1, -1], &[1]).is_err());
    }

    #[test]
    fn test_pair_count() {
        assert_eq!(pair_count(0), 0);
        assert_eq!(pair_count(1), 0);
        assert_eq!(pair_count(12), 66);
    }
}
