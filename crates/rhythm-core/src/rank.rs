//! Fractional ranking with tie averaging

use crate::{Error, Result};

/// Rank values on [0, 1], averaging the positions of tied values
///
/// Equal values share the mean of the (zero-based) positions they jointly
/// occupy in sorted order; every rank is then divided by `n - 1`.
///
/// # Example
///
/// ```rust
/// use rhythm_core::rank::fractional_ranks;
///
/// let ranks = fractional_ranks(&[1.0, 3.0, 2.0, 2.0, 5.0, 4.0]).unwrap();
/// assert_eq!(ranks, vec![0.0, 0.6, 0.3, 0.3, 1.0, 0.8]);
/// ```
pub fn fractional_ranks(values: &[f64]) -> Result<Vec<f64>> {
    if values.iter().any(|v| v.is_nan()) {
        return Err(Error::non_finite("ranked values"));
    }
    let n = values.len();
    if n < 2 {
        return Ok(vec![0.0; n]);
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let scale = (n - 1) as f64;
    let mut ranks = vec![0.0; n];
    let mut start = 0;
    while start < n {
        let mut end = start + 1;
        while end < n && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end share their mean
        let mean_position = (start + end - 1) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = mean_position / scale;
        }
        start = end;
    }

    Ok(ranks)
}
