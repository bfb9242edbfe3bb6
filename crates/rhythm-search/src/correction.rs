//! Multiple-testing correction

/// Bonferroni adjustment, `min(1, p · factor)`
///
/// The engine uses the number of candidate periods as `factor`.
#[inline]
pub fn bonferroni(p_value: f64, factor: f64) -> f64 {
    (p_value * factor).clamp(0.0, 1.0)
}
