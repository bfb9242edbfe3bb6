//! Common interface of the null distributions

/// Distribution of the concordance score under "no rhythm"
///
/// Implementations are built once per layout (or per period) and then
/// queried read-only, so they must be shareable across threads.
pub trait NullDistribution: Send + Sync {
    /// Short identifier used in logs and reports
    fn name(&self) -> &str;

    /// Largest attainable |score| for the layout
    fn max_score(&self) -> i64;

    /// Two-sided p-value of an observed score, clamped to [0, 1]
    ///
    /// A score of zero is never evidence of rhythm and maps to 1.0.
    fn p_value(&self, score: i64) -> f64;
}
