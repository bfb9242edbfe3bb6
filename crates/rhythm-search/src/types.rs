//! Result records produced by the search engine

use serde::{Deserialize, Serialize};

/// Best fit found for one candidate period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub period: f64,
    /// Search offset of the best reference
    pub offset: f64,
    /// Offset converted to a physical lag
    pub lag: f64,
    pub score: i64,
    /// Unadjusted p-value of `score`
    pub p_value: f64,
    /// Bonferroni-adjusted p-value
    pub adjusted_p_value: f64,
}

/// Outcome of searching one series
///
/// When several (period, offset) pairs share the minimal adjusted p-value,
/// `period` and `lag` are their averages and `score` is the most extreme
/// of their scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub period: f64,
    pub lag: f64,
    pub amplitude: f64,
    pub score: i64,
    /// Score normalized by the maximum attainable score, in [-1, 1]
    pub tau: f64,
    /// Bonferroni-adjusted p-value
    pub p_value: f64,
    /// Number of (period, offset) pairs that tied for the minimum
    pub ties: usize,
    /// One entry per candidate period, in search order
    pub per_period: Vec<PeriodSummary>,
}

impl SearchResult {
    /// Summary for a specific candidate period, if it was searched
    pub fn period_summary(&self, period: f64) -> Option<&PeriodSummary> {
        self.per_period.iter().find(|s| s.period == period)
    }

    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value <= alpha
    }
}
