//! Offset sweep for a single candidate period

use rhythm_core::Result;
use rhythm_waveform::{Reference, ReferenceLibrary};
use std::sync::Arc;
use tracing::trace;

/// Scores of one series against every offset of one period
///
/// Built fresh for every series; never shared between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodScan {
    pub period: f64,
    /// `(offset, score)` in sweep order
    pub scores: Vec<(f64, i64)>,
    /// Index into `scores` of the best offset
    pub best: usize,
}

impl PeriodScan {
    pub fn best_offset(&self) -> f64 {
        self.scores[self.best].0
    }

    pub fn best_score(&self) -> i64 {
        self.scores[self.best].1
    }
}

/// Per-period sub-engine holding the prepared references for its offsets
#[derive(Debug, Clone)]
pub struct PeriodScanner {
    period: f64,
    symmetric: bool,
    references: Vec<Arc<Reference>>,
}

impl PeriodScanner {
    /// Populate the library for `period` and precompute every tau vector
    pub fn new(library: &mut ReferenceLibrary, period: f64, density: f64) -> Result<Self> {
        let references = library.populate_period(period, density)?;
        for reference in &references {
            reference.tau_vector();
        }
        Ok(Self {
            period,
            symmetric: library.waveform().is_symmetric(),
            references,
        })
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn references(&self) -> &[Arc<Reference>] {
        &self.references
    }

    /// Reference at `offset`, if it is on this period's grid
    pub fn reference(&self, offset: f64) -> Option<&Arc<Reference>> {
        self.references.iter().find(|r| r.offset() == offset)
    }

    /// Score a data tau vector against every offset
    ///
    /// The best offset maximizes |score|; the first one wins on ties.
    pub fn scan(&self, data_tau: &[i8]) -> Result<PeriodScan> {
        let mut scores = Vec::with_capacity(self.references.len());
        let mut best = 0;
        let mut best_abs = -1;
        for (i, reference) in self.references.iter().enumerate() {
            let score = reference.score(data_tau)?;
            if score.abs() > best_abs {
                best = i;
                best_abs = score.abs();
            }
            scores.push((reference.offset(), score));
        }

        let scan = PeriodScan {
            period: self.period,
            scores,
            best,
        };
        trace!(
            period = self.period,
            offset = scan.best_offset(),
            score = scan.best_score(),
            "period scanned"
        );
        Ok(scan)
    }

    /// Physical lag of the reference at `offset`
    pub fn lag(&self, offset: f64, score: i64) -> f64 {
        phase_lag(self.period, offset, score, self.symmetric)
    }
}

/// Convert a search offset into a lag within `[0, period)`
///
/// Symmetric waveforms count offsets in half-period units and a negative
/// score means the anti-phase match, a quarter period further on.
pub fn phase_lag(period: f64, offset: f64, score: i64, symmetric: bool) -> f64 {
    if symmetric {
        let s = if score < 0 { -1.0 } else { 1.0 };
        (period + (1.0 - s) * period / 4.0 - offset / 2.0).rem_euclid(period)
    } else {
        (2.0 * period - offset).rem_euclid(period)
    }
}
