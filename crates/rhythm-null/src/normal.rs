//! Normal approximation to the tied concordance distribution

use crate::traits::NullDistribution;
use rhythm_core::{max_score, Error, Result};
use statrs::function::erf::erfc;
use std::f64::consts::SQRT_2;

/// Gaussian approximation of the concordant-pair count
///
/// Mean M/2, variance (N²(2N+3) − Σ tᵢ²(2tᵢ+3)) / 72, with a half-unit
/// continuity correction on the observed count.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalDistribution {
    max_score: i64,
    expected: f64,
    stdev: f64,
}

impl NormalDistribution {
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

        let n: f64 = replicates.iter().sum::<usize>() as f64;
        let ties: f64 = replicates
            .iter()
            .map(|&t| {
                let t = t as f64;
                t * t * (2.0 * t + 3.0)
            })
            .sum();
        let variance = (n * n * (2.0 * n + 3.0) - ties) / 72.0;
        if !(variance.is_finite() && variance > 0.0) {
            return Err(Error::Computation(format!(
                "normal approximation variance is {variance}"
            )));
        }

        let m = max_score(replicates);
        Ok(Self {
            max_score: m,
            expected: m as f64 / 2.0,
            stdev: variance.sqrt(),
        })
    }

    /// Mean of the concordant-pair count
    pub fn expected(&self) -> f64 {
        self.expected
    }

    /// Standard deviation of the concordant-pair count
    pub fn stdev(&self) -> f64 {
        self.stdev
    }
}

impl NullDistribution for NormalDistribution {
    fn name(&self) -> &str {
        "normal"
    }

    fn max_score(&self) -> i64 {
        self.max_score
    }

    fn p_value(&self, score: i64) -> f64 {
        if score == 0 {
            return 1.0;
        }
        let concordant = (score.abs() + self.max_score) as f64 / 2.0 - 0.5;
        let z = (concordant - self.expected).abs() / self.stdev;
        erfc(z / SQRT_2).clamp(0.0, 1.0)
    }
}
