//! Sampling layout: distinct timepoints and their replicate counts

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// How many observations share each timepoint
///
/// A single count replicates every timepoint uniformly, a one-element
/// vector is broadcast, and a vector with one entry per timepoint is used
/// as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplicateSpec {
    /// Same replicate count at every timepoint
    Uniform(usize),
    /// Explicit counts, either one per timepoint or a single broadcast value
    PerTimepoint(Vec<usize>),
}

impl ReplicateSpec {
    /// Resolve into one replicate count per timepoint
    pub fn resolve(&self, timepoints: usize) -> Result<Vec<usize>> {
        match self {
            Self::Uniform(reps) => Ok(vec![*reps; timepoints]),
            Self::PerTimepoint(reps) if reps.len() == 1 => Ok(vec![reps[0]; timepoints]),
            Self::PerTimepoint(reps) if reps.len() == timepoints => Ok(reps.clone()),
            Self::PerTimepoint(reps) => Err(Error::size_mismatch(
                timepoints,
                reps.len(),
                "replicate specification",
            )),
        }
    }
}

impl From<usize> for ReplicateSpec {
    fn from(reps: usize) -> Self {
        Self::Uniform(reps)
    }
}

impl From<Vec<usize>> for ReplicateSpec {
    fn from(reps: Vec<usize>) -> Self {
        Self::PerTimepoint(reps)
    }
}

/// Ordered distinct sampling times, each with a replicate count
///
/// Observations are expected grouped by timepoint: the first `replicates[0]`
/// values of a series belong to `times[0]`, and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimepointLayout {
    times: Vec<f64>,
    replicates: Vec<usize>,
}

impl TimepointLayout {
    /// Create a layout from explicit times and replicate counts
    pub fn new(times: Vec<f64>, replicates: Vec<usize>) -> Result<Self> {
        if times.len() != replicates.len() {
            return Err(Error::size_mismatch(times.len(), replicates.len(), "timepoint layout"));
        }
        if times.len() < 2 {
            return Err(Error::InsufficientData {
                expected: 2,
                actual: times.len(),
            });
        }
        if times.iter().any(|t| !t.is_finite()) {
            return Err(Error::non_finite("timepoints"));
        }
        if times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(Error::InvalidParameter(
                "timepoints must be strictly increasing".to_string(),
            ));
        }
        if let Some(i) = replicates.iter().position(|&r| r == 0) {
            return Err(Error::InvalidParameter(format!(
                "replicate count at timepoint {i} must be at least 1"
            )));
        }

        Ok(Self { times, replicates })
    }

    /// Evenly spaced timepoints `0, interval, 2 * interval, ...`
    pub fn uniform(
        timepoints: usize,
        replicates: impl Into<ReplicateSpec>,
        interval: f64,
    ) -> Result<Self> {
        if !(interval.is_finite() && interval > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "sampling interval must be positive, got {interval}"
            )));
        }
        let reps = replicates.into().resolve(timepoints)?;
        let times = (0..timepoints).map(|i| i as f64 * interval).collect();
        Self::new(times, reps)
    }

    /// Distinct sampling times
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Replicate count per timepoint
    pub fn replicates(&self) -> &[usize] {
        &self.replicates
    }

    /// Number of distinct timepoints (k)
    pub fn timepoint_count(&self) -> usize {
        self.times.len()
    }

    /// Total number of observations (N)
    pub fn total_observations(&self) -> usize {
        self.replicates.iter().sum()
    }

    /// Largest attainable concordance score, `(N^2 - sum(t_i^2)) / 2`
    pub fn max_score(&self) -> i64 {
        max_score(&self.replicates)
    }

    /// Repeat each per-timepoint value by its replicate count
    pub fn expand<T: Copy>(&self, values: &[T]) -> Result<Vec<T>> {
        if values.len() != self.replicates.len() {
            return Err(Error::size_mismatch(
                self.replicates.len(),
                values.len(),
                "replicate expansion",
            ));
        }
        let mut expanded = Vec::with_capacity(self.total_observations());
        for (&value, &reps) in values.iter().zip(&self.replicates) {
            expanded.extend(std::iter::repeat(value).take(reps));
        }
        Ok(expanded)
    }

    /// Check a series against the layout before any scoring happens
    ///
    /// NaN and infinities are the missing-value marker; the first one found
    /// fails the series.
    pub fn validate_series(&self, series: &[f64]) -> Result<()> {
        let expected = self.total_observations();
        if series.len() != expected {
            return Err(Error::LengthMismatch {
                expected,
                actual: series.len(),
            });
        }
        if let Some(index) = series.iter().position(|x| !x.is_finite()) {
            return Err(Error::MissingValue { index });
        }
        Ok(())
    }
}

/// Largest attainable concordance score for a replicate-count vector
pub fn max_score(replicates: &[usize]) -> i64 {
    let n: i64 = replicates.iter().map(|&r| r as i64).sum();
    let sum_sq: i64 = replicates.iter().map(|&r| (r as i64) * (r as i64)).sum();
    (n * n - sum_sq) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layout() {
        let layout = TimepointLayout::uniform(12, 2, 2.0).unwrap();
        assert_eq!(layout.timepoint_count(), 12);
        assert_eq!(layout.total_observations(), 24);
        assert_eq!(layout.times()[5], 10.0);
        assert_eq!(layout.max_score(), (24 * 24 - 12 * 4) / 2);
    }

    #[test]
    fn test_replicate_spec_resolution() {
        assert_eq!(ReplicateSpec::Uniform(3).resolve(4).unwrap(), vec![3, 3, 3, 3]);
        assert_eq!(ReplicateSpec::PerTimepoint(vec![2]).resolve(3).unwrap(), vec![2, 2, 2]);
        assert_eq!(
            ReplicateSpec::PerTimepoint(vec![1, 2, 3]).resolve(3).unwrap(),
            vec![1, 2, 3]
        );
        assert!(ReplicateSpec::PerTimepoint(vec![1, 2]).resolve(3).is_err());
    }

    #[test]
    fn test_expansion() {
        let layout = TimepointLayout::uniform(12, 2, 1.0).unwrap();
        let values: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let expanded = layout.expand(&values).unwrap();
        let expected = vec![
            0.0, 0.0, 1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0, 5.0, 5.0, 6.0, 6.0, 7.0, 7.0, 8.0,
            8.0, 9.0, 9.0, 10.0, 10.0, 11.0, 11.0,
        ];
        assert_eq!(expanded, expected);
        assert!(layout.expand(&values[..11]).is_err());
    }

    #[test]
    fn test_unbalanced_max_score() {
        assert_eq!(max_score(&[2, 3, 2, 1]), 23);
        assert_eq!(max_score(&[1; 10]), 45);
        assert_eq!(max_score(&[1, 1, 1]), 3);
    }

    #[test]
    fn test_invalid_layouts() {
        assert!(matches!(
            TimepointLayout::new(vec![0.0], vec![1]),
            Err(Error::InsufficientData { expected: 2, actual: 1 })
        ));
        assert!(TimepointLayout::new(vec![0.0, 1.0], vec![1, 0]).is_err());
        assert!(TimepointLayout::new(vec![1.0, 0.0], vec![1, 1]).is_err());
        assert!(TimepointLayout::new(vec![0.0, 1.0, 2.0], vec![1, 1]).is_err());
        assert!(TimepointLayout::uniform(4, 1, 0.0).is_err());
    }

    #[test]
    fn test_series_validation() {
        let layout = TimepointLayout::uniform(4, vec![1, 2, 1, 1], 1.0).unwrap();
        assert!(layout.validate_series(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_ok());
        assert!(matches!(
            layout.validate_series(&[1.0, 2.0, 3.0, 4.0]),
            Err(Error::LengthMismatch { expected: 5, actual: 4 })
        ));
        assert!(matches!(
            layout.validate_series(&[1.0, 2.0, f64::NAN, 4.0, 5.0]),
            Err(Error::MissingValue { index: 2 })
        ));
    }
}
