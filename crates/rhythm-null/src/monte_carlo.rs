//! Monte-Carlo null distribution of the concordance score
//!
//! Random series are scored against a fixed reference and the empirical
//! distribution of |score| is kept sorted, so a p-value is one binary
//! search. Sampling is seeded and fully reproducible.

use crate::traits::NullDistribution;
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rhythm_core::{concordance, Error, Result, TimepointLayout};
use rhythm_waveform::Reference;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Number of random series drawn when none is configured
pub const DEFAULT_TRIALS: usize = 25_000;

/// Seed used when none is configured
pub const DEFAULT_SEED: u64 = 42;

/// Empirical null for one reference
#[derive(Debug, Clone)]
pub struct MonteCarloDistribution {
    max_score: i64,
    sorted_abs_scores: Vec<i64>,
}

impl MonteCarloDistribution {
    /// Sample `trials` uniform random series and score them against `reference`
    #[instrument(skip(layout, reference), fields(period = reference.period()))]
    pub fn new(
        layout: &TimepointLayout,
        reference: &Reference,
        trials: usize,
        seed: u64,
    ) -> Result<Self> {
        if trials == 0 {
            return Err(Error::InvalidParameter(
                "Monte-Carlo trial count must be positive".to_string(),
            ));
        }
        let n = layout.total_observations();
        if reference.expanded_ranks().len() != n {
            return Err(Error::size_mismatch(
                n,
                reference.expanded_ranks().len(),
                "Monte-Carlo reference",
            ));
        }

        let reference_tau = reference.tau_vector();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut series = vec![0.0; n];
        let mut sorted_abs_scores = Vec::with_capacity(trials);

        for _ in 0..trials {
            for x in series.iter_mut() {
                *x = rng.gen::<f64>();
            }
            let tau = concordance::tau_vector(&series);
            sorted_abs_scores.push(concordance::dot(&tau, reference_tau)?.abs());
        }
        sorted_abs_scores.sort_unstable();

        debug!(
            trials,
            max_sampled = sorted_abs_scores.last().copied().unwrap_or(0),
            "sampled Monte-Carlo null"
        );

        Ok(Self {
            max_score: layout.max_score(),
            sorted_abs_scores,
        })
    }

    pub fn trials(&self) -> usize {
        self.sorted_abs_scores.len()
    }

    /// Sampled |scores| in ascending order
    pub fn samples(&self) -> &[i64] {
        &self.sorted_abs_scores
    }
}

impl NullDistribution for MonteCarloDistribution {
    fn name(&self) -> &str {
        "monte_carlo"
    }

    fn max_score(&self) -> i64 {
        self.max_score
    }

    fn p_value(&self, score: i64) -> f64 {
        if score == 0 {
            return 1.0;
        }
        let target = score.abs();
        let below = self.sorted_abs_scores.partition_point(|&s| s < target);
        let at_least = self.sorted_abs_scores.len() - below;
        (at_least as f64 / self.sorted_abs_scores.len() as f64).clamp(0.0, 1.0)
    }
}

/// Per-period memo of Monte-Carlo distributions
#[derive(Debug, Clone)]
pub struct MonteCarloLibrary {
    layout: TimepointLayout,
    trials: usize,
    seed: u64,
    distributions: BTreeMap<OrderedFloat<f64>, Arc<MonteCarloDistribution>>,
}

impl MonteCarloLibrary {
    pub fn new(layout: TimepointLayout, trials: usize, seed: u64) -> Self {
        Self {
            layout,
            trials,
            seed,
            distributions: BTreeMap::new(),
        }
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sample the null for `period` once; later calls reuse it
    pub fn add_reference(
        &mut self,
        period: f64,
        reference: &Reference,
    ) -> Result<Arc<MonteCarloDistribution>> {
        if let Some(existing) = self.distributions.get(&OrderedFloat(period)) {
            return Ok(Arc::clone(existing));
        }
        let dist = Arc::new(MonteCarloDistribution::new(
            &self.layout,
            reference,
            self.trials,
            self.seed,
        )?);
        self.distributions.insert(OrderedFloat(period), Arc::clone(&dist));
        Ok(dist)
    }

    pub fn get(&self, period: f64) -> Option<&MonteCarloDistribution> {
        self.distributions.get(&OrderedFloat(period)).map(Arc::as_ref)
    }

    pub fn p_value(&self, score: i64, period: f64) -> Result<f64> {
        self.get(period)
            .map(|dist| dist.p_value(score))
            .ok_or_else(|| {
                Error::configuration(format!(
                    "no Monte-Carlo distribution registered for period {period}"
                ))
            })
    }

    pub fn len(&self) -> usize {
        self.distributions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distributions.is_empty()
    }
}
