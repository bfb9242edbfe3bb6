//! Run-time selection of the null distribution

use crate::harding::HardingDistribution;
use crate::monte_carlo::{MonteCarloLibrary, DEFAULT_SEED, DEFAULT_TRIALS};
use crate::normal::NormalDistribution;
use crate::traits::NullDistribution;
use rhythm_core::{Result, TimepointLayout};
use rhythm_waveform::Reference;
use serde::{Deserialize, Serialize};

fn default_trials() -> usize {
    DEFAULT_TRIALS
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

/// Which null distribution a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NullModelKind {
    /// Harding's exact permutation distribution
    #[default]
    Exact,
    /// Gaussian approximation, for layouts too large for the exact table
    Normal,
    /// Empirical distribution from seeded random series, one per period
    MonteCarlo {
        #[serde(default = "default_trials")]
        trials: usize,
        #[serde(default = "default_seed")]
        seed: u64,
    },
}

impl NullModelKind {
    pub fn monte_carlo() -> Self {
        Self::MonteCarlo {
            trials: DEFAULT_TRIALS,
            seed: DEFAULT_SEED,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Normal => "normal",
            Self::MonteCarlo { .. } => "monte_carlo",
        }
    }
}

/// A built null distribution for one layout
#[derive(Debug, Clone)]
pub enum NullModel {
    Exact(HardingDistribution),
    Normal(NormalDistribution),
    MonteCarlo(MonteCarloLibrary),
}

impl NullModel {
    /// Build the selected distribution for `layout`
    ///
    /// Monte-Carlo models start empty; periods are added with
    /// [`NullModel::register_period`].
    pub fn build(kind: NullModelKind, layout: &TimepointLayout) -> Result<Self> {
        Ok(match kind {
            NullModelKind::Exact => Self::Exact(HardingDistribution::new(layout.replicates())?),
            NullModelKind::Normal => Self::Normal(NormalDistribution::new(layout.replicates())?),
            NullModelKind::MonteCarlo { trials, seed } => {
                Self::MonteCarlo(MonteCarloLibrary::new(layout.clone(), trials, seed))
            }
        })
    }

    /// Prepare any per-period state; a no-op for layout-wide models
    pub fn register_period(&mut self, period: f64, reference: &Reference) -> Result<()> {
        if let Self::MonteCarlo(library) = self {
            library.add_reference(period, reference)?;
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Exact(dist) => dist.name(),
            Self::Normal(dist) => dist.name(),
            Self::MonteCarlo(_) => "monte_carlo",
        }
    }

    /// Unadjusted two-sided p-value of `score` observed at `period`
    pub fn p_value(&self, score: i64, period: f64) -> Result<f64> {
        match self {
            Self::Exact(dist) => Ok(dist.p_value(score)),
            Self::Normal(dist) => Ok(dist.p_value(score)),
            Self::MonteCarlo(library) => library.p_value(score, period),
        }
    }
}
