//! Search configuration and settings layering

use crate::amplitude::AmplitudeMethod;
use rhythm_core::{Error, ReplicateSpec, Result, TimepointLayout};
use rhythm_null::NullModelKind;
use rhythm_waveform::Waveform;
use serde::{Deserialize, Serialize};

/// Candidate periods to search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PeriodGrid {
    /// An explicit list, searched in the given order
    Explicit(Vec<f64>),
    /// `min, min + step, …` up to and including `max`
    Range { min: f64, max: f64, step: f64 },
}

impl PeriodGrid {
    pub fn range(min: f64, max: f64, step: f64) -> Self {
        Self::Range { min, max, step }
    }

    /// Expand into the list of candidate periods
    pub fn periods(&self) -> Result<Vec<f64>> {
        let periods = match *self {
            Self::Explicit(ref periods) => periods.clone(),
            Self::Range { min, max, step } => {
                if !(step.is_finite() && step > 0.0) {
                    return Err(Error::configuration(format!(
                        "period step must be positive, got {step}"
                    )));
                }
                if !(min.is_finite() && max.is_finite()) || max < min {
                    return Err(Error::configuration(format!(
                        "invalid period range {min}..={max}"
                    )));
                }
                // inclusive upper bound, tolerant of accumulated rounding
                let tolerance = step * 1e-9;
                (0..)
                    .map(|k| min + k as f64 * step)
                    .take_while(|&p| p <= max + tolerance)
                    .collect()
            }
        };

        if periods.is_empty() {
            return Err(Error::configuration("at least one candidate period is required"));
        }
        if let Some(bad) = periods.iter().find(|p| !(p.is_finite() && **p > 0.0)) {
            return Err(Error::configuration(format!(
                "candidate periods must be positive, got {bad}"
            )));
        }
        Ok(periods)
    }
}

impl From<Vec<f64>> for PeriodGrid {
    fn from(periods: Vec<f64>) -> Self {
        Self::Explicit(periods)
    }
}

/// Default offset step, in the same time units as the layout
pub const DEFAULT_DENSITY: f64 = 1.0;

/// Everything a search engine needs, validated before any series is scored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub layout: TimepointLayout,
    pub periods: PeriodGrid,
    #[serde(default)]
    pub waveform: Waveform,
    #[serde(default)]
    pub null_model: NullModelKind,
    #[serde(default = "default_density")]
    pub density: f64,
    #[serde(default)]
    pub amplitude: AmplitudeMethod,
}

fn default_density() -> f64 {
    DEFAULT_DENSITY
}

impl SearchConfig {
    /// Cosine references, exact null and sign-weighted amplitude
    pub fn new(layout: TimepointLayout, periods: impl Into<PeriodGrid>) -> Self {
        Self {
            layout,
            periods: periods.into(),
            waveform: Waveform::default(),
            null_model: NullModelKind::default(),
            density: DEFAULT_DENSITY,
            amplitude: AmplitudeMethod::default(),
        }
    }

    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn with_null_model(mut self, null_model: NullModelKind) -> Self {
        self.null_model = null_model;
        self
    }

    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    pub fn with_amplitude(mut self, amplitude: AmplitudeMethod) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Check the configuration and return the expanded period list
    pub fn validate(&self) -> Result<Vec<f64>> {
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(Error::configuration(format!(
                "offset density must be positive, got {}",
                self.density
            )));
        }
        if !self.waveform.is_valid() {
            return Err(Error::configuration(format!(
                "invalid {} waveform parameters",
                self.waveform.name()
            )));
        }
        if let NullModelKind::MonteCarlo { trials: 0, .. } = self.null_model {
            return Err(Error::configuration("Monte-Carlo trial count must be positive"));
        }
        self.periods.periods()
    }
}

/// Partially specified run settings from one source
///
/// Collaborators fill one of these from the command line, one from a
/// configuration file and one from the data header; [`SearchSettings::layered`]
/// merges them with command line > file > header precedence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub times: Option<Vec<f64>>,
    pub timepoints: Option<usize>,
    pub interval: Option<f64>,
    pub replicates: Option<ReplicateSpec>,
    pub periods: Option<PeriodGrid>,
    pub waveform: Option<Waveform>,
    pub null_model: Option<NullModelKind>,
    pub density: Option<f64>,
    pub amplitude: Option<AmplitudeMethod>,
}

impl SearchSettings {
    /// Field-wise merge where `self` wins over `fallback`
    pub fn or(self, fallback: Self) -> Self {
        Self {
            times: self.times.or(fallback.times),
            timepoints: self.timepoints.or(fallback.timepoints),
            interval: self.interval.or(fallback.interval),
            replicates: self.replicates.or(fallback.replicates),
            periods: self.periods.or(fallback.periods),
            waveform: self.waveform.or(fallback.waveform),
            null_model: self.null_model.or(fallback.null_model),
            density: self.density.or(fallback.density),
            amplitude: self.amplitude.or(fallback.amplitude),
        }
    }

    pub fn layered(explicit: Self, file: Self, inferred: Self) -> Self {
        explicit.or(file).or(inferred)
    }

    /// Resolve into a validated configuration
    ///
    /// Explicit `times` take precedence over `timepoints` and `interval`;
    /// replicates default to one per timepoint and the interval to 1.
    pub fn into_config(self) -> Result<SearchConfig> {
        let replicates = self.replicates.unwrap_or(ReplicateSpec::Uniform(1));
        let layout = match (self.times, self.timepoints) {
            (Some(times), _) => {
                let counts = replicates.resolve(times.len())?;
                TimepointLayout::new(times, counts)?
            }
            (None, Some(timepoints)) => {
                TimepointLayout::uniform(timepoints, replicates, self.interval.unwrap_or(1.0))?
            }
            (None, None) => {
                return Err(Error::configuration(
                    "either sampling times or a timepoint count is required",
                ))
            }
        };
        let periods = self
            .periods
            .ok_or_else(|| Error::configuration("no candidate periods given"))?;

        let config = SearchConfig {
            layout,
            periods,
            waveform: self.waveform.unwrap_or_default(),
            null_model: self.null_model.unwrap_or_default(),
            density: self.density.unwrap_or(DEFAULT_DENSITY),
            amplitude: self.amplitude.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}
