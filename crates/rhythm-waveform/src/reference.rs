//! A single synthetic reference series for one (period, offset)

use crate::waveform::{Waveform, PI_HAT};
use rhythm_core::{concordance, fractional_ranks, Error, Result, TimepointLayout};
use std::sync::OnceLock;

/// Reference oscillation sampled on a timepoint layout
///
/// Ranks and signs depend only on the period, offset, waveform and layout,
/// never on observed data, so one instance is reused for every input row.
/// The per-observation tau vector is computed on first use.
#[derive(Debug, Clone)]
pub struct Reference {
    period: f64,
    offset: f64,
    waveform: Waveform,
    values: Vec<f64>,
    ranks: Vec<f64>,
    signs: Vec<i8>,
    expanded_ranks: Vec<f64>,
    expanded_signs: Vec<i8>,
    tau: OnceLock<Vec<i8>>,
}

impl Reference {
    /// Build the reference for `period` shifted by `offset`
    ///
    /// The angle at time `t` is `t * 2π̂/period + offset * (2π̂/period) / d`
    /// where `d` is the waveform's phase divisor.
    pub fn new(
        layout: &TimepointLayout,
        period: f64,
        offset: f64,
        waveform: Waveform,
    ) -> Result<Self> {
        if !(period.is_finite() && period > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "period must be positive, got {period}"
            )));
        }
        if !offset.is_finite() {
            return Err(Error::InvalidParameter(format!("offset must be finite, got {offset}")));
        }
        if !waveform.is_valid() {
            return Err(Error::InvalidParameter(format!(
                "invalid {} waveform parameters",
                waveform.name()
            )));
        }

        let time_to_angle = 2.0 * PI_HAT / period;
        let phase = offset * time_to_angle / waveform.phase_divisor();
        let values: Vec<f64> = layout
            .times()
            .iter()
            .map(|&t| waveform.evaluate(t * time_to_angle + phase))
            .collect();
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::non_finite("reference values"));
        }

        let ranks = fractional_ranks(&values)?;
        let signs: Vec<i8> = values.iter().map(|&v| sign(v)).collect();
        let expanded_ranks = layout.expand(&ranks)?;
        let expanded_signs = layout.expand(&signs)?;

        Ok(Self {
            period,
            offset,
            waveform,
            values,
            ranks,
            signs,
            expanded_ranks,
            expanded_signs,
            tau: OnceLock::new(),
        })
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Raw waveform values, one per timepoint
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Fractional ranks, one per timepoint
    pub fn ranks(&self) -> &[f64] {
        &self.ranks
    }

    /// Signs of the raw values, one per timepoint
    pub fn signs(&self) -> &[i8] {
        &self.signs
    }

    /// Ranks repeated by replicate count, aligned with an observed series
    pub fn expanded_ranks(&self) -> &[f64] {
        &self.expanded_ranks
    }

    /// Signs repeated by replicate count, aligned with an observed series
    pub fn expanded_signs(&self) -> &[i8] {
        &self.expanded_signs
    }

    /// Pairwise sign vector over the expanded ranks, memoized
    pub fn tau_vector(&self) -> &[i8] {
        self.tau
            .get_or_init(|| concordance::tau_vector(&self.expanded_ranks))
    }

    /// Whether the tau vector has been computed yet
    pub fn is_prepared(&self) -> bool {
        self.tau.get().is_some()
    }

    /// Score a precomputed data tau vector against this reference
    pub fn score(&self, data_tau: &[i8]) -> Result<i64> {
        concordance::dot(data_tau, self.tau_vector())
    }
}

fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}
