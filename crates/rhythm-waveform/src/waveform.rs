//! Waveform shapes evaluated on a normalized phase domain

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Rounded pi used when converting times to angles
///
/// Keeping the historical four-digit constant means sample points that
/// mirror each other around a peak never evaluate to bit-identical values,
/// so reference ranks carry no accidental ties.
pub const PI_HAT: f64 = 3.1416;

/// Default width of the ramp waveforms
pub const DEFAULT_RAMP_WIDTH: f64 = 3.0 * PI / 2.0;

/// Default half-width of the impulse waveform
pub const DEFAULT_IMPULSE_WIDTH: f64 = PI / 8.0;

/// Shape of the reference oscillation
///
/// Every shape is 2π-periodic. Cosine and step are symmetric: shifting them
/// by half a period negates them (in rank terms), so only half a period of
/// phases is structurally distinct and a negative score identifies the
/// anti-phase match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Waveform {
    #[default]
    Cosine,
    /// Linear rise from 0 to 1 over `width`, then 0 for the rest of the cycle
    RampUp { width: f64 },
    /// Linear fall from 1 to 0 over `width`, then 0 for the rest of the cycle
    RampDown { width: f64 },
    /// Triangular spike at phase 0 with half-width `width`
    Impulse { width: f64 },
    /// 1 on the first half of the cycle, 0 on the second
    Step,
}

impl Waveform {
    pub fn ramp_up() -> Self {
        Self::RampUp { width: DEFAULT_RAMP_WIDTH }
    }

    pub fn ramp_down() -> Self {
        Self::RampDown { width: DEFAULT_RAMP_WIDTH }
    }

    pub fn impulse() -> Self {
        Self::Impulse { width: DEFAULT_IMPULSE_WIDTH }
    }

    /// Evaluate at an arbitrary angle
    pub fn evaluate(&self, angle: f64) -> f64 {
        match *self {
            Self::Cosine => angle.cos(),
            Self::RampUp { width } => {
                let x = normalize_phase(angle);
                if x <= width {
                    x / width
                } else {
                    0.0
                }
            }
            Self::RampDown { width } => {
                let x = normalize_phase(angle);
                (1.0 - x / width).max(0.0)
            }
            Self::Impulse { width } => {
                let x = normalize_phase(angle);
                let d = x.min(TAU - x);
                (1.0 - d / width).max(0.0)
            }
            Self::Step => {
                if normalize_phase(angle) < PI {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Whether a half-period shift negates the waveform
    ///
    /// For the step this holds on ranks: the shifted step is `1 - x`.
    pub fn is_symmetric(&self) -> bool {
        matches!(self, Self::Cosine | Self::Step)
    }

    /// Offsets are expressed in half-period units for symmetric shapes
    pub fn phase_divisor(&self) -> f64 {
        if self.is_symmetric() {
            2.0
        } else {
            1.0
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::RampUp { .. } => "ramp_up",
            Self::RampDown { .. } => "ramp_down",
            Self::Impulse { .. } => "impulse",
            Self::Step => "step",
        }
    }

    /// Whether the shape parameters are usable
    pub fn is_valid(&self) -> bool {
        match *self {
            Self::RampUp { width } | Self::RampDown { width } | Self::Impulse { width } => {
                width.is_finite() && width > 0.0
            }
            Self::Cosine | Self::Step => true,
        }
    }
}

/// Map an angle onto [0, 2π)
pub fn normalize_phase(angle: f64) -> f64 {
    let x = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU itself for tiny negative inputs
    if x >= TAU {
        0.0
    } else {
        x
    }
}
