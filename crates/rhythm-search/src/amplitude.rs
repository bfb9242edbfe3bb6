//! Amplitude estimators

use rhythm_core::{Error, Result};
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Median, OrderStatistics};
use std::f64::consts::SQRT_2;

/// Which amplitude estimator the engine reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AmplitudeMethod {
    /// √2 × median of the sign-weighted, median-centred series
    #[default]
    SignWeighted,
    /// 1.5 × interquartile range, independent of the fitted reference
    InterquartileRange,
}

fn check_series(series: &[f64]) -> Result<()> {
    if series.is_empty() {
        return Err(Error::empty_input("amplitude estimation"));
    }
    if series.iter().any(|x| !x.is_finite()) {
        return Err(Error::non_finite("amplitude input"));
    }
    Ok(())
}

/// `1.5 × IQR` of the raw series
///
/// Scales like the peak-to-peak range of a sinusoid rather than its
/// amplitude: a cosine of amplitude A yields roughly 2A.
pub fn iqr_amplitude(series: &[f64]) -> Result<f64> {
    check_series(series)?;
    let mut data = Data::new(series.to_vec());
    Ok(1.5 * data.interquartile_range())
}

/// Sign-weighted median amplitude against a fitted reference
///
/// Each centred value `xᵢ − median(x)` is multiplied by the reference sign
/// at that observation and by the sign of the concordance score; zero
/// products are dropped and √2 × the median of the rest is returned.
/// Returns 0 when every product is zero.
pub fn sign_weighted_amplitude(series: &[f64], signs: &[i8], score: i64) -> Result<f64> {
    check_series(series)?;
    if signs.len() != series.len() {
        return Err(Error::size_mismatch(series.len(), signs.len(), "amplitude signs"));
    }

    let center = Data::new(series.to_vec()).median();
    let direction = if score < 0 { -1.0 } else { 1.0 };

    let weighted: Vec<f64> = series
        .iter()
        .zip(signs)
        .map(|(&x, &s)| direction * f64::from(s) * (x - center))
        .filter(|&v| v != 0.0)
        .collect();

    if weighted.is_empty() {
        return Ok(0.0);
    }
    Ok(SQRT_2 * Data::new(weighted).median())
}
