//! Period/offset search with Bonferroni correction and tie resolution

use crate::amplitude::{iqr_amplitude, sign_weighted_amplitude, AmplitudeMethod};
use crate::config::SearchConfig;
use crate::correction::bonferroni;
use crate::scanner::{PeriodScan, PeriodScanner};
use crate::types::{PeriodSummary, SearchResult};
use rhythm_core::compensated::expansion_sum;
use rhythm_core::{concordance, Error, Result};
use rhythm_null::NullModel;
use rhythm_waveform::ReferenceLibrary;
use tracing::{debug, instrument, trace};

/// A (period, offset) pair sharing the minimal adjusted p-value
struct Candidate {
    scanner: usize,
    offset: f64,
    lag: f64,
    score: i64,
}

/// Read-only search engine for one run configuration
///
/// Construction builds every reference, tau vector and null table up
/// front; afterwards `run` only reads shared state, so one engine can
/// score many series concurrently.
#[derive(Debug)]
pub struct SearchEngine {
    config: SearchConfig,
    periods: Vec<f64>,
    library: ReferenceLibrary,
    scanners: Vec<PeriodScanner>,
    null_model: NullModel,
    correction_factor: f64,
}

impl SearchEngine {
    #[instrument(skip(config), fields(observations = config.layout.total_observations()))]
    pub fn new(config: SearchConfig) -> Result<Self> {
        let periods = config.validate()?;

        let mut library = ReferenceLibrary::new(config.layout.clone(), config.waveform);
        let mut null_model = NullModel::build(config.null_model, &config.layout)?;
        let mut scanners = Vec::with_capacity(periods.len());

        for &period in &periods {
            let scanner = PeriodScanner::new(&mut library, period, config.density)?;
            if let Some(reference) = scanner.references().first() {
                null_model.register_period(period, reference)?;
            }
            scanners.push(scanner);
        }

        debug!(
            periods = periods.len(),
            references = library.len(),
            null_model = null_model.name(),
            "search engine ready"
        );

        Ok(Self {
            correction_factor: periods.len() as f64,
            config,
            periods,
            library,
            scanners,
            null_model,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Expanded candidate periods, in search order
    pub fn periods(&self) -> &[f64] {
        &self.periods
    }

    pub fn library(&self) -> &ReferenceLibrary {
        &self.library
    }

    pub fn null_model(&self) -> &NullModel {
        &self.null_model
    }

    /// Bonferroni factor: the number of candidate periods
    pub fn correction_factor(&self) -> f64 {
        self.correction_factor
    }

    pub fn max_score(&self) -> i64 {
        self.config.layout.max_score()
    }

    fn adjusted_p(&self, score: i64, period: f64) -> Result<f64> {
        Ok(bonferroni(
            self.null_model.p_value(score, period)?,
            self.correction_factor,
        ))
    }

    /// Search one series
    ///
    /// Fails on a length mismatch with the layout or on any non-finite
    /// value; nothing from a previous call influences the result.
    pub fn run(&self, series: &[f64]) -> Result<SearchResult> {
        self.config.layout.validate_series(series)?;
        let data_tau = concordance::tau_vector(series);

        // per-period sweep
        let scans = self
            .scanners
            .iter()
            .map(|scanner| scanner.scan(&data_tau))
            .collect::<Result<Vec<PeriodScan>>>()?;

        let mut per_period = Vec::with_capacity(scans.len());
        for (scanner, scan) in self.scanners.iter().zip(&scans) {
            let score = scan.best_score();
            let p_value = self.null_model.p_value(score, scan.period)?;
            per_period.push(PeriodSummary {
                period: scan.period,
                offset: scan.best_offset(),
                lag: scanner.lag(scan.best_offset(), score),
                score,
                p_value,
                adjusted_p_value: bonferroni(p_value, self.correction_factor),
            });
        }

        // global selection
        let best_p = per_period
            .iter()
            .map(|s| s.adjusted_p_value)
            .fold(f64::INFINITY, f64::min);

        let mut candidates = Vec::new();
        for (index, (scanner, scan)) in self.scanners.iter().zip(&scans).enumerate() {
            for &(offset, score) in &scan.scores {
                if self.adjusted_p(score, scan.period)? == best_p {
                    candidates.push(Candidate {
                        scanner: index,
                        offset,
                        lag: scanner.lag(offset, score),
                        score,
                    });
                }
            }
        }

        let winner = candidates
            .iter()
            .reduce(|best, c| if c.score.abs() > best.score.abs() { c } else { best })
            .ok_or_else(|| {
                Error::Computation("no candidate matched the minimal p-value".to_string())
            })?;

        let count = candidates.len() as f64;
        let periods: Vec<f64> = candidates
            .iter()
            .map(|c| self.scanners[c.scanner].period())
            .collect();
        let lags: Vec<f64> = candidates.iter().map(|c| c.lag).collect();
        let period = expansion_sum(&periods).to_f64() / count;
        let lag = expansion_sum(&lags).to_f64() / count;

        let amplitude = match self.config.amplitude {
            AmplitudeMethod::InterquartileRange => iqr_amplitude(series)?,
            AmplitudeMethod::SignWeighted => {
                let scanner = &self.scanners[winner.scanner];
                let reference = scanner.reference(winner.offset).ok_or_else(|| {
                    Error::Computation(format!(
                        "missing reference for period {} offset {}",
                        scanner.period(),
                        winner.offset
                    ))
                })?;
                sign_weighted_amplitude(series, reference.expanded_signs(), winner.score)?
            }
        };

        trace!(
            period,
            lag,
            score = winner.score,
            p_value = best_p,
            ties = candidates.len(),
            "series searched"
        );

        Ok(SearchResult {
            period,
            lag,
            amplitude,
            score: winner.score,
            tau: winner.score as f64 / self.max_score() as f64,
            p_value: best_p,
            ties: candidates.len(),
            per_period,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PeriodGrid;
    use approx::assert_relative_eq;
    use rhythm_core::TimepointLayout;
    use rhythm_null::{NullDistribution, NullModelKind};
    use rhythm_waveform::{Reference, Waveform, PI_HAT};

    fn cosine(period: f64, offset: f64, n: usize) -> Vec<f64> {
        let factor = 2.0 * PI_HAT / period;
        (0..n)
            .map(|t| (t as f64 * factor + 0.5 * offset * factor).cos())
            .collect()
    }

    fn engine() -> SearchEngine {
        let layout = TimepointLayout::uniform(12, 1, 1.0).unwrap();
        SearchEngine::new(SearchConfig::new(layout, PeriodGrid::range(6.0, 12.0, 1.0))).unwrap()
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchEngine>();
    }

    #[test]
    fn test_construction_is_eager() {
        let engine = engine();
        assert_eq!(engine.periods().len(), 7);
        assert_eq!(engine.correction_factor(), 7.0);
        // offsets 0..P for P = 6..=12
        assert_eq!(engine.library().len(), (6..=12).sum::<usize>());
        assert!(engine
            .scanners
            .iter()
            .flat_map(|s| s.references())
            .all(|r| r.is_prepared()));
    }

    #[test]
    fn test_recovers_period_and_lag() {
        let engine = engine();
        let result = engine.run(&cosine(9.0, 4.0, 12)).unwrap();
        assert_eq!(result.period, 9.0);
        assert_eq!(result.lag, 7.0);
        assert_eq!(result.score, 66);
        assert_eq!(result.tau, 1.0);
        assert_eq!(result.ties, 1);
        assert_eq!(result.per_period.len(), 7);
        assert_relative_eq!(result.amplitude, 1.0, epsilon = 0.5);
    }

    #[test]
    fn test_adjusted_p_is_exact_product() {
        let engine = engine();
        let result = engine.run(&cosine(10.0, 3.0, 12)).unwrap();
        let NullModel::Exact(exact) = engine.null_model() else {
            panic!("default null model is exact");
        };
        let raw = exact.p_value(result.score);
        assert!(raw * 7.0 < 1.0);
        assert_eq!(result.p_value, raw * 7.0);
        for summary in &result.per_period {
            assert_eq!(summary.adjusted_p_value, (summary.p_value * 7.0).min(1.0));
        }
    }

    #[test]
    fn test_runs_do_not_share_state() {
        let engine = engine();
        let a = engine.run(&cosine(8.0, 2.0, 12)).unwrap();
        let _ = engine.run(&cosine(11.0, 5.0, 12)).unwrap();
        let again = engine.run(&cosine(8.0, 2.0, 12)).unwrap();
        assert_eq!(a, again);
    }

    #[test]
    fn test_row_errors() {
        let engine = engine();
        assert!(matches!(
            engine.run(&[1.0; 11]),
            Err(Error::LengthMismatch { expected: 12, actual: 11 })
        ));
        let mut series = cosine(8.0, 0.0, 12);
        series[4] = f64::NAN;
        assert!(matches!(engine.run(&series), Err(Error::MissingValue { index: 4 })));
    }

    #[test]
    fn test_flat_series_ties_everything() {
        let engine = engine();
        let result = engine.run(&[2.0; 12]).unwrap();
        assert_eq!(result.score, 0);
        assert_eq!(result.p_value, 1.0);
        assert_eq!(result.ties, (6..=12).sum::<usize>());
        assert_eq!(result.amplitude, 0.0);
    }

    fn replicated_cosine(timepoints: usize) -> Vec<f64> {
        (0..2 * timepoints)
            .map(|i| 3.0 * ((i / 2) as f64 * 2.0 * 2.0 * PI_HAT / 24.0).cos())
            .collect()
    }

    #[test]
    fn test_normal_model_and_iqr() {
        let layout = TimepointLayout::uniform(24, 2, 2.0).unwrap();
        let config = SearchConfig::new(layout, vec![20.0, 24.0, 28.0])
            .with_density(2.0)
            .with_null_model(NullModelKind::Normal)
            .with_amplitude(AmplitudeMethod::InterquartileRange);
        let engine = SearchEngine::new(config).unwrap();
        let result = engine.run(&replicated_cosine(24)).unwrap();
        assert_eq!(result.period, 24.0);
        assert_eq!(result.lag, 0.0);
        assert_eq!(result.score, engine.max_score());
        assert_eq!(result.ties, 1);
        assert!(result.p_value < 1e-12);
        // peak-to-peak scale for a 3.0 amplitude cosine
        assert!(result.amplitude > 3.0 && result.amplitude < 12.0);
    }

    /// Reference values at `(24, offset)` with a tiny ramp to break ties
    fn shaped_series(layout: &TimepointLayout, offset: f64, waveform: Waveform) -> Vec<f64> {
        let reference = Reference::new(layout, 24.0, offset, waveform).unwrap();
        reference
            .values()
            .iter()
            .zip(layout.times())
            .map(|(v, t)| v + 1e-9 * t)
            .collect()
    }

    fn shaped_engine(layout: &TimepointLayout, waveform: Waveform, density: f64) -> SearchEngine {
        let config = SearchConfig::new(layout.clone(), vec![20.0, 24.0, 28.0])
            .with_waveform(waveform)
            .with_density(density)
            .with_null_model(NullModelKind::Normal);
        SearchEngine::new(config).unwrap()
    }

    #[test]
    fn test_asymmetric_waveforms_recover_lag() {
        let layout = TimepointLayout::uniform(48, 1, 1.0).unwrap();
        for waveform in [Waveform::ramp_up(), Waveform::ramp_down(), Waveform::impulse()] {
            let engine = shaped_engine(&layout, waveform, 1.0);
            let result = engine.run(&shaped_series(&layout, 5.0, waveform)).unwrap();
            assert_eq!(result.period, 24.0, "{}", waveform.name());
            assert_eq!(result.lag, 19.0, "{}", waveform.name());
            assert_eq!(result.ties, 1, "{}", waveform.name());
            assert!(result.score > 0);
        }
    }

    #[test]
    fn test_step_anti_phase_does_not_skew_lag() {
        let layout = TimepointLayout::uniform(48, 1, 1.0).unwrap();
        let engine = shaped_engine(&layout, Waveform::Step, 2.0);
        let series = shaped_series(&layout, 10.0, Waveform::Step);

        let result = engine.run(&series).unwrap();
        assert_eq!(result.period, 24.0);
        assert_eq!(result.lag, 19.0);
        assert_eq!(result.ties, 1);
        assert!(result.score > 0);

        // the inverted step rises half a period later
        let inverted: Vec<f64> = series.iter().map(|x| -x).collect();
        let result = engine.run(&inverted).unwrap();
        assert_eq!(result.lag, 7.0);
        assert_eq!(result.ties, 1);
        assert!(result.score < 0);
    }

    #[test]
    fn test_indistinguishable_periods_are_averaged() {
        // less than one cycle sampled: periods 24 and 28 order the points identically
        let layout = TimepointLayout::uniform(12, 2, 2.0).unwrap();
        let config = SearchConfig::new(layout, vec![20.0, 24.0, 28.0])
            .with_density(2.0)
            .with_null_model(NullModelKind::Normal);
        let engine = SearchEngine::new(config).unwrap();
        let result = engine.run(&replicated_cosine(12)).unwrap();
        assert_eq!(result.ties, 2);
        assert_eq!(result.period, 26.0);
        assert_eq!(result.score, engine.max_score());
        let p24 = result.period_summary(24.0).unwrap();
        let p28 = result.period_summary(28.0).unwrap();
        assert_eq!(p24.adjusted_p_value, p28.adjusted_p_value);
        assert_eq!(result.p_value, p24.adjusted_p_value);
    }
}
