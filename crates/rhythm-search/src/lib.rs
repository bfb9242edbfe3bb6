//! Period and phase search for rhythmic signals
//!
//! For each candidate period the engine sweeps reference phase offsets,
//! keeps the best-scoring offset, converts its score to a p-value with the
//! configured null model, applies a Bonferroni correction over the number
//! of candidate periods and reports the global best fit.
//!
//! # Example
//!
//! ```rust
//! use rhythm_core::TimepointLayout;
//! use rhythm_search::{PeriodGrid, SearchConfig, SearchEngine};
//!
//! let layout = TimepointLayout::uniform(12, 1, 2.0).unwrap();
//! let config = SearchConfig::new(layout, PeriodGrid::range(20.0, 28.0, 4.0)).with_density(2.0);
//! let engine = SearchEngine::new(config).unwrap();
//!
//! let series: Vec<f64> = (0..12)
//!     .map(|i| (i as f64 * 2.0 * std::f64::consts::TAU / 24.0).cos())
//!     .collect();
//! let result = engine.run(&series).unwrap();
//! assert!(result.p_value < 0.05);
//! assert_eq!(result.per_period.len(), 3);
//! ```

pub mod amplitude;
pub mod batch;
pub mod config;
pub mod correction;
pub mod engine;
pub mod scanner;
pub mod types;

pub use amplitude::{iqr_amplitude, sign_weighted_amplitude, AmplitudeMethod};
#[cfg(feature = "parallel")]
pub use batch::run_batch_with_threads;
pub use batch::{run_batch, run_stream};
pub use config::{PeriodGrid, SearchConfig, SearchSettings, DEFAULT_DENSITY};
pub use correction::bonferroni;
pub use engine::SearchEngine;
pub use scanner::{phase_lag, PeriodScan, PeriodScanner};
pub use types::{PeriodSummary, SearchResult};
