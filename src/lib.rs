//! Rank-based detection of rhythmic signals in replicate time series
//!
//! This crate bundles the workspace members behind one dependency:
//!
//! - [`core`]: sampling layouts, ranking, concordance and the shared error type
//! - [`waveform`]: reference waveforms and the per-layout reference library
//! - [`null`]: exact, normal and Monte-Carlo null distributions
//! - [`search`]: the period/offset search engine and batch drivers
//!
//! # Example
//!
//! ```rust
//! use rhythm_stats::prelude::*;
//!
//! let layout = TimepointLayout::uniform(12, 2, 2.0).unwrap();
//! let config = SearchConfig::new(layout.clone(), PeriodGrid::range(20.0, 28.0, 4.0))
//!     .with_density(2.0)
//!     .with_null_model(NullModelKind::Normal);
//! let engine = SearchEngine::new(config).unwrap();
//!
//! let times = layout.expand(layout.times()).unwrap();
//! let series: Vec<f64> = times
//!     .iter()
//!     .map(|t| (t * std::f64::consts::TAU / 24.0).cos())
//!     .collect();
//! let result = engine.run(&series).unwrap();
//! assert!(result.is_significant(0.05));
//! ```

pub use rhythm_core as core;
pub use rhythm_null as null;
pub use rhythm_search as search;
pub use rhythm_waveform as waveform;

pub use rhythm_core::{Error, ReplicateSpec, Result, TimepointLayout};
pub use rhythm_null::{NullDistribution, NullModel, NullModelKind};
pub use rhythm_search::{
    run_batch, run_stream, AmplitudeMethod, PeriodGrid, PeriodSummary, SearchConfig, SearchEngine,
    SearchResult, SearchSettings,
};
pub use rhythm_waveform::Waveform;

#[cfg(feature = "parallel")]
pub use rhythm_search::run_batch_with_threads;

/// Convenient imports for running a search
pub mod prelude {
    pub use rhythm_core::{ReplicateSpec, TimepointLayout};
    pub use rhythm_null::NullModelKind;
    pub use rhythm_search::{
        run_batch, run_stream, AmplitudeMethod, PeriodGrid, SearchConfig, SearchEngine,
        SearchResult, SearchSettings,
    };
    pub use rhythm_waveform::Waveform;
}
