//! Null distributions for the concordance score
//!
//! Three interchangeable ways to turn a score into a p-value:
//!
//! - **Exact**: Harding's permutation recurrence, accounting for replicate ties
//! - **Normal**: Gaussian approximation with continuity correction
//! - **Monte-Carlo**: empirical distribution from seeded random series
//!
//! All of them implement [`NullDistribution`]; [`NullModel`] picks one at
//! run time from a serializable [`NullModelKind`].
//!
//! # Example
//!
//! ```rust
//! use rhythm_null::{HardingDistribution, NullDistribution};
//!
//! let exact = HardingDistribution::new(&[1, 1, 1]).unwrap();
//! assert_eq!(exact.p_value(0), 1.0);
//! assert!((exact.p_value(3) - 1.0 / 3.0).abs() < 1e-12);
//! ```

pub mod harding;
pub mod model;
pub mod monte_carlo;
pub mod normal;
pub mod traits;

pub use harding::HardingDistribution;
pub use model::{NullModel, NullModelKind};
pub use monte_carlo::{MonteCarloDistribution, MonteCarloLibrary, DEFAULT_SEED, DEFAULT_TRIALS};
pub use normal::NormalDistribution;
pub use traits::NullDistribution;
