//! Core types and primitives for rank-based rhythm detection
//!
//! This crate provides the foundation shared by the reference generator, the
//! null distributions and the search engine:
//!
//! - **Error handling**: one error type and `Result` alias for every crate
//! - **Sampling layout**: distinct timepoints with replicate counts
//! - **Ranking**: tie-averaged fractional ranks on [0, 1]
//! - **Concordance**: pairwise sign vectors and the concordance score
//! - **Compensated arithmetic**: two-sum primitives and double-double values
//!
//! # Example
//!
//! ```rust
//! use rhythm_core::{concordance, TimepointLayout};
//!
//! let layout = TimepointLayout::uniform(6, 1, 4.0).unwrap();
//! let series = [0.1, 0.9, 2.2, 1.4, 0.3, -0.5];
//! layout.validate_series(&series).unwrap();
//!
//! // A series always agrees perfectly with itself
//! let s = concordance::score(&series, &series).unwrap();
//! assert_eq!(s, layout.max_score());
//! ```

pub mod compensated;
pub mod concordance;
pub mod error;
pub mod layout;
pub mod rank;

// Re-exports
pub use compensated::DoubleDouble;
pub use concordance::{score, tau_vector};
pub use error::{Error, Result};
pub use layout::{max_score, ReplicateSpec, TimepointLayout};
pub use rank::fractional_ranks;
