//! Reference waveforms for rhythm detection
//!
//! A reference is a synthetic oscillation with a given period and phase
//! offset, sampled at the layout's timepoints and reduced to ranks and
//! signs. Observed series are compared against references by concordance.
//!
//! # Example
//!
//! ```rust
//! use rhythm_core::TimepointLayout;
//! use rhythm_waveform::{ReferenceLibrary, Waveform};
//!
//! let layout = TimepointLayout::uniform(12, 1, 2.0).unwrap();
//! let mut library = ReferenceLibrary::new(layout, Waveform::Cosine);
//! let references = library.populate_period(24.0, 2.0).unwrap();
//! assert_eq!(references.len(), 12);
//! assert_eq!(references[0].tau_vector().len(), 66);
//! ```

pub mod library;
pub mod reference;
pub mod waveform;

pub use library::{offsets, ReferenceLibrary};
pub use reference::Reference;
pub use waveform::{normalize_phase, Waveform, PI_HAT};
