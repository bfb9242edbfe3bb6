//! Cache of references keyed by (period, offset)

use crate::reference::Reference;
use crate::waveform::Waveform;
use ordered_float::OrderedFloat;
use rhythm_core::{Error, Result, TimepointLayout};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

type ReferenceKey = (OrderedFloat<f64>, OrderedFloat<f64>);

/// Owned reference cache for one layout and waveform
///
/// Population happens through `get_or_insert`, which takes `&mut self`;
/// once filled the library can be shared read-only.
#[derive(Debug, Clone)]
pub struct ReferenceLibrary {
    layout: TimepointLayout,
    waveform: Waveform,
    references: BTreeMap<ReferenceKey, Arc<Reference>>,
}

impl ReferenceLibrary {
    pub fn new(layout: TimepointLayout, waveform: Waveform) -> Self {
        Self {
            layout,
            waveform,
            references: BTreeMap::new(),
        }
    }

    pub fn layout(&self) -> &TimepointLayout {
        &self.layout
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Return the cached reference, building it on first request
    pub fn get_or_insert(&mut self, period: f64, offset: f64) -> Result<Arc<Reference>> {
        match self.references.entry((OrderedFloat(period), OrderedFloat(offset))) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let reference = Reference::new(&self.layout, period, offset, self.waveform)?;
                debug!(
                    period,
                    offset,
                    waveform = self.waveform.name(),
                    "cached new reference"
                );
                Ok(Arc::clone(entry.insert(Arc::new(reference))))
            }
        }
    }

    /// Look up a reference without building it
    pub fn get(&self, period: f64, offset: f64) -> Option<Arc<Reference>> {
        self.references
            .get(&(OrderedFloat(period), OrderedFloat(offset)))
            .cloned()
    }

    /// Build every reference for `period` at the given offset density
    pub fn populate_period(&mut self, period: f64, density: f64) -> Result<Vec<Arc<Reference>>> {
        offsets(period, density)?
            .into_iter()
            .map(|offset| self.get_or_insert(period, offset))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

/// Phase offsets `0, density, 2·density, …` strictly below `period`
pub fn offsets(period: f64, density: f64) -> Result<Vec<f64>> {
    if !(period.is_finite() && period > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "period must be positive, got {period}"
        )));
    }
    if !(density.is_finite() && density > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "offset density must be positive, got {density}"
        )));
    }
    // multiply rather than accumulate to avoid drift near the upper bound
    Ok((0..)
        .map(|k| k as f64 * density)
        .take_while(|&offset| offset < period)
        .collect())
}
