//! Driving an engine over many series
//!
//! Rows are independent: one failing row yields an error for that row only
//! and never stops the batch.

use crate::engine::SearchEngine;
use crate::types::SearchResult;
use rhythm_core::Result;
use tracing::{debug, warn};

/// Search one row, logging failures by scope
///
/// Row errors (bad length, missing values) are expected in real input and
/// only logged at debug level; anything else points at the run itself.
fn score_row(engine: &SearchEngine, series: &[f64], row: usize) -> Result<SearchResult> {
    let result = engine.run(series);
    if let Err(ref e) = result {
        if e.is_row_error() {
            debug!(row, error = %e, "row rejected");
        } else {
            warn!(row, error = %e, "row failed");
        }
    }
    result
}

/// Score every `(id, series)` row, preserving input order
///
/// With the `parallel` feature rows are spread across the rayon pool.
pub fn run_batch<I>(
    engine: &SearchEngine,
    rows: Vec<(I, Vec<f64>)>,
) -> Vec<(I, Result<SearchResult>)>
where
    I: Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        rows.into_par_iter()
            .enumerate()
            .map(|(row, (id, series))| {
                let result = score_row(engine, &series, row);
                (id, result)
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        rows.into_iter()
            .enumerate()
            .map(|(row, (id, series))| {
                let result = score_row(engine, &series, row);
                (id, result)
            })
            .collect()
    }
}

/// Like [`run_batch`] on a dedicated pool of `num_threads` workers
#[cfg(feature = "parallel")]
pub fn run_batch_with_threads<I>(
    engine: &SearchEngine,
    rows: Vec<(I, Vec<f64>)>,
    num_threads: usize,
) -> Result<Vec<(I, Result<SearchResult>)>>
where
    I: Send,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(|e| {
            rhythm_core::Error::configuration(format!("Failed to create thread pool: {e}"))
        })?;
    Ok(pool.install(|| run_batch(engine, rows)))
}

/// Lazily score rows as they are pulled from `rows`
///
/// Nothing is buffered: each row is searched when the returned iterator
/// reaches it.
pub fn run_stream<'a, I, S, R>(
    engine: &'a SearchEngine,
    rows: R,
) -> impl Iterator<Item = (I, Result<SearchResult>)> + 'a
where
    R: IntoIterator<Item = (I, S)>,
    R::IntoIter: 'a,
    I: 'a,
    S: AsRef<[f64]> + 'a,
{
    rows.into_iter().enumerate().map(move |(row, (id, series))| {
        let result = score_row(engine, series.as_ref(), row);
        (id, result)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use rhythm_core::{Error, TimepointLayout};
    use std::cell::Cell;

    fn engine() -> SearchEngine {
        let layout = TimepointLayout::uniform(8, 1, 3.0).unwrap();
        SearchEngine::new(SearchConfig::new(layout, vec![21.0, 24.0]).with_density(3.0)).unwrap()
    }

    fn row(shift: f64) -> Vec<f64> {
        (0..8).map(|t| ((t as f64 * 3.0 + shift) * std::f64::consts::TAU / 24.0).cos()).collect()
    }

    #[test]
    fn test_batch_isolates_failures() {
        let engine = engine();
        let mut bad = row(0.0);
        bad[2] = f64::NAN;
        let rows = vec![
            ("a".to_string(), row(0.0)),
            ("b".to_string(), bad),
            ("c".to_string(), vec![1.0; 3]),
            ("d".to_string(), row(6.0)),
        ];
        let results = run_batch(&engine, rows);
        let ids: Vec<&str> = results.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c", "d"]);
        assert!(results[0].1.is_ok());
        assert!(matches!(results[1].1, Err(Error::MissingValue { index: 2 })));
        assert!(matches!(results[2].1, Err(Error::LengthMismatch { .. })));
        assert!(results[1..3]
            .iter()
            .all(|(_, r)| r.as_ref().is_err_and(|e| e.is_row_error())));
        assert!(results[3].1.is_ok());
    }

    #[test]
    fn test_stream_is_lazy() {
        let engine = engine();
        let pulled = Cell::new(0);
        let source = (0..5).map(|i| {
            pulled.set(pulled.get() + 1);
            (i, row(i as f64))
        });
        let mut stream = run_stream(&engine, source);
        assert_eq!(pulled.get(), 0);
        let (id, result) = stream.next().unwrap();
        assert_eq!(id, 0);
        assert!(result.is_ok());
        assert_eq!(pulled.get(), 1);
        assert_eq!(stream.count(), 4);
    }

    #[test]
    fn test_stream_matches_batch() {
        let engine = engine();
        let rows: Vec<(usize, Vec<f64>)> = (0..4).map(|i| (i, row(2.0 * i as f64))).collect();
        let streamed: Vec<_> = run_stream(&engine, rows.clone())
            .map(|(id, r)| (id, r.unwrap()))
            .collect();
        let batched: Vec<_> = run_batch(&engine, rows)
            .into_iter()
            .map(|(id, r)| (id, r.unwrap()))
            .collect();
        assert_eq!(streamed, batched);
    }
}
