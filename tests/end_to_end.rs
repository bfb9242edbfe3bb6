//! Full pipeline: settings layering, engine construction and batch scoring

use approx::assert_relative_eq;
use rand::prelude::*;
use rand_distr::Normal;
use rhythm_stats::prelude::*;
use rhythm_stats::waveform::Reference;
use rhythm_stats::{Error, NullModel};
use tracing::{info, info_span};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .try_init();
}

/// Cosine sampled exactly like the engine's reference at `(period, offset)`
fn sampled_cosine(layout: &TimepointLayout, period: f64, offset: f64, amplitude: f64) -> Vec<f64> {
    let reference = Reference::new(layout, period, offset, Waveform::Cosine).unwrap();
    layout
        .expand(reference.values())
        .unwrap()
        .iter()
        .map(|v| amplitude * v)
        .collect()
}

#[test]
fn test_json_settings_drive_a_batch() {
    init_tracing();

    let file: SearchSettings = serde_json::from_str(
        r#"{
            "periods": {"min": 20.0, "max": 28.0, "step": 4.0},
            "density": 4.0,
            "null_model": {"kind": "exact"}
        }"#,
    )
    .unwrap();
    let inferred = SearchSettings {
        timepoints: Some(12),
        interval: Some(4.0),
        replicates: Some(ReplicateSpec::Uniform(2)),
        ..Default::default()
    };
    let explicit = SearchSettings {
        null_model: Some(NullModelKind::Normal),
        ..Default::default()
    };

    let config = SearchSettings::layered(explicit, file, inferred).into_config().unwrap();
    assert_eq!(config.layout.total_observations(), 24);
    assert_eq!(config.null_model, NullModelKind::Normal);

    let engine = SearchEngine::new(config).unwrap();
    assert!(matches!(engine.null_model(), NullModel::Normal(_)));
    assert_eq!(engine.periods(), &[20.0, 24.0, 28.0]);

    let layout = engine.config().layout.clone();
    let mut rng = StdRng::seed_from_u64(11);
    let noise = Normal::new(0.0, 1.0).unwrap();
    let rows = vec![
        ("rhythmic", sampled_cosine(&layout, 24.0, 8.0, 2.0)),
        ("noise", (0..24).map(|_| noise.sample(&mut rng)).collect()),
        ("short", vec![0.0; 23]),
    ];

    let results = info_span!("batch", rows = rows.len()).in_scope(|| run_batch(&engine, rows));
    info!(rows = results.len(), "batch scored");
    let (id, rhythmic) = &results[0];
    assert_eq!(*id, "rhythmic");
    let rhythmic = rhythmic.as_ref().unwrap();
    assert_eq!(rhythmic.period, 24.0);
    assert_eq!(rhythmic.lag, 20.0);
    assert_eq!(rhythmic.score, engine.max_score());
    assert_eq!(rhythmic.ties, 1);
    assert!(rhythmic.is_significant(0.001));
    assert_eq!(rhythmic.per_period.len(), 3);

    assert!(results[1].1.is_ok());
    assert!(matches!(
        results[2].1,
        Err(Error::LengthMismatch { expected: 24, actual: 23 })
    ));
}

#[test]
fn test_exact_and_normal_models_agree_on_strong_signals() {
    init_tracing();

    let layout = TimepointLayout::uniform(12, 2, 4.0).unwrap();
    let series = sampled_cosine(&layout, 24.0, 4.0, 1.0);

    let run = |null_model| {
        let config = SearchConfig::new(layout.clone(), PeriodGrid::range(20.0, 28.0, 4.0))
            .with_density(4.0)
            .with_null_model(null_model);
        SearchEngine::new(config).unwrap().run(&series).unwrap()
    };
    let exact = run(NullModelKind::Exact);
    let normal = run(NullModelKind::Normal);

    assert_eq!(exact.period, normal.period);
    assert_eq!(exact.lag, normal.lag);
    assert_eq!(exact.score, normal.score);
    assert_eq!(exact.lag, 22.0);
    assert_relative_eq!(exact.tau, 1.0);
    assert!(exact.p_value < 1e-8);
    assert!(normal.p_value < 1e-8);
}

#[test]
fn test_stream_over_results_serializes() {
    init_tracing();

    let layout = TimepointLayout::uniform(8, 1, 3.0).unwrap();
    let engine = SearchEngine::new(
        SearchConfig::new(layout.clone(), vec![21.0, 24.0, 27.0])
            .with_density(3.0)
            .with_amplitude(AmplitudeMethod::InterquartileRange),
    )
    .unwrap();

    let rows = (0..4).map(|k| (k, sampled_cosine(&layout, 24.0, 3.0 * k as f64, 1.0)));
    for (k, result) in run_stream(&engine, rows) {
        let result = result.unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["score"], result.score);
        assert_eq!(json["per_period"].as_array().unwrap().len(), 3);
        assert!(result.amplitude > 0.0, "row {k}");
    }
}
