use std::fs;
use std::path::{Path, PathBuf};

use hsqc_ssp::data::load_peaks;
use hsqc_ssp::data::loader::PeakSourceOptions;
use hsqc_ssp::report::{matches_reference, UBIQUITIN_REFERENCE};
use hsqc_ssp::{
    load_model, CompositionResult, PairingMode, Peak, PipelineConfig, PredictionPipeline,
    SspError,
};
use tempfile::{tempdir, TempDir};

/// One split on feature 124: cell (15N row 12, 1H column 4) of the 20x10 grid,
/// i.e. a peak near 8.2 / 120 ppm.
const TOY_MODEL: &str = r#"{
    "features_info": {"float_features": [
        {"feature_index": 0, "flat_feature_index": 124, "borders": [0.5]}
    ]},
    "oblivious_trees": [{
        "leaf_values": [0.6, 0.3, 0.1,  0.2, 0.3, 0.5],
        "splits": [{"border": 0.5, "float_feature_index": 0, "split_index": 0, "split_type": "FloatFeature"}]
    }],
    "scale_and_bias": [1, [0.0, 0.0, 0.0]]
}"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn csv_peaks_through_toy_model() {
    let dir = tempdir().unwrap();
    let model = load_model(&write(&dir, "model.json", TOY_MODEL)).unwrap();
    let peaks_path = write(
        &dir,
        "peaks.csv",
        "X_shift,Y_shift\n8.21,120.4\n7.90,110.2\n12.5,118.0\n",
    );

    let peaks = load_peaks(&peaks_path, &PeakSourceOptions::default(), 0.0).unwrap();
    assert_eq!(peaks.len(), 3);

    let pipeline = PredictionPipeline::new(&model, PipelineConfig::default());
    let result = pipeline.run(&peaks).unwrap();
    assert_eq!(result, CompositionResult { coil: 0.2, sheet: 0.3, helix: 0.5 });

    let pct = result.percentages();
    assert_eq!(format!("{:.1}", pct.helix), "50.0");
}

#[test]
fn intensity_filter_removes_the_only_informative_peak() {
    let dir = tempdir().unwrap();
    let model = load_model(&write(&dir, "model.json", TOY_MODEL)).unwrap();
    let peaks_path = write(
        &dir,
        "peaks.json",
        r#"[{"intensity": -5.0e5, "position": [8.21, 120.4]},
            {"intensity":  1.0e6, "position": [7.90, 110.2]}]"#,
    );

    let peaks = load_peaks(&peaks_path, &PeakSourceOptions::default(), 0.0).unwrap();
    assert_eq!(peaks, vec![Peak::new(7.90, 110.2)]);

    let result = PredictionPipeline::new(&model, PipelineConfig::default())
        .run(&peaks)
        .unwrap();
    assert_eq!(result, CompositionResult { coil: 0.6, sheet: 0.3, helix: 0.1 });
}

#[test]
fn nothing_left_after_filtering_is_empty_input() {
    let dir = tempdir().unwrap();
    let model = load_model(&write(&dir, "model.json", TOY_MODEL)).unwrap();
    let peaks_path = write(&dir, "peaks.json", r#"[{"intensity": -1.0, "position": [8.2, 120.0]}]"#);

    let peaks = load_peaks(&peaks_path, &PeakSourceOptions::default(), 0.0).unwrap();
    let err = PredictionPipeline::new(&model, PipelineConfig::default())
        .run(&peaks)
        .unwrap_err();
    assert!(matches!(err, SspError::EmptyInput));
}

#[test]
fn pairing_mode_changes_result_only_when_a_peak_is_half_dropped() {
    let dir = tempdir().unwrap();
    let model = load_model(&write(&dir, "model.json", TOY_MODEL)).unwrap();

    // The first peak is out of 1H range; zipping survivors by position pairs
    // 8.21 ppm 1H with 125.3 ppm 15N, which misses cell 124.
    let peaks = [
        Peak::new(5.5, 120.4),
        Peak::new(8.21, 125.3),
    ];
    let joint = PredictionPipeline::new(&model, PipelineConfig { pairing: PairingMode::Joint })
        .run(&peaks)
        .unwrap();
    let positional =
        PredictionPipeline::new(&model, PipelineConfig { pairing: PairingMode::Positional })
            .run(&peaks)
            .unwrap();
    assert_eq!(joint, CompositionResult { coil: 0.6, sheet: 0.3, helix: 0.1 });
    assert_eq!(positional, CompositionResult { coil: 0.2, sheet: 0.3, helix: 0.5 });
}

#[test]
fn model_is_reused_across_samples() {
    let dir = tempdir().unwrap();
    let model = load_model(&write(&dir, "model.json", TOY_MODEL)).unwrap();
    let pipeline = PredictionPipeline::new(&model, PipelineConfig::default());

    let a = [Peak::new(8.21, 120.4)];
    let b = [Peak::new(9.0, 100.0)];
    let first = pipeline.run(&a).unwrap();
    let _ = pipeline.run(&b).unwrap();
    assert_eq!(pipeline.run(&a).unwrap(), first);
}

#[test]
fn bad_model_files_fail_to_load() {
    let dir = tempdir().unwrap();
    let truncated = write(&dir, "model.json", r#"{"oblivious_trees": ["#);
    assert!(matches!(load_model(&truncated), Err(SspError::ModelLoad { .. })));

    let binary = write(&dir, "Model.cbm", "CBM1");
    assert!(matches!(load_model(&binary), Err(SspError::ModelLoad { .. })));

    assert!(matches!(
        load_model(Path::new("/does/not/exist.json")),
        Err(SspError::ModelLoad { .. })
    ));
}

/// Ubiquitin (BMRB 5387) against the shipped model.
///
/// Needs `SSP_MODEL` and `SSP_REFERENCE_PEAKS` pointing at the model export and
/// the reference peak list; run with `cargo test -- --ignored`.
#[test]
#[ignore = "needs SSP_MODEL and SSP_REFERENCE_PEAKS"]
fn ubiquitin_reference_prediction() {
    let model_path = std::env::var("SSP_MODEL").expect("SSP_MODEL not set");
    let peaks_path = std::env::var("SSP_REFERENCE_PEAKS").expect("SSP_REFERENCE_PEAKS not set");

    let model = load_model(Path::new(&model_path)).unwrap();
    let peaks =
        load_peaks(Path::new(&peaks_path), &PeakSourceOptions::default(), 0.0).unwrap();
    let result = PredictionPipeline::new(&model, PipelineConfig::default())
        .run(&peaks)
        .unwrap();

    let pct = result.percentages();
    assert!(
        matches_reference(&result, UBIQUITIN_REFERENCE),
        "helix {} / sheet {} / coil {}",
        pct.helix,
        pct.sheet,
        pct.coil
    );
}
