use std::fs;
use std::process::Command;

use tempfile::tempdir;

/// Every peak lands on the leftmost leaf: 30 / 30 / 40 %, far from ubiquitin.
const FLAT_MODEL: &str = r#"{
    "oblivious_trees": [{"leaf_values": [0.3, 0.3, 0.4], "splits": []}],
    "scale_and_bias": [1, [0.0, 0.0, 0.0]]
}"#;

#[test]
fn selftest_mismatch_exits_with_error() {
    let dir = tempdir().unwrap();
    let model = dir.path().join("model.json");
    let peaks = dir.path().join("peaks.csv");
    fs::write(&model, FLAT_MODEL).unwrap();
    fs::write(&peaks, "X_shift,Y_shift\n8.21,120.4\n7.90,110.2\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_hsqc-ssp"))
        .arg("--model")
        .arg(&model)
        .arg("selftest")
        .arg("--peaks")
        .arg(&peaks)
        .env_remove("SSP_MODEL")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("PREDICTION TEST FAILED"), "{stdout}");
    assert!(stderr.contains("different model"), "{stderr}");
}
