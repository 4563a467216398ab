//! Integration tests for `auscope findings`

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn run_analysis(out: &Path) {
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/openface_sample.csv");
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("auscope");
    cmd.arg("analyze")
        .arg("--input")
        .arg(fixture)
        .arg("--out")
        .arg(out)
        .arg("--skip-plots")
        .assert()
        .success();
}

#[test]
fn test_findings_after_analysis() {
    let dir = TempDir::new().unwrap();
    run_analysis(dir.path());

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("auscope");
    cmd.arg("findings")
        .arg("--out")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Key Findings: Happy vs Sad ==="))
        .stdout(predicate::str::contains("AUs tested: 5"))
        .stdout(predicate::str::contains("AU12_r Lip Corner Puller"))
        .stdout(predicate::str::contains("AU04_r Brow Lowerer"));
}

#[test]
fn test_findings_json() {
    let dir = TempDir::new().unwrap();
    run_analysis(dir.path());

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("auscope");
    let output = cmd
        .arg("findings")
        .arg("--out")
        .arg(dir.path())
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let findings = parsed["findings"].as_array().unwrap();
    let features: Vec<&str> = findings
        .iter()
        .map(|f| f["feature"].as_str().unwrap())
        .collect();
    assert_eq!(features, vec!["AU06_r", "AU12_r", "AU15_r", "AU04_r"]);
    assert!(findings[1]["happy_mean"].as_f64().unwrap() > findings[1]["sad_mean"].as_f64().unwrap());
    assert_eq!(findings[1]["significant"], true);
}

#[test]
fn test_findings_defaults_for_absent_features() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("au_summary_by_emotion_real.csv"),
        "emotion_label,au,mean,std,count\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("au_ttests_real.csv"),
        "AU,group_a,group_b,t_statistic,p_value,significant,df\n",
    )
    .unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("auscope");
    cmd.arg("findings")
        .arg("--out")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("happy: 0.000  sad: 0.000"))
        .stdout(predicate::str::contains("p = 1.0000 (p < 0.05)"));
}

#[test]
fn test_findings_without_artifacts_fails() {
    let dir = TempDir::new().unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("auscope");
    cmd.arg("findings")
        .arg("--out")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read results"));
}
