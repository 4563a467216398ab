//! Library-level invariants of loading and summarizing

use auscope::config::AnalysisConfig;
use auscope::dataset::{load, load_from_str, Imputation, LoadDiagnostic};
use auscope::emotion::EmotionLabel;
use auscope::report::{format_summary, read_summary, write_summary};
use auscope::statistics::summarize;
use std::path::Path;
use tempfile::TempDir;

fn fixture() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/openface_sample.csv")
}

#[test]
fn test_filtered_table_only_holds_compared_groups() {
    let dataset = load(&fixture(), &AnalysisConfig::default()).unwrap();

    assert_eq!(dataset.full.len(), 12);
    assert_eq!(
        dataset.full.labels(),
        vec![
            EmotionLabel::Happy,
            EmotionLabel::Neutral,
            EmotionLabel::Sad,
            EmotionLabel::Unknown
        ]
    );
    assert_eq!(
        dataset.filtered.labels(),
        vec![EmotionLabel::Happy, EmotionLabel::Sad]
    );
    assert!(dataset.filtered.rows().iter().all(|row| row.label.is_compared()));
}

#[test]
fn test_no_missing_values_after_imputation() {
    let dataset = load(&fixture(), &AnalysisConfig::default()).unwrap();

    for idx in 0..dataset.features().len() {
        assert_eq!(dataset.filtered.missing_count(idx), 0);
    }
    let filled: Vec<&str> = dataset
        .imputations
        .iter()
        .filter(|i| matches!(i, Imputation::Filled { .. }))
        .map(Imputation::feature)
        .collect();
    assert_eq!(filled, vec!["AU15_r"]);
}

#[test]
fn test_imputed_value_is_observed_mean() {
    let csv = "filename,AU12_r\nA.HA1.png,1.0\nB.HA2.png,\nC.SA1.png,3.0\nD.SA2.png,2.0\n";
    let dataset = load_from_str(csv, &AnalysisConfig::default()).unwrap();
    match &dataset.imputations[0] {
        Imputation::Filled { value, filled, .. } => {
            assert!((value - 2.0).abs() < 1e-6);
            assert_eq!(*filled, 1);
        }
        other => panic!("expected fill, got {:?}", other),
    }
    // Imputation preserves the column mean
    let values = dataset.filtered.column_values(0);
    let mean = values.iter().sum::<f32>() / values.len() as f32;
    assert!((mean - 2.0).abs() < 1e-6);
}

#[test]
fn test_unknown_codes_reported() {
    let dataset = load(&fixture(), &AnalysisConfig::default()).unwrap();
    assert!(dataset
        .diagnostics
        .contains(&LoadDiagnostic::UnknownLabels { count: 1 }));
}

#[test]
fn test_significance_flag_matches_p_value() {
    let config = AnalysisConfig::default();
    let dataset = load(&fixture(), &config).unwrap();
    let (_, tests) = summarize(&dataset.filtered, &config);

    assert!(!tests.is_empty());
    for record in &tests.records {
        assert_eq!(record.significant, record.p_value < 0.05);
        assert!((0.0..=1.0).contains(&record.p_value));
    }
}

#[test]
fn test_summary_round_trips_at_four_decimals() {
    let config = AnalysisConfig::default();
    let dataset = load(&fixture(), &config).unwrap();
    let (summary, _) = summarize(&dataset.filtered, &config);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("summary.csv");
    write_summary(&summary, &path).unwrap();
    let restored = read_summary(&path).unwrap();

    assert_eq!(restored.len(), summary.len());
    for (before, after) in summary.records.iter().zip(&restored.records) {
        assert_eq!(before.label, after.label);
        assert_eq!(before.feature, after.feature);
        assert_eq!(before.count, after.count);
        assert!((before.mean - after.mean).abs() <= 5e-5);
        assert!((before.std - after.std).abs() <= 5e-5);
    }
    assert_eq!(format_summary(&restored), format_summary(&summary));
}

#[test]
fn test_moderate_difference_is_not_flagged() {
    let csv = "\
filename,AU12_r
A.HA1.png,1.5
B.HA2.png,2.0
C.HA3.png,2.5
D.HA4.png,1.5
E.HA5.png,2.5
F.SA1.png,1.0
G.SA2.png,1.5
H.SA3.png,2.0
I.SA4.png,1.0
J.SA5.png,2.0
";
    let config = AnalysisConfig::default();
    let dataset = load_from_str(csv, &config).unwrap();
    let (_, tests) = summarize(&dataset.filtered, &config);

    let record = tests.get("AU12_r").unwrap();
    assert!((record.statistic - 1.5811).abs() < 1e-3);
    assert!((record.p_value - 0.15250).abs() < 1e-4, "p = {}", record.p_value);
    assert!(!record.significant);
}
