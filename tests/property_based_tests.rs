//! Property-based tests for label resolution and the statistics engine

use auscope::config::AnalysisConfig;
use auscope::dataset::{MeasurementRow, MeasurementTable};
use auscope::emotion::{resolve, resolve_code, EmotionLabel, EMOTION_CODES};
use auscope::statistics::summarize;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_resolve_never_panics(identifier in "\\PC*") {
        let label = resolve(&identifier);
        prop_assert_eq!(label == EmotionLabel::Unknown, resolve_code(&identifier).is_err());
    }

    #[test]
    fn prop_known_codes_resolve(
        subject in "[A-Za-z0-9]{1,6}",
        code_idx in 0usize..EMOTION_CODES.len(),
        take in 1u32..9,
        rest in "(\\.[a-z0-9]{1,5}){0,3}",
    ) {
        let (code, expected) = EMOTION_CODES[code_idx];
        let identifier = format!("{}.{}{}{}", subject, code, take, rest);
        prop_assert_eq!(resolve(&identifier), expected);
    }

    #[test]
    fn prop_significance_flag_matches_threshold(
        happy in prop::collection::vec(0.0f32..5.0, 2..20),
        sad in prop::collection::vec(0.0f32..5.0, 2..20),
    ) {
        let mut table = MeasurementTable::new(vec!["AU12_r".to_string()]);
        for (label, values) in [(EmotionLabel::Happy, &happy), (EmotionLabel::Sad, &sad)] {
            for &v in values {
                table.push(MeasurementRow { identifier: None, label, values: vec![Some(v)] });
            }
        }

        let (summary, tests) = summarize(&table, &AnalysisConfig::default());
        prop_assert_eq!(summary.len(), 2);
        prop_assert!(tests.len() <= 1);
        for record in &tests.records {
            prop_assert_eq!(record.significant, record.p_value < 0.05);
        }
    }
}
