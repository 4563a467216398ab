//! OpenFace CSV loading: schema detection, labelling, filtering, imputation

use super::csv_input::{parse_records, CsvRecord, CsvSyntaxError};
use super::table::{Imputation, MeasurementRow, MeasurementTable};
use crate::config::AnalysisConfig;
use crate::emotion::{resolve_code, EmotionLabel};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Fatal problems with the input file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read input file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Input has no header row")]
    EmptyInput,

    #[error("Line {line}: unterminated quoted field")]
    UnterminatedQuote { line: usize },

    #[error("Line {line}: expected {expected} fields, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: column '{column}' has non-numeric value '{value}'")]
    InvalidValue {
        line: usize,
        column: String,
        value: String,
    },

    #[error("Identifier column '{column}' not found in input")]
    MissingIdentifierColumn { column: String },
}

/// Recoverable conditions noticed while loading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadDiagnostic {
    /// No identifier column: every row was labelled `unknown`
    MissingIdentifierColumn { column: String },
    /// No column matched the AU intensity naming (`AU..._r`)
    NoFeatureColumns,
    /// Rows whose identifier did not resolve to a known emotion
    UnknownLabels { count: usize },
    /// No happy or sad rows survived filtering
    EmptyComparisonSet,
}

impl std::fmt::Display for LoadDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadDiagnostic::MissingIdentifierColumn { column } => write!(
                f,
                "'{}' column not found; all rows labelled unknown",
                column
            ),
            LoadDiagnostic::NoFeatureColumns => write!(f, "no AU intensity (*_r) columns found"),
            LoadDiagnostic::UnknownLabels { count } => {
                write!(f, "{} rows have an unrecognised emotion code", count)
            }
            LoadDiagnostic::EmptyComparisonSet => {
                write!(f, "no happy or sad rows to compare")
            }
        }
    }
}

/// Everything the loader produces for one input file
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    /// All rows with their labels, before filtering
    pub full: MeasurementTable,
    /// Happy and sad rows only, with missing values imputed
    pub filtered: MeasurementTable,
    pub diagnostics: Vec<LoadDiagnostic>,
    pub imputations: Vec<Imputation>,
}

impl LoadedDataset {
    /// AU feature names, in input column order
    pub fn features(&self) -> &[String] {
        self.filtered.features()
    }
}

/// Whether a (trimmed) column name is a continuous AU intensity channel
///
/// `AU12_r` is an intensity, `AU12_c` a binary presence flag.
pub fn is_intensity_feature(column: &str) -> bool {
    column.contains("AU") && column.ends_with("_r")
}

fn is_missing_token(value: &str) -> bool {
    value.is_empty()
        || ["nan", "na", "n/a", "null"]
            .iter()
            .any(|token| value.eq_ignore_ascii_case(token))
}

fn parse_value(record: &CsvRecord, column: &str, raw: &str) -> Result<Option<f32>, LoadError> {
    let value = raw.trim();
    if is_missing_token(value) {
        return Ok(None);
    }
    value
        .parse::<f32>()
        .map(|v| if v.is_nan() { None } else { Some(v) })
        .map_err(|_| LoadError::InvalidValue {
            line: record.line,
            column: column.to_string(),
            value: value.to_string(),
        })
}

/// Load an OpenFace CSV file
pub fn load(path: &Path, config: &AnalysisConfig) -> Result<LoadedDataset, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&text, config)
}

/// Load OpenFace CSV content already in memory
pub fn load_from_str(text: &str, config: &AnalysisConfig) -> Result<LoadedDataset, LoadError> {
    // Spreadsheet exports often start with a UTF-8 byte order mark
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let records = parse_records(text).map_err(|e| match e {
        CsvSyntaxError::UnterminatedQuote { line } => LoadError::UnterminatedQuote { line },
    })?;

    let mut records = records.into_iter();
    let header = records.next().ok_or(LoadError::EmptyInput)?;
    let columns: Vec<String> = header.fields.iter().map(|c| c.trim().to_string()).collect();

    let feature_columns: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(_, name)| is_intensity_feature(name))
        .map(|(idx, _)| idx)
        .collect();
    let features: Vec<String> = feature_columns.iter().map(|&i| columns[i].clone()).collect();

    let mut diagnostics = Vec::new();

    if features.is_empty() {
        tracing::warn!("No AU intensity columns found in input");
        diagnostics.push(LoadDiagnostic::NoFeatureColumns);
    }

    let identifier_column = columns.iter().position(|c| c == &config.identifier_column);
    if identifier_column.is_none() {
        if config.require_identifier {
            return Err(LoadError::MissingIdentifierColumn {
                column: config.identifier_column.clone(),
            });
        }
        tracing::warn!(
            "'{}' column not found, labelling every row unknown",
            config.identifier_column
        );
        diagnostics.push(LoadDiagnostic::MissingIdentifierColumn {
            column: config.identifier_column.clone(),
        });
    }

    tracing::debug!("Found {} AU columns: {:?}", features.len(), features);

    let mut full = MeasurementTable::new(features);
    let mut unknown_codes = 0;

    for record in records {
        if record.fields.len() != columns.len() {
            return Err(LoadError::RaggedRow {
                line: record.line,
                expected: columns.len(),
                found: record.fields.len(),
            });
        }

        let identifier = identifier_column.map(|idx| record.fields[idx].trim().to_string());
        let label = match identifier.as_deref() {
            Some(id) => match resolve_code(id) {
                Ok(label) => label,
                Err(e) => {
                    tracing::debug!("{}", e);
                    unknown_codes += 1;
                    EmotionLabel::Unknown
                }
            },
            None => EmotionLabel::Unknown,
        };

        let values = feature_columns
            .iter()
            .map(|&idx| parse_value(&record, &columns[idx], &record.fields[idx]))
            .collect::<Result<Vec<_>, _>>()?;

        full.push(MeasurementRow {
            identifier,
            label,
            values,
        });
    }

    if unknown_codes > 0 {
        tracing::warn!("{} rows have an unrecognised emotion code", unknown_codes);
        diagnostics.push(LoadDiagnostic::UnknownLabels {
            count: unknown_codes,
        });
    }

    let mut filtered = full.filter_labels(|label| label.is_compared());
    if filtered.is_empty() {
        tracing::warn!("No happy or sad rows after filtering");
        diagnostics.push(LoadDiagnostic::EmptyComparisonSet);
    }

    let imputations = filtered.impute_column_means();
    for imputation in &imputations {
        match imputation {
            Imputation::Filled {
                feature,
                value,
                filled,
            } => tracing::debug!("Imputed {} missing {} values with {}", filled, feature, value),
            Imputation::Unfillable { feature, missing } if !filtered.is_empty() => {
                tracing::warn!("{} has no observed values; {} cells left missing", feature, missing)
            }
            _ => {}
        }
    }

    Ok(LoadedDataset {
        full,
        filtered,
        diagnostics,
        imputations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPENFACE_SAMPLE: &str = "\
frame, face_id, AU01_r, AU06_r, AU12_r, AU12_c,filename
1, 0, 0.10, 1.20, 2.40, 1,KA.HA1.29.jpg
2, 0, 0.20, , 2.60, 1,KA.HA2.30.jpg
3, 0, 0.90, 0.10, 0.30, 0,KA.SA1.33.jpg
4, 0, 1.10, 0.30, NaN, 0,KA.SA2.34.jpg
5, 0, 5.00, 5.00, 5.00, 0,KA.NE1.26.jpg
6, 0, 4.00, 4.00, 4.00, 0,KA.XX1.40.jpg
";

    fn load_sample() -> LoadedDataset {
        load_from_str(OPENFACE_SAMPLE, &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn test_feature_detection_trims_and_excludes_presence() {
        let dataset = load_sample();
        assert_eq!(dataset.features(), &["AU01_r", "AU06_r", "AU12_r"]);
    }

    #[test]
    fn test_is_intensity_feature() {
        assert!(is_intensity_feature("AU45_r"));
        assert!(!is_intensity_feature("AU45_c"));
        assert!(!is_intensity_feature("confidence_r"));
        assert!(!is_intensity_feature("AU45_r_extra"));
    }

    #[test]
    fn test_labels_attached_and_filtered() {
        let dataset = load_sample();
        assert_eq!(dataset.full.len(), 6);
        assert_eq!(dataset.filtered.len(), 4);
        assert!(dataset.filtered.rows().iter().all(|r| r.label.is_compared()));
        assert_eq!(
            dataset.filtered.rows()[0].identifier.as_deref(),
            Some("KA.HA1.29.jpg")
        );
        assert!(dataset
            .diagnostics
            .contains(&LoadDiagnostic::UnknownLabels { count: 1 }));
    }

    #[test]
    fn test_imputation_uses_filtered_mean() {
        let dataset = load_sample();
        let au06 = dataset.filtered.feature_index("AU06_r").unwrap();
        // Observed happy/sad AU06_r: 1.2, 0.1, 0.3 -> 0.5333..
        let imputed = dataset.filtered.rows()[1].values[au06].unwrap();
        assert!((imputed - 1.6 / 3.0).abs() < 1e-5);

        let au12 = dataset.filtered.feature_index("AU12_r").unwrap();
        let imputed = dataset.filtered.rows()[3].values[au12].unwrap();
        assert!((imputed - 5.3 / 3.0).abs() < 1e-5);

        for idx in 0..dataset.features().len() {
            assert_eq!(dataset.filtered.missing_count(idx), 0);
        }
    }

    #[test]
    fn test_full_table_keeps_missing_values() {
        let dataset = load_sample();
        let au06 = dataset.full.feature_index("AU06_r").unwrap();
        assert_eq!(dataset.full.rows()[1].values[au06], None);
    }

    #[test]
    fn test_missing_identifier_column_degrades() {
        let text = "frame, AU12_r\n1, 0.5\n2, 0.7\n";
        let dataset = load_from_str(text, &AnalysisConfig::default()).unwrap();
        assert_eq!(dataset.full.len(), 2);
        assert!(dataset.full.rows().iter().all(|r| r.label == EmotionLabel::Unknown));
        assert!(dataset.filtered.is_empty());
        assert!(dataset
            .diagnostics
            .contains(&LoadDiagnostic::MissingIdentifierColumn {
                column: "filename".into()
            }));
        assert!(dataset.diagnostics.contains(&LoadDiagnostic::EmptyComparisonSet));
    }

    #[test]
    fn test_missing_identifier_column_fatal_when_required() {
        let config = AnalysisConfig {
            require_identifier: true,
            ..AnalysisConfig::default()
        };
        let err = load_from_str("frame, AU12_r\n1, 0.5\n", &config).unwrap_err();
        assert!(matches!(err, LoadError::MissingIdentifierColumn { .. }));
        assert!(err.to_string().contains("filename"));
    }

    #[test]
    fn test_no_feature_columns() {
        let dataset =
            load_from_str("filename,frame\nKA.HA1.1.jpg,1\n", &AnalysisConfig::default()).unwrap();
        assert!(dataset.features().is_empty());
        assert_eq!(dataset.filtered.len(), 1);
        assert!(dataset.diagnostics.contains(&LoadDiagnostic::NoFeatureColumns));
    }

    #[test]
    fn test_all_missing_column_stays_missing() {
        let text = "filename,AU01_r,AU02_r\nA.HA1.1,,1\nA.SA1.2,NA,2\nA.NE1.3,4,3\n";
        let dataset = load_from_str(text, &AnalysisConfig::default()).unwrap();
        assert!(dataset.filtered.rows().iter().all(|r| r.values[0].is_none()));
        assert_eq!(dataset.filtered.missing_count(0), 2);
        assert!(matches!(
            dataset.imputations[0],
            Imputation::Unfillable { missing: 2, .. }
        ));
    }

    #[test]
    fn test_empty_input_is_fatal() {
        assert!(matches!(
            load_from_str("", &AnalysisConfig::default()),
            Err(LoadError::EmptyInput)
        ));
    }

    #[test]
    fn test_ragged_row_is_fatal() {
        let err = load_from_str("filename,AU01_r\nA.HA1.1,1,2\n", &AnalysisConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::RaggedRow {
                line: 2,
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn test_non_numeric_value_is_fatal() {
        let err = load_from_str("filename,AU01_r\nA.HA1.1,high\n", &AnalysisConfig::default())
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("AU01_r"));
        assert!(message.contains("high"));
    }

    #[test]
    fn test_custom_identifier_column() {
        let config = AnalysisConfig {
            identifier_column: "image".into(),
            ..AnalysisConfig::default()
        };
        let dataset = load_from_str("image,AU01_r\nA.SA1.1,1\n", &config).unwrap();
        assert_eq!(dataset.filtered.rows()[0].label, EmotionLabel::Sad);
    }

    #[test]
    fn test_byte_order_mark_before_identifier_column() {
        let csv = "\u{feff}filename,AU12_r\nA.HA1.png,2.0\nB.SA1.png,0.5\n";
        let dataset = load_from_str(csv, &AnalysisConfig::default()).unwrap();
        assert!(dataset.diagnostics.is_empty(), "{:?}", dataset.diagnostics);
        assert_eq!(dataset.filtered.len(), 2);
        assert_eq!(dataset.filtered.rows()[0].label, EmotionLabel::Happy);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("/nonexistent/openface.csv"), &AnalysisConfig::default())
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/openface.csv"));
    }
}
