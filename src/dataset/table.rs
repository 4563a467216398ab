//! Typed measurement table
//!
//! The schema (feature names) is fixed when the table is built; every row holds
//! exactly one optional value per feature, in feature order.

use crate::emotion::EmotionLabel;
use serde::Serialize;

/// One measured sample
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRow {
    /// Sample identifier, absent when the input had no identifier column
    pub identifier: Option<String>,
    pub label: EmotionLabel,
    /// AU intensities aligned with [`MeasurementTable::features`]; `None` is missing
    pub values: Vec<Option<f32>>,
}

/// Ordered collection of rows sharing one feature set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementTable {
    features: Vec<String>,
    rows: Vec<MeasurementRow>,
}

/// Result of mean-imputing one feature column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Imputation {
    /// Nothing was missing
    Complete { feature: String },
    /// `filled` missing cells were replaced with `value`
    Filled {
        feature: String,
        value: f32,
        filled: usize,
    },
    /// The column had no observed values, so its cells stay missing
    Unfillable { feature: String, missing: usize },
}

impl Imputation {
    pub fn feature(&self) -> &str {
        match self {
            Imputation::Complete { feature }
            | Imputation::Filled { feature, .. }
            | Imputation::Unfillable { feature, .. } => feature,
        }
    }
}

impl MeasurementTable {
    /// Create an empty table with the given schema
    pub fn new(features: Vec<String>) -> Self {
        Self {
            features,
            rows: Vec::new(),
        }
    }

    /// Append a row; panics if its width does not match the schema
    ///
    /// Rows are only built by the loader, which sizes them from the schema.
    pub fn push(&mut self, row: MeasurementRow) {
        assert_eq!(
            row.values.len(),
            self.features.len(),
            "row width must match the feature schema"
        );
        self.rows.push(row);
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn rows(&self) -> &[MeasurementRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a feature in the schema
    pub fn feature_index(&self, feature: &str) -> Option<usize> {
        self.features.iter().position(|f| f == feature)
    }

    /// Observed (non-missing) values of one feature for one label
    pub fn group_values(&self, label: EmotionLabel, feature_idx: usize) -> Vec<f32> {
        self.rows
            .iter()
            .filter(|row| row.label == label)
            .filter_map(|row| row.values[feature_idx])
            .filter(|v| !v.is_nan())
            .collect()
    }

    /// Observed values of one feature across all rows
    pub fn column_values(&self, feature_idx: usize) -> Vec<f32> {
        self.rows
            .iter()
            .filter_map(|row| row.values[feature_idx])
            .filter(|v| !v.is_nan())
            .collect()
    }

    /// Number of missing cells in one feature column
    pub fn missing_count(&self, feature_idx: usize) -> usize {
        self.rows
            .iter()
            .filter(|row| row.values[feature_idx].map_or(true, f32::is_nan))
            .count()
    }

    /// Labels present in the table, in grouping (alphabetical) order
    pub fn labels(&self) -> Vec<EmotionLabel> {
        let mut labels: Vec<EmotionLabel> = self.rows.iter().map(|row| row.label).collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    /// Row count per label, most frequent first (ties in grouping order)
    pub fn label_counts(&self) -> Vec<(EmotionLabel, usize)> {
        let mut counts: Vec<(EmotionLabel, usize)> = self
            .labels()
            .into_iter()
            .map(|label| {
                let n = self.rows.iter().filter(|row| row.label == label).count();
                (label, n)
            })
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        counts
    }

    /// Copy of the table restricted to rows whose label satisfies `keep`
    pub fn filter_labels<F>(&self, keep: F) -> MeasurementTable
    where
        F: Fn(EmotionLabel) -> bool,
    {
        MeasurementTable {
            features: self.features.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| keep(row.label))
                .cloned()
                .collect(),
        }
    }

    /// Replace missing cells with the column mean, independently per feature
    ///
    /// A column without any observed value keeps its missing cells.
    pub fn impute_column_means(&mut self) -> Vec<Imputation> {
        let mut outcomes = Vec::with_capacity(self.features.len());

        for idx in 0..self.features.len() {
            let feature = self.features[idx].clone();
            let missing = self.missing_count(idx);

            if missing == 0 {
                outcomes.push(Imputation::Complete { feature });
                continue;
            }

            let observed = self.column_values(idx);
            let Some(value) = crate::statistics::mean(&observed) else {
                outcomes.push(Imputation::Unfillable { feature, missing });
                continue;
            };

            for row in &mut self.rows {
                if row.values[idx].map_or(true, f32::is_nan) {
                    row.values[idx] = Some(value);
                }
            }

            outcomes.push(Imputation::Filled {
                feature,
                value,
                filled: missing,
            });
        }

        outcomes
    }
}
