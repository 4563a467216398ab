// Group statistics engine: per-emotion summaries and happy-vs-sad tests
//
// Output ordering is part of the contract:
// - summary rows: labels in grouping order, then features in table order
// - significance rows: features in table order

use crate::config::{AnalysisConfig, SIGNIFICANCE_LEVEL};
use crate::dataset::MeasurementTable;
use crate::emotion::{EmotionLabel, COMPARISON_GROUPS};
use crate::statistics::descriptive::describe;
use crate::statistics::significance::two_sample_t_test;
use serde::{Deserialize, Serialize};

/// Descriptive statistics for one (emotion, feature) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub label: EmotionLabel,
    pub feature: String,
    pub mean: f32,
    /// Population standard deviation
    pub std: f32,
    /// Non-missing observations
    pub count: usize,
}

/// Ordered group summaries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupSummaryTable {
    pub records: Vec<GroupSummary>,
}

impl GroupSummaryTable {
    pub fn get(&self, label: EmotionLabel, feature: &str) -> Option<&GroupSummary> {
        self.records
            .iter()
            .find(|r| r.label == label && r.feature == feature)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Outcome of comparing happy and sad for one feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificanceRecord {
    pub feature: String,
    pub group_a: EmotionLabel,
    pub group_b: EmotionLabel,
    pub statistic: f64,
    pub p_value: f64,
    pub df: f64,
    /// `p_value < 0.05`
    pub significant: bool,
}

impl SignificanceRecord {
    pub fn new(
        feature: String,
        group_a: EmotionLabel,
        group_b: EmotionLabel,
        statistic: f64,
        p_value: f64,
        df: f64,
    ) -> Self {
        Self {
            feature,
            group_a,
            group_b,
            statistic,
            p_value,
            df,
            significant: p_value < SIGNIFICANCE_LEVEL,
        }
    }
}

/// Why a feature has no significance record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Exclusion {
    /// At least one group is constant (or unobserved) for this feature
    ZeroVariance { feature: String },
    /// The test itself could not be computed
    TestFailed { feature: String, reason: String },
}

/// Ordered significance records plus the features that were skipped
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignificanceTable {
    pub records: Vec<SignificanceRecord>,
    /// Not serialized to the tests artifact; kept for diagnostics
    #[serde(skip)]
    pub excluded: Vec<Exclusion>,
}

impl SignificanceTable {
    pub fn get(&self, feature: &str) -> Option<&SignificanceRecord> {
        self.records.iter().find(|r| r.feature == feature)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn significant_count(&self) -> usize {
        self.records.iter().filter(|r| r.significant).count()
    }

    /// Up to `n` records with the smallest p-values (stable for ties)
    pub fn top(&self, n: usize) -> Vec<&SignificanceRecord> {
        let mut sorted: Vec<&SignificanceRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| a.p_value.total_cmp(&b.p_value));
        sorted.truncate(n);
        sorted
    }
}

/// Per-group descriptive statistics for every label present in the table
pub fn group_summaries(table: &MeasurementTable) -> GroupSummaryTable {
    let mut records = Vec::new();

    for label in table.labels() {
        for (idx, feature) in table.features().iter().enumerate() {
            let d = describe(&table.group_values(label, idx));
            records.push(GroupSummary {
                label,
                feature: feature.clone(),
                mean: d.mean,
                std: d.std,
                count: d.count,
            });
        }
    }

    GroupSummaryTable { records }
}

/// Happy-vs-sad t-test for every feature where both groups vary
pub fn significance_tests(table: &MeasurementTable, config: &AnalysisConfig) -> SignificanceTable {
    let [group_a, group_b] = COMPARISON_GROUPS;
    let mut result = SignificanceTable::default();

    for (idx, feature) in table.features().iter().enumerate() {
        let a = table.group_values(group_a, idx);
        let b = table.group_values(group_b, idx);

        let (da, db) = (describe(&a), describe(&b));
        // NaN (no observations) fails this check as well
        if !(da.std > 0.0 && db.std > 0.0) {
            tracing::debug!("Skipping {}: zero variance in at least one group", feature);
            result.excluded.push(Exclusion::ZeroVariance {
                feature: feature.clone(),
            });
            continue;
        }

        match two_sample_t_test(&a, &b, config.equal_variance) {
            Ok(outcome) => result.records.push(SignificanceRecord::new(
                feature.clone(),
                group_a,
                group_b,
                outcome.statistic,
                outcome.p_value,
                outcome.df,
            )),
            Err(e) => {
                tracing::warn!("Failed to compare groups for {}: {}", feature, e);
                result.excluded.push(Exclusion::TestFailed {
                    feature: feature.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    result
}

/// Compute the group summary and significance tables for a measurement table
///
/// # Example
/// ```
/// use auscope::config::AnalysisConfig;
/// use auscope::dataset::load_from_str;
/// use auscope::statistics::summarize;
///
/// let csv = "filename,AU12_r\nA.HA1.1,2.4\nA.HA2.2,2.7\nA.SA1.3,0.3\nA.SA2.4,0.5\n";
/// let config = AnalysisConfig::default();
/// let dataset = load_from_str(csv, &config).unwrap();
/// let (summary, tests) = summarize(&dataset.filtered, &config);
/// assert_eq!(summary.len(), 2);
/// assert_eq!(tests.len(), 1);
/// ```
pub fn summarize(
    table: &MeasurementTable,
    config: &AnalysisConfig,
) -> (GroupSummaryTable, SignificanceTable) {
    (group_summaries(table), significance_tests(table, config))
}
