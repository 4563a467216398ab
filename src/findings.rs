//! Key findings extracted from a finished run's artifacts
//!
//! This is what the slide generator consumes: happy and sad means plus the
//! t-test p-value for a handful of headline AUs. Values missing from the
//! artifacts fall back to a mean of 0.0 and a p-value of 1.0.

use crate::emotion::EmotionLabel;
use crate::report::{read_summary, read_tests, ReportError, SUMMARY_FILE, TESTS_FILE};
use crate::statistics::{GroupSummaryTable, SignificanceTable};
use serde::Serialize;
use std::path::Path;

/// Headline AUs: cheek raiser, lip corner puller, lip corner depressor, brow lowerer
pub const HEADLINE_FEATURES: [&str; 4] = ["AU06_r", "AU12_r", "AU15_r", "AU04_r"];

/// Human-readable names of the headline AUs
pub fn au_description(feature: &str) -> Option<&'static str> {
    match feature {
        "AU01_r" => Some("Inner Brow Raiser"),
        "AU04_r" => Some("Brow Lowerer"),
        "AU06_r" => Some("Cheek Raiser"),
        "AU12_r" => Some("Lip Corner Puller"),
        "AU15_r" => Some("Lip Corner Depressor"),
        _ => None,
    }
}

/// Two-decimal scientific notation with a signed, zero-padded exponent (`1.23e-04`)
fn scientific(value: f64) -> String {
    let formatted = format!("{:.2e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => format!(
                "{}e{}{:02}",
                mantissa,
                if exp < 0 { '-' } else { '+' },
                exp.abs()
            ),
            Err(_) => formatted,
        },
        None => formatted,
    }
}

/// Format a p-value with its significance bracket
///
/// # Example
/// ```
/// use auscope::findings::format_p_value;
///
/// assert_eq!(format_p_value(0.0001234), "1.23e-04 (p < 0.001)");
/// assert_eq!(format_p_value(0.005), "0.0050 (p < 0.01)");
/// assert_eq!(format_p_value(0.2), "0.2000 (p < 0.05)");
/// ```
pub fn format_p_value(p_value: f64) -> String {
    if p_value < 0.001 {
        format!("{} (p < 0.001)", scientific(p_value))
    } else if p_value < 0.01 {
        format!("{:.4} (p < 0.01)", p_value)
    } else {
        format!("{:.4} (p < 0.05)", p_value)
    }
}

/// Happy/sad comparison for one headline AU
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyFinding {
    pub feature: String,
    pub happy_mean: f32,
    pub sad_mean: f32,
    pub p_value: f64,
    pub significant: bool,
}

/// Headline results of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyFindings {
    pub findings: Vec<KeyFinding>,
    /// Total AUs tested and how many were significant
    pub tested: usize,
    pub significant: usize,
}

impl KeyFindings {
    /// Extract findings for `features` from in-memory tables
    pub fn from_tables(
        summary: &GroupSummaryTable,
        tests: &SignificanceTable,
        features: &[&str],
    ) -> Self {
        let mean_of = |label: EmotionLabel, feature: &str| {
            summary
                .get(label, feature)
                .map(|r| r.mean)
                .filter(|m| !m.is_nan())
                .unwrap_or(0.0)
        };

        let findings = features
            .iter()
            .map(|&feature| {
                let test = tests.get(feature);
                KeyFinding {
                    feature: feature.to_string(),
                    happy_mean: mean_of(EmotionLabel::Happy, feature),
                    sad_mean: mean_of(EmotionLabel::Sad, feature),
                    p_value: test.map(|t| t.p_value).unwrap_or(1.0),
                    significant: test.is_some_and(|t| t.significant),
                }
            })
            .collect();

        Self {
            findings,
            tested: tests.len(),
            significant: tests.significant_count(),
        }
    }

    /// Read the summary and test artifacts from `out_dir`
    pub fn from_artifacts(out_dir: &Path) -> Result<Self, ReportError> {
        let summary = read_summary(&out_dir.join(SUMMARY_FILE))?;
        let tests = read_tests(&out_dir.join(TESTS_FILE))?;
        Ok(Self::from_tables(&summary, &tests, &HEADLINE_FEATURES))
    }

    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Key Findings: Happy vs Sad ===\n\n");
        report.push_str(&format!(
            "AUs tested: {} ({} significant at p < 0.05)\n\n",
            self.tested, self.significant
        ));

        for finding in &self.findings {
            let name = au_description(&finding.feature).unwrap_or("");
            report.push_str(&format!("{} {}\n", finding.feature, name));
            report.push_str(&format!(
                "  happy: {:.3}  sad: {:.3}\n",
                finding.happy_mean, finding.sad_mean
            ));
            report.push_str(&format!(
                "  p = {}{}\n",
                format_p_value(finding.p_value),
                if finding.significant { " *" } else { "" }
            ));
        }

        report
    }
}
