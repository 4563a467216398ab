//! End-to-end analysis run: load, summarize, write tables, render charts
//!
//! Stages run strictly in sequence. Input problems abort the run before the
//! output directory is touched; everything after loading is best-effort and
//! reported through [`AnalysisRun`].

use crate::config::{AnalysisConfig, SIGNIFICANCE_LEVEL};
use crate::dataset::{load, Imputation, LoadDiagnostic};
use crate::emotion::EmotionLabel;
use crate::report::{render_to, write_tables, DirectorySink, RenderOutcome};
use crate::statistics::{summarize, GroupSummaryTable, SignificanceTable};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Per-run switches that are not part of the analysis configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisOptions {
    /// Write the CSV tables but no charts
    pub skip_plots: bool,
}

/// Everything one analysis run produced
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRun {
    pub input: PathBuf,
    pub out_dir: PathBuf,
    /// Rows read from the input
    pub total_rows: usize,
    /// Happy and sad rows kept for comparison
    pub compared_rows: usize,
    /// Row count per label over the whole input, most frequent first
    pub label_distribution: Vec<(EmotionLabel, usize)>,
    pub features: Vec<String>,
    pub diagnostics: Vec<LoadDiagnostic>,
    pub imputations: Vec<Imputation>,
    pub summary: GroupSummaryTable,
    pub tests: SignificanceTable,
    pub render: RenderOutcome,
}

/// Run the whole pipeline for one input file
///
/// The output directory is created if needed. Existing artifacts with the same
/// names are overwritten.
pub fn run_analysis(
    input: &Path,
    out_dir: &Path,
    config: &AnalysisConfig,
    options: AnalysisOptions,
) -> Result<AnalysisRun> {
    let dataset = load(input, config)
        .with_context(|| format!("Failed to load dataset from {}", input.display()))?;

    tracing::debug!(
        "Loaded {} rows, {} compared, {} features",
        dataset.full.len(),
        dataset.filtered.len(),
        dataset.features().len()
    );

    std::fs::create_dir_all(out_dir).with_context(|| {
        format!("Failed to create output directory {}", out_dir.display())
    })?;

    let (summary, tests) = summarize(&dataset.filtered, config);

    let mut sink = DirectorySink::new(out_dir);
    write_tables(&mut sink, &summary, &tests).context("Failed to write result tables")?;

    let render = if options.skip_plots {
        RenderOutcome::Skipped {
            reason: "plots disabled".to_string(),
        }
    } else {
        render_to(
            &mut sink,
            &dataset.filtered,
            dataset.features(),
            &config.key_features,
        )
        .context("Failed to render charts")?
    };

    Ok(AnalysisRun {
        input: input.to_path_buf(),
        out_dir: out_dir.to_path_buf(),
        total_rows: dataset.full.len(),
        compared_rows: dataset.filtered.len(),
        label_distribution: dataset.full.label_counts(),
        features: dataset.features().to_vec(),
        diagnostics: dataset.diagnostics,
        imputations: dataset.imputations,
        summary,
        tests,
        render,
    })
}

impl AnalysisRun {
    /// Generate human-readable report listing the `top_n` strongest results
    pub fn to_report_string(&self, top_n: usize) -> String {
        let mut report = String::new();

        report.push_str(&format!("Loaded {} rows from {}\n", self.total_rows, self.input.display()));
        report.push_str(&format!(
            "Happy/sad rows: {} ({} AU features)\n",
            self.compared_rows,
            self.features.len()
        ));

        if !self.label_distribution.is_empty() {
            report.push_str("\nEmotion distribution:\n");
            for (label, count) in &self.label_distribution {
                report.push_str(&format!("  {:<10} {}\n", label.as_str(), count));
            }
        }

        if !self.diagnostics.is_empty() {
            report.push_str("\nWarnings:\n");
            for diagnostic in &self.diagnostics {
                report.push_str(&format!("  - {}\n", diagnostic));
            }
        }

        let notes: Vec<String> = self
            .imputations
            .iter()
            .filter_map(|imputation| match imputation {
                Imputation::Complete { .. } => None,
                Imputation::Filled {
                    feature,
                    value,
                    filled,
                } => Some(format!(
                    "{}: filled {} missing value(s) with mean {:.4}",
                    feature, filled, value
                )),
                Imputation::Unfillable { feature, missing } => Some(format!(
                    "{}: {} missing value(s) left empty (no observations)",
                    feature, missing
                )),
            })
            .collect();
        if !notes.is_empty() {
            report.push_str("\nImputation:\n");
            for note in notes {
                report.push_str(&format!("  {}\n", note));
            }
        }

        report.push_str(&format!(
            "\nT-tests: {} AUs tested, {} significant (p < {})\n",
            self.tests.len(),
            self.tests.significant_count(),
            SIGNIFICANCE_LEVEL
        ));
        if !self.tests.excluded.is_empty() {
            report.push_str(&format!(
                "  {} AU(s) excluded (constant within a group)\n",
                self.tests.excluded.len()
            ));
        }
        for record in self.tests.top(top_n) {
            report.push_str(&format!(
                "  {:<8} t={:>8.3}  p={:.4e}{}\n",
                record.feature,
                record.statistic,
                record.p_value,
                if record.significant { " *" } else { "" }
            ));
        }

        match &self.render {
            RenderOutcome::Rendered { files, .. } => {
                report.push_str(&format!("\nCharts: {}\n", files.join(", ")));
            }
            RenderOutcome::Skipped { reason } => {
                report.push_str(&format!("\nCharts skipped: {}\n", reason));
            }
        }

        report.push_str(&format!("Results saved to {}\n", self.out_dir.display()));
        report
    }
}
