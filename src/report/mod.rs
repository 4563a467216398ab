// Report Artifact Writer
//
// Serializes the statistics tables to CSV and renders the three key-AU charts.
// Artifacts use fixed file names so downstream consumers (slide generation,
// `auscope findings`) can find them without a manifest.

mod charts;
mod plots;
mod sink;
mod tables;

pub use charts::{
    available_key_features, box_panel_chart, box_stats, gaussian_kde, mean_bar_chart,
    violin_chart, BoxPanel, BoxPanelChart, BoxStats, Chart, DensityCurve, GroupedBarChart,
    ViolinChart,
};
pub use plots::{render_chart, PlotError};
pub use sink::{ArtifactSink, DirectorySink, MemorySink};
pub use tables::{
    format_summary, format_tests, read_summary, read_tests, write_summary, write_tests,
};

use crate::dataset::MeasurementTable;
use crate::statistics::{GroupSummaryTable, SignificanceTable};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Group summary table (per emotion, per AU)
pub const SUMMARY_FILE: &str = "au_summary_by_emotion_real.csv";
/// Happy-vs-sad t-test table
pub const TESTS_FILE: &str = "au_ttests_real.csv";
/// Density plot of the first key AU
pub const VIOLIN_FILE: &str = "violin_aus_by_emotion_real.png";
/// One box plot per key AU
pub const BOXPLOT_FILE: &str = "boxplots_real.png";
/// Grouped bar chart of key AU means
pub const MEAN_BAR_FILE: &str = "mean_au_by_emotion_real.png";

/// Errors raised while writing or reading artifacts
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },

    #[error(transparent)]
    Plot(#[from] PlotError),
}

/// What the rendering stage did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RenderOutcome {
    /// Artifacts written, by file name
    Rendered { files: Vec<String>, features: Vec<String> },
    /// Nothing to draw; not an error
    Skipped { reason: String },
}

/// Write both statistics tables through a sink
pub fn write_tables(
    sink: &mut dyn ArtifactSink,
    summary: &GroupSummaryTable,
    tests: &SignificanceTable,
) -> Result<(), ReportError> {
    sink.write_table(SUMMARY_FILE, &format_summary(summary))?;
    sink.write_table(TESTS_FILE, &format_tests(tests))?;
    Ok(())
}

/// Render the key-AU charts through a sink
///
/// Only key features present in `features` are drawn, in priority order.
/// With none present, or no rows to draw, rendering is skipped.
pub fn render_to(
    sink: &mut dyn ArtifactSink,
    table: &MeasurementTable,
    features: &[String],
    key_features: &[String],
) -> Result<RenderOutcome, ReportError> {
    let available = available_key_features(features, key_features);

    if available.is_empty() {
        tracing::warn!("No key AUs found for plotting");
        return Ok(RenderOutcome::Skipped {
            reason: "no key AUs found for plotting".to_string(),
        });
    }
    if table.is_empty() {
        tracing::warn!("No rows to plot");
        return Ok(RenderOutcome::Skipped {
            reason: "no happy or sad rows to plot".to_string(),
        });
    }

    tracing::debug!("Generating distribution plots for: {:?}", available);
    let mut files = Vec::new();

    if let Some(violin) = violin_chart(table, &available[0]) {
        sink.write_image(VIOLIN_FILE, &Chart::Violin(violin))?;
        files.push(VIOLIN_FILE.to_string());
    }

    let boxes = box_panel_chart(table, &available);
    sink.write_image(BOXPLOT_FILE, &Chart::BoxPanels(boxes))?;
    files.push(BOXPLOT_FILE.to_string());

    let bars = mean_bar_chart(table, &available);
    sink.write_image(MEAN_BAR_FILE, &Chart::GroupedBars(bars))?;
    files.push(MEAN_BAR_FILE.to_string());

    Ok(RenderOutcome::Rendered {
        files,
        features: available,
    })
}

/// Render the key-AU charts as PNG files into an existing directory
pub fn render(
    table: &MeasurementTable,
    features: &[String],
    key_features: &[String],
    out_dir: &Path,
) -> Result<RenderOutcome, ReportError> {
    render_to(&mut DirectorySink::new(out_dir), table, features, key_features)
}
