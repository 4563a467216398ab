//! Artifact sinks: where tables and charts end up
//!
//! The statistics and chart code never touch the filesystem or a plotting
//! backend directly; they hand finished artifacts to an [`ArtifactSink`].

use super::charts::Chart;
use super::plots::render_chart;
use super::tables::write_atomic;
use super::ReportError;
use std::path::{Path, PathBuf};

/// Destination for named report artifacts
pub trait ArtifactSink {
    /// Store a serialized table under `name`, replacing any previous one
    fn write_table(&mut self, name: &str, contents: &str) -> Result<(), ReportError>;

    /// Store a chart under `name`, replacing any previous one
    fn write_image(&mut self, name: &str, chart: &Chart) -> Result<(), ReportError>;
}

/// Writes artifacts as files into an existing directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for DirectorySink {
    fn write_table(&mut self, name: &str, contents: &str) -> Result<(), ReportError> {
        write_atomic(&self.dir.join(name), contents.as_bytes())
    }

    fn write_image(&mut self, name: &str, chart: &Chart) -> Result<(), ReportError> {
        let path = self.dir.join(name);
        render_chart(chart, &path)?;
        tracing::debug!("Rendered {}", path.display());
        Ok(())
    }
}

/// Keeps artifacts in memory, in write order
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub tables: Vec<(String, String)>,
    pub images: Vec<(String, Chart)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, name: &str) -> Option<&str> {
        self.tables
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, contents)| contents.as_str())
    }

    pub fn image(&self, name: &str) -> Option<&Chart> {
        self.images
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, chart)| chart)
    }
}

impl ArtifactSink for MemorySink {
    fn write_table(&mut self, name: &str, contents: &str) -> Result<(), ReportError> {
        self.tables.push((name.to_string(), contents.to_string()));
        Ok(())
    }

    fn write_image(&mut self, name: &str, chart: &Chart) -> Result<(), ReportError> {
        self.images.push((name.to_string(), chart.clone()));
        Ok(())
    }
}
