//! CLI argument parsing for auscope

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for run reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "auscope")]
#[command(version)]
#[command(about = "Compare facial action unit intensities between happy and sad expressions", long_about = None)]
pub struct Cli {
    /// Enable debug tracing output to stderr
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the analysis on an OpenFace CSV and write tables and charts
    Analyze {
        /// OpenFace AU intensity CSV
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Directory for result artifacts
        #[arg(short, long, value_name = "DIR", default_value = "outputs_real")]
        out: PathBuf,

        /// Analysis configuration (TOML)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Write result tables only, no charts
        #[arg(long = "skip-plots")]
        skip_plots: bool,

        /// Output format (text or json)
        #[arg(long = "format", value_enum, default_value = "text")]
        format: OutputFormat,

        /// Number of strongest t-test results to list
        #[arg(long = "top", value_name = "N", default_value = "10")]
        top: usize,
    },

    /// Print key findings from the artifacts of a previous run
    Findings {
        /// Directory holding result artifacts
        #[arg(short, long, value_name = "DIR", default_value = "outputs_real")]
        out: PathBuf,

        /// Output format (text or json)
        #[arg(long = "format", value_enum, default_value = "text")]
        format: OutputFormat,
    },
}
