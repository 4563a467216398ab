use anyhow::{Context, Result};
use auscope::cli::{Cli, Command, OutputFormat};
use auscope::config::AnalysisConfig;
use auscope::findings::KeyFindings;
use auscope::pipeline::{run_analysis, AnalysisOptions};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber: warnings by default, everything with --debug
fn init_tracing(debug: bool) {
    let level = if debug {
        tracing::Level::TRACE
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    match args.command {
        Command::Analyze {
            input,
            out,
            config,
            skip_plots,
            format,
            top,
        } => {
            let config = match config {
                Some(path) => AnalysisConfig::load(&path)
                    .with_context(|| format!("Invalid configuration {}", path.display()))?,
                None => AnalysisConfig::default(),
            };

            let run = run_analysis(&input, &out, &config, AnalysisOptions { skip_plots })?;

            match format {
                OutputFormat::Text => print!("{}", run.to_report_string(top)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&run)?),
            }
        }
        Command::Findings { out, format } => {
            let findings = KeyFindings::from_artifacts(&out)
                .with_context(|| format!("Failed to read results from {}", out.display()))?;

            match format {
                OutputFormat::Text => print!("{}", findings.to_report_string()),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&findings)?),
            }
        }
    }

    Ok(())
}
