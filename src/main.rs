use anyhow::{Context, Result};
use canalyzer::cli::{Cli, OutputFormat};
use canalyzer::parser::parse_can_log;
use canalyzer::report::AnalysisReport;
use clap::Parser;
use std::fs;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let dataset = parse_can_log(&cli.log_file)
        .with_context(|| format!("failed to load CAN log {}", cli.log_file.display()))?;
    tracing::info!(frames = dataset.len(), "loaded CAN log");

    let dataset = match (cli.start, cli.end) {
        (None, None) => dataset,
        (start, end) => {
            let start = start.unwrap_or(f64::NEG_INFINITY);
            let end = end.unwrap_or(f64::INFINITY);
            dataset
                .filter_by_time_range(start, end)
                .context("invalid time range")?
        }
    };

    let dataset = match &cli.can_id {
        Some(id) => dataset.filter_by_identifier(id),
        None => dataset,
    };

    let report = AnalysisReport::build(&dataset, &cli.engine_config());

    let rendered = match cli.format {
        OutputFormat::Text => report.render_text(),
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
