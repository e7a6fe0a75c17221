//! touchz - touch-height calibration log toolkit
//!
//! Command-line front-end over the parsing pipeline: load a set of machine
//! log files, then either export the `Place` records as a table or render
//! the TouchZ-by-head scatter chart.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use touchz::aggregate::group_by_head;
use touchz::export::{write_csv, write_json, write_text};
use touchz::parsers::{self, ExtractorKind, FieldExtractor};
use touchz::plot::render_scatter_png;
use touchz::state::{Session, BUCKET_HOURS};

#[derive(Parser)]
#[command(name = "touchz", version, about = "Touch-height calibration log parser and plotter")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Sniff the first file's content and pick a strategy
    Auto,
    /// Ordered substring anchor search (tolerates missing trailing fields)
    Anchor,
    /// Single full-line pattern match (strict, captures the richer schema)
    Pattern,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Comma-separated table
    Csv,
    /// Tab-separated `key: value` pairs, one record per line
    Text,
    /// Pretty-printed JSON array
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Parse logs and export the Place records as a table
    Export {
        /// Destination file
        #[arg(short, long)]
        out: PathBuf,
        #[arg(long, value_enum, default_value = "csv")]
        format: Format,
        #[arg(long, value_enum, default_value = "auto")]
        strategy: Strategy,
        /// Log files to load
        #[arg(required = true)]
        logs: Vec<PathBuf>,
    },
    /// Parse logs and render the TouchZ-by-head scatter chart
    Graph {
        /// Destination PNG file
        #[arg(short, long)]
        out: PathBuf,
        #[arg(long, value_enum, default_value = "auto")]
        strategy: Strategy,
        /// Floor timestamps to this bucket width (hours) before plotting
        #[arg(long, default_value_t = BUCKET_HOURS)]
        bucket_hours: u32,
        /// Log files to load
        #[arg(required = true)]
        logs: Vec<PathBuf>,
    },
}

/// Resolve the extraction strategy, sniffing the first file's content when
/// the user asked for auto-detection.
fn resolve_extractor(strategy: Strategy, logs: &[PathBuf]) -> Result<Box<dyn FieldExtractor>> {
    let kind = match strategy {
        Strategy::Anchor => ExtractorKind::Anchor,
        Strategy::Pattern => ExtractorKind::Pattern,
        Strategy::Auto => {
            let first = &logs[0];
            let contents = fs::read_to_string(first)
                .with_context(|| format!("Failed to read {}", first.display()))?;
            let kind = parsers::sniff(&contents);
            tracing::debug!("Sniffed {} strategy from {}", kind.name(), first.display());
            kind
        }
    };
    Ok(parsers::build(kind))
}

fn load_session(
    logs: &[PathBuf],
    strategy: Strategy,
) -> Result<Option<Session>> {
    let extractor = resolve_extractor(strategy, logs)?;
    let mut session = Session::new();
    let summary = session.load(logs, extractor.as_ref())?;

    if session.is_empty() {
        println!(
            "No valid records found in {} file(s) ({} lines read); nothing to do.",
            summary.files, summary.lines
        );
        return Ok(None);
    }

    println!(
        "Loaded {} records from {} file(s) ({} lines skipped).",
        summary.records,
        summary.files,
        summary.skipped()
    );
    Ok(Some(session))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Export {
            out,
            format,
            strategy,
            logs,
        } => {
            let Some(session) = load_session(&logs, strategy)? else {
                return Ok(());
            };
            match format {
                Format::Csv => write_csv(session.records(), &out)?,
                Format::Text => write_text(session.records(), &out)?,
                Format::Json => write_json(session.records(), &out)?,
            }
            println!("Exported {} records to {}.", session.len(), out.display());
        }
        Command::Graph {
            out,
            strategy,
            bucket_hours,
            logs,
        } => {
            let Some(session) = load_session(&logs, strategy)? else {
                return Ok(());
            };
            let bucket = (bucket_hours > 0).then_some(bucket_hours);
            let series = group_by_head(session.records(), bucket);
            render_scatter_png(&series, &out)?;
            println!(
                "Rendered {} head series ({} records) to {}.",
                series.len(),
                session.len(),
                out.display()
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    run(Cli::parse())
}
