//! # rodo CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rodo_cli::compare::{run_compare, CompareArgs};
use rodo_cli::risk::{run_risk, run_weighted, RiskArgs, WeightedArgs};
use rodo_cli::summary::{run_summary, SummaryArgs};
use rodo_cli::template::{run_template, TemplateArgs};

/// RODO assessment toolkit.
///
/// Exports the GDPR questionnaire, summarizes assessment documents and
/// computes risk scores offline.
#[derive(Parser, Debug)]
#[command(name = "rodo", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the questionnaire template or a blank assessment.
    Template(TemplateArgs),

    /// Summarize an assessment document.
    Summary(SummaryArgs),

    /// Score a risk from likelihood, impact and controls.
    Risk(RiskArgs),

    /// Weighted score of a risk-area list.
    Weighted(WeightedArgs),

    /// Compare two area-score snapshots.
    Compare(CompareArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so that JSON/YAML output on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Template(args) => run_template(&args),
        Commands::Summary(args) => run_summary(&args),
        Commands::Risk(args) => run_risk(&args),
        Commands::Weighted(args) => run_weighted(&args),
        Commands::Compare(args) => run_compare(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
