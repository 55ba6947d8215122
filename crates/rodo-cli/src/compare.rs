//! # Compare CLI
//!
//! `rodo compare <current> <previous>` matches two area-score snapshots by
//! area id and reports per-area changes, the overall trend and the
//! biggest improvement and deterioration.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use rodo_scoring::{compare_snapshots, AreaScore, ScoreStats, SnapshotComparison, Trend};

use crate::{load_document, print_json};

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Current snapshot: list of `{id, name, score}`.
    pub current: PathBuf,

    /// Previous snapshot, same shape.
    pub previous: PathBuf,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct CompareReport {
    pub comparison: SnapshotComparison,
    pub current_stats: ScoreStats,
    pub previous_stats: ScoreStats,
}

impl CompareReport {
    pub fn new(current: &[AreaScore], previous: &[AreaScore]) -> Self {
        Self {
            comparison: compare_snapshots(current, previous),
            current_stats: ScoreStats::from_scores(current),
            previous_stats: ScoreStats::from_scores(previous),
        }
    }
}

pub fn run_compare(args: &CompareArgs) -> Result<u8> {
    let current: Vec<AreaScore> = load_document(&args.current)?;
    let previous: Vec<AreaScore> = load_document(&args.previous)?;
    for score in current.iter().chain(&previous) {
        score.validate()?;
    }
    let report = CompareReport::new(&current, &previous);
    tracing::debug!(
        matched = report.comparison.changes.len(),
        current = current.len(),
        previous = previous.len(),
        "snapshots compared"
    );

    if args.json {
        print_json(&report)?;
        return Ok(0);
    }

    let c = &report.comparison;
    for change in &c.changes {
        println!(
            "  {:<40} {:>6.1} -> {:>6.1}  ({:+.1})",
            change.name, change.previous, change.current, change.change
        );
    }
    println!();
    println!("  total change: {:+.1} ({})", c.total_change, trend_label(c.trend));
    if let Some(best) = &c.biggest_improvement {
        println!("  biggest improvement:   {} ({:+.1})", best.name, best.change);
    }
    if let Some(worst) = &c.biggest_deterioration {
        println!("  biggest deterioration: {} ({:+.1})", worst.name, worst.change);
    }
    println!(
        "  average: {:.1} -> {:.1}",
        report.previous_stats.average, report.current_stats.average
    );
    Ok(0)
}

fn trend_label(trend: Trend) -> &'static str {
    match trend {
        Trend::Improved => "improved",
        Trend::Deteriorated => "deteriorated",
        Trend::Unchanged => "unchanged",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(id: u32, name: &str, score: f64) -> AreaScore {
        AreaScore {
            id,
            name: name.to_string(),
            score,
        }
    }

    #[test]
    fn report_combines_comparison_and_stats() {
        let current = [score(1, "A", 80.0), score(2, "B", 50.0)];
        let previous = [score(1, "A", 60.0), score(2, "B", 70.0)];
        let report = CompareReport::new(&current, &previous);
        assert_eq!(report.comparison.trend, Trend::Unchanged);
        assert_eq!(report.current_stats.max, 80.0);
        assert_eq!(report.previous_stats.min, 60.0);
    }

    #[test]
    fn run_on_files() {
        let dir = tempfile::tempdir().unwrap();
        let current = dir.path().join("q2.json");
        let previous = dir.path().join("q1.yaml");
        std::fs::write(&current, r#"[{"id": 1, "name": "Zgody", "score": 90.0}]"#).unwrap();
        std::fs::write(&previous, "- id: 1\n  name: Zgody\n  score: 70.0\n").unwrap();

        let args = CompareArgs {
            current,
            previous,
            json: false,
        };
        assert_eq!(run_compare(&args).unwrap(), 0);
    }

    #[test]
    fn out_of_range_score_fails() {
        let dir = tempfile::tempdir().unwrap();
        let current = dir.path().join("q2.json");
        let previous = dir.path().join("q1.json");
        std::fs::write(&current, r#"[{"id": 1, "name": "Zgody", "score": 120.0}]"#).unwrap();
        std::fs::write(&previous, "[]").unwrap();
        let args = CompareArgs {
            current,
            previous,
            json: true,
        };
        let err = run_compare(&args).unwrap_err();
        assert!(err.to_string().contains("outside 0..=100"));
    }

    #[test]
    fn missing_previous_fails() {
        let dir = tempfile::tempdir().unwrap();
        let current = dir.path().join("q2.json");
        std::fs::write(&current, "[]").unwrap();
        let args = CompareArgs {
            current,
            previous: dir.path().join("missing.json"),
            json: true,
        };
        assert!(run_compare(&args).is_err());
    }
}
