//! # Risk CLI
//!
//! - `rodo risk --likelihood L --impact I --controls C` scores one risk
//!   from three factors in `1..=5`.
//! - `rodo weighted <file>` computes the weighted score of a risk-area
//!   list. The file holds either a bare list or `{ "areas": [...] }`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};

use rodo_scoring::{weighted_risk_score, RiskArea, RiskFactors, RiskLevel, ScoreBand};

use crate::{load_document, print_json};

// ─── Factor score ────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct RiskArgs {
    /// Likelihood, 1 (rare) to 5 (almost certain).
    #[arg(long, short = 'l')]
    pub likelihood: u8,

    /// Impact, 1 (negligible) to 5 (severe).
    #[arg(long, short = 'i')]
    pub impact: u8,

    /// Control effectiveness, 1 (strong) to 5 (none).
    #[arg(long, short = 'c')]
    pub controls: u8,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct FactorReport {
    pub score: u8,
    pub level: RiskLevel,
    pub recommendation: Option<&'static str>,
}

pub fn run_risk(args: &RiskArgs) -> Result<u8> {
    let factors = RiskFactors::new(args.likelihood, args.impact, args.controls)
        .context("invalid risk factors")?;
    let level = factors.level();
    let report = FactorReport {
        score: factors.score(),
        level,
        recommendation: level.recommendation(),
    };

    if args.json {
        print_json(&report)?;
    } else {
        println!("  score: {}", report.score);
        println!("  level: {}", report.level);
        if let Some(text) = report.recommendation {
            println!("  {text}");
        }
    }
    Ok(0)
}

// ─── Weighted score ──────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct WeightedArgs {
    /// Risk-area list (JSON or YAML).
    pub file: PathBuf,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AreaList {
    Bare(Vec<RiskArea>),
    Wrapped { areas: Vec<RiskArea> },
}

impl AreaList {
    fn into_areas(self) -> Vec<RiskArea> {
        match self {
            Self::Bare(areas) | Self::Wrapped { areas } => areas,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WeightedReport {
    pub score: f64,
    pub band: ScoreBand,
    pub areas: usize,
}

/// Validate every area, then compute the weighted score.
pub fn weighted_report(areas: &[RiskArea]) -> Result<WeightedReport> {
    for area in areas {
        area.validate()?;
    }
    let score = weighted_risk_score(areas);
    Ok(WeightedReport {
        score,
        band: ScoreBand::from_score(score),
        areas: areas.len(),
    })
}

pub fn run_weighted(args: &WeightedArgs) -> Result<u8> {
    let areas = load_document::<AreaList>(&args.file)?.into_areas();
    let report = weighted_report(&areas)
        .with_context(|| format!("invalid risk areas in {}", args.file.display()))?;

    if args.json {
        print_json(&report)?;
    } else {
        println!("  areas: {}", report.areas);
        println!("  score: {:.1} ({})", report.score, report.band);
    }
    Ok(0)
}
