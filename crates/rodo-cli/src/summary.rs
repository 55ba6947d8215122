//! # Summary CLI
//!
//! `rodo summary <file>` loads an assessment document and prints its
//! progress per chapter, verdict and answer tallies, compliance percentage
//! and the weighted chapter risk (every chapter weighted 1.0).

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use rodo_core::Assessment;
use rodo_scoring::{
    assessment_compliance, progress_report, summarize, AssessmentSummary, ChapterWeights,
    ProgressReport, RiskAreaScore, ScoreBand,
};

use crate::{load_document, print_json};

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Assessment document (JSON or YAML).
    pub file: PathBuf,

    /// Print the full report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Everything `rodo summary` reports about one assessment.
#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub name: String,
    pub status: rodo_core::AssessmentStatus,
    pub summary: AssessmentSummary,
    pub progress: ProgressReport,
    pub compliance_percent: u8,
    pub risk: RiskAreaScore,
    pub risk_band: ScoreBand,
}

impl SummaryReport {
    pub fn for_assessment(assessment: &Assessment) -> Self {
        let risk = RiskAreaScore::for_assessment(assessment, &ChapterWeights::new());
        Self {
            name: assessment.name.clone(),
            status: assessment.status,
            summary: summarize(assessment),
            progress: progress_report(assessment),
            compliance_percent: assessment_compliance(assessment).rounded_percent(),
            risk_band: ScoreBand::from_score(risk.overall),
            risk,
        }
    }
}

pub fn run_summary(args: &SummaryArgs) -> Result<u8> {
    let assessment: Assessment = load_document(&args.file)?;
    tracing::debug!(id = %assessment.id, file = %args.file.display(), "assessment loaded");
    let report = SummaryReport::for_assessment(&assessment);

    if args.json {
        print_json(&report)?;
        return Ok(0);
    }

    let s = &report.summary;
    println!("{} [{}]", report.name, report.status);
    println!();
    println!(
        "  progress:    {}/{} ({}%, {})",
        report.progress.overall.answered,
        report.progress.overall.total,
        report.progress.percent,
        report.progress.band
    );
    for chapter in &report.progress.chapters {
        println!(
            "    {:<3} {:<48} {:>3}%",
            chapter.id.0, chapter.name, chapter.percent
        );
    }
    println!();
    println!(
        "  answers:     yes {}, no {}, in progress {}, n/a {}",
        s.answers.yes, s.answers.no, s.answers.in_progress, s.answers.not_applicable
    );
    println!(
        "  verdicts:    positive {}, warning {}, negative {}, unscored {}",
        s.verdicts.positive, s.verdicts.warning, s.verdicts.negative, s.verdicts.unscored
    );
    println!("  compliance:  {}%", report.compliance_percent);
    println!(
        "  risk score:  {:.1} ({})",
        report.risk.overall, report.risk_band
    );
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rodo_core::{AssessmentStatus, RequirementAnswer, RequirementId};

    fn answered() -> Assessment {
        let mut a = Assessment::new("Ocena RODO - Dział IT", "");
        a.set_requirement_answer(RequirementId(1), Some(RequirementAnswer::Yes))
            .unwrap();
        a.set_requirement_answer(RequirementId(2), Some(RequirementAnswer::No))
            .unwrap();
        a
    }

    #[test]
    fn report_aggregates_assessment() {
        let report = SummaryReport::for_assessment(&answered());
        assert_eq!(report.summary.progress.answered, 2);
        assert_eq!(report.summary.answers.yes, 1);
        assert_eq!(report.compliance_percent, 50);
        assert_eq!(report.progress.chapters.len(), 6);
        assert_eq!(report.risk.areas.len(), 6);
        assert_eq!(report.status, AssessmentStatus::Draft);
    }

    #[test]
    fn run_on_json_and_yaml_files() {
        let dir = tempfile::tempdir().unwrap();
        let assessment = answered();

        let json_path = dir.path().join("ocena.json");
        std::fs::write(&json_path, serde_json::to_string(&assessment).unwrap()).unwrap();
        let args = SummaryArgs {
            file: json_path,
            json: false,
        };
        assert_eq!(run_summary(&args).unwrap(), 0);

        let yaml_path = dir.path().join("ocena.yaml");
        std::fs::write(&yaml_path, serde_yaml::to_string(&assessment).unwrap()).unwrap();
        let args = SummaryArgs {
            file: yaml_path,
            json: true,
        };
        assert_eq!(run_summary(&args).unwrap(), 0);
    }

    #[test]
    fn non_assessment_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.json");
        std::fs::write(&path, r#"{"hello": "world"}"#).unwrap();
        let args = SummaryArgs { file: path, json: false };
        assert!(run_summary(&args).is_err());
    }
}
