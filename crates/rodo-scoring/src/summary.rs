//! # Verdict and Answer Tallies
//!
//! Counts of every area verdict and every requirement answer in one
//! assessment, as shown on the results page.

use serde::{Deserialize, Serialize};

use rodo_core::{AreaVerdict, Assessment, RequirementAnswer};

use crate::progress::{assessment_progress, Progress};

/// Counts of area verdicts. `unscored` areas carry no verdict yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictTally {
    pub positive: usize,
    pub warning: usize,
    pub negative: usize,
    pub in_progress: usize,
    pub not_applicable: usize,
    pub unscored: usize,
    pub total: usize,
}

impl VerdictTally {
    pub fn record(&mut self, verdict: Option<AreaVerdict>) {
        match verdict {
            Some(AreaVerdict::Positive) => self.positive += 1,
            Some(AreaVerdict::Warning) => self.warning += 1,
            Some(AreaVerdict::Negative) => self.negative += 1,
            Some(AreaVerdict::InProgress) => self.in_progress += 1,
            Some(AreaVerdict::NotApplicable) => self.not_applicable += 1,
            None => self.unscored += 1,
        }
        self.total += 1;
    }

    /// Areas carrying POSITIVE, WARNING or NEGATIVE.
    pub fn decisive(&self) -> usize {
        self.positive + self.warning + self.negative
    }
}

/// Counts of requirement answers. `unanswered` carry no value yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerTally {
    pub yes: usize,
    pub no: usize,
    pub in_progress: usize,
    pub not_applicable: usize,
    pub unanswered: usize,
    pub total: usize,
}

impl AnswerTally {
    pub fn record(&mut self, answer: Option<RequirementAnswer>) {
        match answer {
            Some(RequirementAnswer::Yes) => self.yes += 1,
            Some(RequirementAnswer::No) => self.no += 1,
            Some(RequirementAnswer::InProgress) => self.in_progress += 1,
            Some(RequirementAnswer::NotApplicable) => self.not_applicable += 1,
            None => self.unanswered += 1,
        }
        self.total += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSummary {
    pub progress: Progress,
    pub verdicts: VerdictTally,
    pub answers: AnswerTally,
}

pub fn summarize(assessment: &Assessment) -> AssessmentSummary {
    let mut verdicts = VerdictTally::default();
    for area in assessment.areas() {
        verdicts.record(area.score);
    }
    let mut answers = AnswerTally::default();
    for req in assessment.requirements() {
        answers.record(req.value);
    }
    AssessmentSummary {
        progress: assessment_progress(assessment),
        verdicts,
        answers,
    }
}
