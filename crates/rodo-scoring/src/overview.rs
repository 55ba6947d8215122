//! # Portfolio Overview
//!
//! Dashboard figures across every stored assessment: how many there are,
//! their average progress, and how decisive area verdicts split between
//! POSITIVE, WARNING and NEGATIVE. Areas with any other verdict, or none,
//! are left out of the split.

use serde::{Deserialize, Serialize};

use crate::progress::round_percent;
use crate::summary::{AssessmentSummary, VerdictTally};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioOverview {
    pub assessments: usize,
    /// Mean of the per-assessment progress percentages, rounded.
    pub average_progress: u8,
    pub positive_percent: u8,
    pub warning_percent: u8,
    pub negative_percent: u8,
}

impl PortfolioOverview {
    pub fn from_summaries<'a>(summaries: impl IntoIterator<Item = &'a AssessmentSummary>) -> Self {
        let mut verdicts = VerdictTally::default();
        let mut count = 0usize;
        let mut progress_sum = 0.0;

        for summary in summaries {
            count += 1;
            progress_sum += summary.progress.percent();
            verdicts.positive += summary.verdicts.positive;
            verdicts.warning += summary.verdicts.warning;
            verdicts.negative += summary.verdicts.negative;
        }

        let decisive = verdicts.decisive();
        let share = |n: usize| {
            if decisive == 0 {
                0
            } else {
                round_percent(n as f64 / decisive as f64 * 100.0)
            }
        };

        Self {
            assessments: count,
            average_progress: if count == 0 {
                0
            } else {
                round_percent(progress_sum / count as f64)
            },
            positive_percent: share(verdicts.positive),
            warning_percent: share(verdicts.warning),
            negative_percent: share(verdicts.negative),
        }
    }
}
