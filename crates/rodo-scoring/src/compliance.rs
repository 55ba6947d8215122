//! # Compliance Percentages
//!
//! Compliance of an area is the share of YES answers among its applicable
//! answered requirements. NOT_APPLICABLE and unanswered requirements are
//! left out of the denominator; NO and IN_PROGRESS count against it.

use serde::{Deserialize, Serialize};

use rodo_core::{Area, Assessment, Chapter, RequirementAnswer};

use crate::progress::round_percent;

/// Compliant / applicable requirement counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compliance {
    pub compliant: usize,
    pub applicable: usize,
}

impl Compliance {
    /// Percentage in `[0, 100]`; 0 when nothing applicable has been answered.
    pub fn percent(&self) -> f64 {
        if self.applicable == 0 {
            return 0.0;
        }
        self.compliant as f64 / self.applicable as f64 * 100.0
    }

    pub fn rounded_percent(&self) -> u8 {
        round_percent(self.percent())
    }
}

impl std::ops::Add for Compliance {
    type Output = Compliance;

    fn add(self, rhs: Self) -> Self {
        Self {
            compliant: self.compliant + rhs.compliant,
            applicable: self.applicable + rhs.applicable,
        }
    }
}

impl std::iter::Sum for Compliance {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |a, b| a + b)
    }
}

pub fn area_compliance(area: &Area) -> Compliance {
    area.requirements
        .iter()
        .filter_map(|r| r.value)
        .filter(RequirementAnswer::is_applicable)
        .fold(Compliance::default(), |acc, answer| Compliance {
            compliant: acc.compliant + usize::from(answer == RequirementAnswer::Yes),
            applicable: acc.applicable + 1,
        })
}

pub fn chapter_compliance(chapter: &Chapter) -> Compliance {
    chapter.areas.iter().map(area_compliance).sum()
}

pub fn assessment_compliance(assessment: &Assessment) -> Compliance {
    assessment.chapters.iter().map(chapter_compliance).sum()
}
