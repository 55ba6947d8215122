//! # Progress Roll-ups
//!
//! Progress is the share of requirements that carry any answer, including
//! NOT_APPLICABLE. It is computed bottom-up: an area counts its own
//! requirements, a chapter sums its areas, an assessment sums its chapters.
//! `answered <= total` holds at every level by construction.

use serde::{Deserialize, Serialize};

use rodo_core::{AreaId, Assessment, ChapterId, Chapter, Area, Requirement};

/// Answered / total requirement counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    /// Count answered requirements in `requirements`.
    pub fn of<'a>(requirements: impl IntoIterator<Item = &'a Requirement>) -> Self {
        requirements
            .into_iter()
            .fold(Self::default(), |acc, req| Self {
                answered: acc.answered + usize::from(req.is_answered()),
                total: acc.total + 1,
            })
    }

    /// Percentage complete in `[0, 100]`; 0 when there is nothing to answer.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.answered as f64 / self.total as f64 * 100.0
    }

    /// Percentage rounded half-up to a whole number.
    pub fn rounded_percent(&self) -> u8 {
        round_percent(self.percent())
    }

    pub fn band(&self) -> ProgressBand {
        ProgressBand::from_percent(self.percent())
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.answered == self.total
    }
}

impl std::ops::Add for Progress {
    type Output = Progress;

    fn add(self, rhs: Self) -> Self {
        Self {
            answered: self.answered + rhs.answered,
            total: self.total + rhs.total,
        }
    }
}

impl std::iter::Sum for Progress {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |a, b| a + b)
    }
}

/// Round a percentage half-up and clamp it to `0..=100`.
pub(crate) fn round_percent(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    (value + 0.5).floor().clamp(0.0, 100.0) as u8
}

pub fn area_progress(area: &Area) -> Progress {
    Progress::of(&area.requirements)
}

pub fn chapter_progress(chapter: &Chapter) -> Progress {
    chapter.areas.iter().map(area_progress).sum()
}

pub fn assessment_progress(assessment: &Assessment) -> Progress {
    assessment.chapters.iter().map(chapter_progress).sum()
}

// ─── Bands ───────────────────────────────────────────────────────────

/// Coarse progress indicator shown next to an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressBand {
    /// Below 30 %.
    Low,
    /// 30 % up to (not including) 70 %.
    Medium,
    /// 70 % and above.
    High,
}

impl ProgressBand {
    pub fn from_percent(percent: f64) -> Self {
        if percent < 30.0 {
            Self::Low
        } else if percent < 70.0 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl std::fmt::Display for ProgressBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Report ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaProgress {
    pub id: AreaId,
    pub name: String,
    #[serde(flatten)]
    pub progress: Progress,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterProgress {
    pub id: ChapterId,
    pub name: String,
    #[serde(flatten)]
    pub progress: Progress,
    pub percent: u8,
    pub areas: Vec<AreaProgress>,
}

/// Progress at every level of one assessment, in template order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    #[serde(flatten)]
    pub overall: Progress,
    pub percent: u8,
    pub band: ProgressBand,
    pub chapters: Vec<ChapterProgress>,
}

pub fn progress_report(assessment: &Assessment) -> ProgressReport {
    let chapters: Vec<ChapterProgress> = assessment
        .chapters
        .iter()
        .map(|chapter| {
            let areas: Vec<AreaProgress> = chapter
                .areas
                .iter()
                .map(|area| {
                    let progress = area_progress(area);
                    AreaProgress {
                        id: area.id,
                        name: area.name.clone(),
                        progress,
                        percent: progress.rounded_percent(),
                    }
                })
                .collect();
            let progress: Progress = areas.iter().map(|a| a.progress).sum();
            ChapterProgress {
                id: chapter.id,
                name: chapter.name.clone(),
                progress,
                percent: progress.rounded_percent(),
                areas,
            }
        })
        .collect();

    let overall: Progress = chapters.iter().map(|c| c.progress).sum();
    ProgressReport {
        overall,
        percent: overall.rounded_percent(),
        band: overall.band(),
        chapters,
    }
}
