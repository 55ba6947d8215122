//! # Risk Scoring
//!
//! Two independent scores live here.
//!
//! **Weighted risk** aggregates a flat list of [`RiskArea`]s:
//!
//! ```text
//! overall = Σ(score × weight) / Σ(weight)
//! ```
//!
//! It is 0 when the list is empty or every weight is 0, and otherwise lies
//! between the smallest and largest area score. Risk areas for a stored
//! assessment are derived from its chapters: score = chapter compliance,
//! weight from [`ChapterWeights`] (default 1.0).
//!
//! **Factor risk** rates one processing activity on three 1..=5 scales:
//!
//! ```text
//! score = round(likelihood × impact / controls)      (0..=25)
//! ```
//!
//! where a lower `controls` value means stronger safeguards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use rodo_core::{Assessment, ChapterId};

use crate::compliance::chapter_compliance;
use crate::error::ScoringError;

/// Default weight for a chapter without an explicit one.
pub const DEFAULT_WEIGHT: f64 = 1.0;

// ─── Weighted risk ───────────────────────────────────────────────────

/// One entry of the flat risk-area list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskArea {
    pub id: u32,
    pub name: String,
    /// Score in `0..=100`.
    pub score: f64,
    /// Non-negative weight.
    pub weight: f64,
}

impl RiskArea {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        score: f64,
        weight: f64,
    ) -> Result<Self, ScoringError> {
        let area = Self {
            id,
            name: name.into(),
            score,
            weight,
        };
        area.validate()?;
        Ok(area)
    }

    /// Re-check a deserialized risk area.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if !self.score.is_finite() || !(0.0..=100.0).contains(&self.score) {
            return Err(ScoringError::InvalidRiskArea {
                id: self.id,
                reason: format!("score {} outside 0..=100", self.score),
            });
        }
        validate_weight(self.id, self.weight)
    }
}

fn validate_weight(id: u32, weight: f64) -> Result<(), ScoringError> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(ScoringError::InvalidRiskArea {
            id,
            reason: format!("weight {weight} must be finite and non-negative"),
        });
    }
    Ok(())
}

/// Weighted average of the area scores; 0 for an empty list or zero total weight.
///
/// Weights are scaled by the largest one before summing, so any finite
/// weights keep the sums finite and the result within the scores of the
/// weighted areas.
pub fn weighted_risk_score(areas: &[RiskArea]) -> f64 {
    let max_weight = areas.iter().map(|a| a.weight).fold(0.0, f64::max);
    if max_weight <= 0.0 || !max_weight.is_finite() {
        return 0.0;
    }

    let mut weighted = 0.0;
    let mut total = 0.0;
    let mut low = f64::INFINITY;
    let mut high = f64::NEG_INFINITY;
    for area in areas.iter().filter(|a| a.weight > 0.0) {
        let share = area.weight / max_weight;
        weighted += area.score * share;
        total += share;
        low = low.min(area.score);
        high = high.max(area.score);
    }

    let score = weighted / total;
    if score.is_finite() {
        score.clamp(low, high)
    } else {
        0.0
    }
}

/// Per-chapter weights of one assessment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterWeights(BTreeMap<ChapterId, f64>);

impl ChapterWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Weight of `chapter`, or [`DEFAULT_WEIGHT`].
    pub fn get(&self, chapter: ChapterId) -> f64 {
        self.0.get(&chapter).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    pub fn set(&mut self, chapter: ChapterId, weight: f64) -> Result<(), ScoringError> {
        validate_weight(chapter.0, weight)?;
        self.0.insert(chapter, weight);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChapterId, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One risk area per chapter, in template order.
pub fn risk_areas_from_assessment(
    assessment: &Assessment,
    weights: &ChapterWeights,
) -> Vec<RiskArea> {
    assessment
        .chapters
        .iter()
        .map(|chapter| RiskArea {
            id: chapter.id.0,
            name: chapter.name.clone(),
            score: chapter_compliance(chapter).percent(),
            weight: weights.get(chapter.id),
        })
        .collect()
}

/// Weighted risk of an assessment, with the list it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAreaScore {
    pub areas: Vec<RiskArea>,
    pub overall: f64,
}

impl RiskAreaScore {
    pub fn for_assessment(assessment: &Assessment, weights: &ChapterWeights) -> Self {
        let areas = risk_areas_from_assessment(assessment, weights);
        let overall = weighted_risk_score(&areas);
        Self { areas, overall }
    }
}

// ─── Factor risk ─────────────────────────────────────────────────────

/// Likelihood, impact and control strength, each rated 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub likelihood: u8,
    pub impact: u8,
    /// 1 = strongest controls.
    pub controls: u8,
}

impl Default for RiskFactors {
    fn default() -> Self {
        Self {
            likelihood: 3,
            impact: 3,
            controls: 3,
        }
    }
}

impl RiskFactors {
    pub fn new(likelihood: u8, impact: u8, controls: u8) -> Result<Self, ScoringError> {
        let factors = Self {
            likelihood,
            impact,
            controls,
        };
        factors.validate()?;
        Ok(factors)
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        for (name, value) in [
            ("likelihood", self.likelihood),
            ("impact", self.impact),
            ("controls", self.controls),
        ] {
            if !(1..=5).contains(&value) {
                return Err(ScoringError::InvalidFactor { name, value });
            }
        }
        Ok(())
    }

    /// `round(likelihood × impact / controls)`, at most 25.
    pub fn score(&self) -> u8 {
        let controls = self.controls.max(1);
        let raw = f64::from(self.likelihood) * f64::from(self.impact) / f64::from(controls);
        (raw + 0.5).floor().clamp(0.0, 25.0) as u8
    }

    pub fn level(&self) -> RiskLevel {
        RiskLevel::from_score(self.score())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Score 0..=3.
    Low,
    /// Score 4..=9.
    Medium,
    /// Score 10 and above.
    High,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=3 => Self::Low,
            4..=9 => Self::Medium,
            _ => Self::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }

    pub fn recommendation(&self) -> Option<&'static str> {
        match self {
            Self::High => Some(
                "High risk detected: carry out a full data protection impact assessment (DPIA) \
                 and implement additional safeguards.",
            ),
            Self::Medium => Some("Medium risk: consider implementing additional controls."),
            Self::Low => None,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            other => Err(format!("unknown risk level: {other:?}")),
        }
    }
}
