//! # Score Snapshots and Comparison
//!
//! A snapshot is a list of per-area scores (0..=100) taken at one point in
//! time. Two snapshots are compared area by area, matching on id; areas
//! present in only one snapshot are ignored.

use serde::{Deserialize, Serialize};

use rodo_core::Assessment;

use crate::compliance::area_compliance;
use crate::error::ScoringError;

/// Score of one area in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaScore {
    pub id: u32,
    pub name: String,
    pub score: f64,
}

impl AreaScore {
    /// Reject scores outside 0..=100.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if !self.score.is_finite() || !(0.0..=100.0).contains(&self.score) {
            return Err(ScoringError::InvalidAreaScore {
                id: self.id,
                score: self.score,
            });
        }
        Ok(())
    }
}

/// Area compliance of every area of `assessment`, in template order.
pub fn area_scores(assessment: &Assessment) -> Vec<AreaScore> {
    assessment
        .areas()
        .map(|area| AreaScore {
            id: area.id.0,
            name: area.name.clone(),
            score: area_compliance(area).percent(),
        })
        .collect()
}

/// Average, best and worst area score. All 0 for an empty snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreStats {
    pub average: f64,
    pub max: f64,
    pub min: f64,
}

impl ScoreStats {
    pub fn from_scores(scores: &[AreaScore]) -> Self {
        if scores.is_empty() {
            return Self::default();
        }
        let sum: f64 = scores.iter().map(|s| s.score).sum();
        Self {
            average: sum / scores.len() as f64,
            max: scores.iter().map(|s| s.score).fold(f64::NEG_INFINITY, f64::max),
            min: scores.iter().map(|s| s.score).fold(f64::INFINITY, f64::min),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    Improved,
    Deteriorated,
    Unchanged,
}

/// Change of one area between two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaChange {
    pub id: u32,
    pub name: String,
    pub previous: f64,
    pub current: f64,
    /// `current - previous`.
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotComparison {
    /// Matched areas, in the order of the current snapshot.
    pub changes: Vec<AreaChange>,
    pub total_change: f64,
    pub trend: Trend,
    /// Matched area with the largest change; `None` when nothing matched.
    pub biggest_improvement: Option<AreaChange>,
    /// Matched area with the smallest change; `None` when nothing matched.
    pub biggest_deterioration: Option<AreaChange>,
}

pub fn compare_snapshots(current: &[AreaScore], previous: &[AreaScore]) -> SnapshotComparison {
    let changes: Vec<AreaChange> = current
        .iter()
        .filter_map(|cur| {
            previous.iter().find(|p| p.id == cur.id).map(|prev| AreaChange {
                id: cur.id,
                name: cur.name.clone(),
                previous: prev.score,
                current: cur.score,
                change: cur.score - prev.score,
            })
        })
        .collect();

    let total_change: f64 = changes.iter().map(|c| c.change).sum();
    let trend = if total_change > 0.0 {
        Trend::Improved
    } else if total_change < 0.0 {
        Trend::Deteriorated
    } else {
        Trend::Unchanged
    };

    // Strict comparisons keep the first area on ties.
    let mut biggest_improvement: Option<&AreaChange> = None;
    let mut biggest_deterioration: Option<&AreaChange> = None;
    for change in &changes {
        if biggest_improvement.map_or(true, |best| change.change > best.change) {
            biggest_improvement = Some(change);
        }
        if biggest_deterioration.map_or(true, |worst| change.change < worst.change) {
            biggest_deterioration = Some(change);
        }
    }

    tracing::trace!(matched = changes.len(), total_change, "compared snapshots");

    SnapshotComparison {
        biggest_improvement: biggest_improvement.cloned(),
        biggest_deterioration: biggest_deterioration.cloned(),
        changes,
        total_change,
        trend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(scores: &[(u32, f64)]) -> Vec<AreaScore> {
        scores
            .iter()
            .map(|(id, score)| AreaScore {
                id: *id,
                name: format!("Obszar {id}"),
                score: *score,
            })
            .collect()
    }

    #[test]
    fn area_score_range() {
        let scores = snap(&[(1, 0.0), (2, 100.0), (3, 100.5), (4, -1.0), (5, f64::NAN)]);
        assert!(scores[0].validate().is_ok());
        assert!(scores[1].validate().is_ok());
        assert!(matches!(
            scores[2].validate(),
            Err(ScoringError::InvalidAreaScore { id: 3, .. })
        ));
        assert!(scores[3].validate().is_err());
        assert!(scores[4].validate().is_err());
    }

    #[test]
    fn stats_of_empty_are_zero() {
        assert_eq!(ScoreStats::from_scores(&[]), ScoreStats::default());
    }

    #[test]
    fn stats() {
        let s = ScoreStats::from_scores(&snap(&[(1, 80.0), (2, 60.0), (3, 100.0)]));
        assert_eq!(s.average, 80.0);
        assert_eq!(s.max, 100.0);
        assert_eq!(s.min, 60.0);
    }

    #[test]
    fn comparison_matches_by_id() {
        let current = snap(&[(1, 85.0), (2, 70.0), (3, 60.0), (9, 10.0)]);
        let previous = snap(&[(3, 65.0), (1, 75.0), (2, 70.0)]);
        let cmp = compare_snapshots(&current, &previous);

        assert_eq!(cmp.changes.len(), 3);
        assert_eq!(cmp.changes[0].change, 10.0);
        assert_eq!(cmp.changes[2].change, -5.0);
        assert_eq!(cmp.total_change, 5.0);
        assert_eq!(cmp.trend, Trend::Improved);
        assert_eq!(cmp.biggest_improvement.unwrap().id, 1);
        assert_eq!(cmp.biggest_deterioration.unwrap().id, 3);
    }

    #[test]
    fn deterioration_and_unchanged_trends() {
        let cmp = compare_snapshots(&snap(&[(1, 50.0)]), &snap(&[(1, 70.0)]));
        assert_eq!(cmp.trend, Trend::Deteriorated);

        let cmp = compare_snapshots(&snap(&[(1, 50.0), (2, 40.0)]), &snap(&[(1, 40.0), (2, 50.0)]));
        assert_eq!(cmp.trend, Trend::Unchanged);
    }

    #[test]
    fn ties_keep_first_area() {
        let cmp = compare_snapshots(&snap(&[(1, 60.0), (2, 60.0)]), &snap(&[(1, 50.0), (2, 50.0)]));
        assert_eq!(cmp.biggest_improvement.unwrap().id, 1);
        assert_eq!(cmp.biggest_deterioration.unwrap().id, 1);
    }

    #[test]
    fn disjoint_snapshots() {
        let cmp = compare_snapshots(&snap(&[(1, 60.0)]), &snap(&[(2, 50.0)]));
        assert!(cmp.changes.is_empty());
        assert_eq!(cmp.trend, Trend::Unchanged);
        assert!(cmp.biggest_improvement.is_none());
        assert!(cmp.biggest_deterioration.is_none());
    }

    #[test]
    fn area_scores_cover_every_area() {
        let scores = area_scores(&Assessment::new("Ocena", ""));
        assert_eq!(scores.len(), 34);
        assert!(scores.iter().all(|s| s.score == 0.0));
    }
}
