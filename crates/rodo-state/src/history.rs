//! # Change History
//!
//! A versioned log of score snapshots for one assessment. Each entry
//! records who took the snapshot, when, the overall and per-area scores,
//! and which areas changed since the previous entry.
//!
//! Versions start at `1.0`; every later entry bumps the minor number
//! (`1.1`, `1.2`, ...). Entry ids are sequential from 1 and entries are
//! never removed, so a higher id is always a newer entry.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rodo_core::AssessmentStatus;
use rodo_scoring::AreaScore;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("history entry {0} not found")]
    EntryNotFound(u32),

    /// Both sides of a comparison are the same entry.
    #[error("cannot compare history entry {0} with itself")]
    SameEntry(u32),
}

/// Scores of an assessment at the moment a history entry is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub overall_score: f64,
    pub area_scores: Vec<AreaScore>,
    pub status: AssessmentStatus,
    /// Optional note per area id, attached to that area's change.
    #[serde(default)]
    pub notes: BTreeMap<u32, String>,
}

/// An area whose score differs from the previous entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreChange {
    pub area: String,
    /// `None` when the area was not in the previous entry.
    pub old_score: Option<f64>,
    pub new_score: f64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: u32,
    pub date: NaiveDate,
    pub user: String,
    pub version: String,
    pub description: String,
    pub overall_score: f64,
    pub area_scores: Vec<AreaScore>,
    pub changes: Vec<ScoreChange>,
    pub status: AssessmentStatus,
}

impl HistoryEntry {
    fn score_of(&self, area: &str) -> Option<f64> {
        self.area_scores
            .iter()
            .find(|s| s.name == area)
            .map(|s| s.score)
    }

    fn mentions(&self, term: &str) -> bool {
        let hit = |s: &str| s.to_lowercase().contains(term);
        hit(&self.description)
            || hit(&self.version)
            || hit(&self.user)
            || self
                .changes
                .iter()
                .any(|c| hit(&c.area) || hit(&c.description))
    }
}

// ─── Filter ──────────────────────────────────────────────────────────

/// Entry filter. Unset fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFilter {
    /// Case-insensitive substring of description, version, user, or any
    /// change's area name or description.
    #[serde(default)]
    pub search: Option<String>,
    /// Entries dated on or after this day.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Exact user name.
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub status: Option<AssessmentStatus>,
}

impl HistoryFilter {
    pub fn matches(&self, entry: &HistoryEntry) -> bool {
        if let Some(term) = self.search.as_deref().map(str::trim) {
            if !term.is_empty() && !entry.mentions(&term.to_lowercase()) {
                return false;
            }
        }
        if self.from.is_some_and(|from| entry.date < from) {
            return false;
        }
        if let Some(user) = self.user.as_deref() {
            if !user.is_empty() && entry.user != user {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != entry.status) {
            return false;
        }
        true
    }
}

// ─── Comparison ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaVersionDiff {
    pub area: String,
    pub older_score: Option<f64>,
    pub newer_score: Option<f64>,
    /// Set only when both scores are present.
    pub difference: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionComparison {
    pub older: HistoryEntry,
    pub newer: HistoryEntry,
    /// Union of both entries' areas: older entry's order first, then
    /// areas only the newer entry has.
    pub areas: Vec<AreaVersionDiff>,
    pub overall_difference: f64,
}

// ─── History ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeHistory {
    entries: Vec<HistoryEntry>,
}

impl ChangeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry for `snapshot`.
    pub fn record(
        &mut self,
        snapshot: HistorySnapshot,
        user: &str,
        description: &str,
        date: NaiveDate,
    ) -> Result<&HistoryEntry, HistoryError> {
        if user.trim().is_empty() {
            return Err(HistoryError::Validation("user must not be empty".to_string()));
        }
        if description.trim().is_empty() {
            return Err(HistoryError::Validation(
                "description must not be empty".to_string(),
            ));
        }

        let previous = self.entries.last();
        let changes = diff_scores(previous, &snapshot);
        let version = next_version(previous.map(|e| e.version.as_str()));
        let id = previous.map_or(1, |e| e.id + 1);

        tracing::debug!(entry = id, %version, changes = changes.len(), "history entry recorded");

        self.entries.push(HistoryEntry {
            id,
            date,
            user: user.trim().to_string(),
            version,
            description: description.trim().to_string(),
            overall_score: snapshot.overall_score,
            area_scores: snapshot.area_scores,
            changes,
            status: snapshot.status,
        });
        Ok(&self.entries[self.entries.len() - 1])
    }

    pub fn get(&self, id: u32) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn filter(&self, filter: &HistoryFilter) -> Vec<&HistoryEntry> {
        self.entries.iter().filter(|e| filter.matches(e)).collect()
    }

    /// Distinct users in the order they first appear.
    pub fn users(&self) -> Vec<&str> {
        let mut users: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !users.contains(&entry.user.as_str()) {
                users.push(&entry.user);
            }
        }
        users
    }

    /// Compare two entries. The arguments may come in either order.
    pub fn compare(&self, a: u32, b: u32) -> Result<VersionComparison, HistoryError> {
        if a == b {
            return Err(HistoryError::SameEntry(a));
        }
        let (older_id, newer_id) = if a < b { (a, b) } else { (b, a) };
        let older = self.get(older_id).ok_or(HistoryError::EntryNotFound(older_id))?;
        let newer = self.get(newer_id).ok_or(HistoryError::EntryNotFound(newer_id))?;

        let mut names: Vec<&str> = older.area_scores.iter().map(|s| s.name.as_str()).collect();
        for score in &newer.area_scores {
            if !names.contains(&score.name.as_str()) {
                names.push(&score.name);
            }
        }

        let areas = names
            .into_iter()
            .map(|name| {
                let older_score = older.score_of(name);
                let newer_score = newer.score_of(name);
                AreaVersionDiff {
                    area: name.to_string(),
                    older_score,
                    newer_score,
                    difference: older_score.zip(newer_score).map(|(o, n)| n - o),
                }
            })
            .collect();

        Ok(VersionComparison {
            older: older.clone(),
            newer: newer.clone(),
            areas,
            overall_difference: newer.overall_score - older.overall_score,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn diff_scores(previous: Option<&HistoryEntry>, snapshot: &HistorySnapshot) -> Vec<ScoreChange> {
    let Some(previous) = previous else {
        return Vec::new();
    };
    snapshot
        .area_scores
        .iter()
        .filter_map(|score| {
            let old = previous
                .area_scores
                .iter()
                .find(|p| p.id == score.id)
                .map(|p| p.score);
            if old == Some(score.score) {
                return None;
            }
            Some(ScoreChange {
                area: score.name.clone(),
                old_score: old,
                new_score: score.score,
                description: snapshot.notes.get(&score.id).cloned().unwrap_or_default(),
            })
        })
        .collect()
}

/// `1.0` first, then the previous version with its minor number bumped.
fn next_version(previous: Option<&str>) -> String {
    let Some(previous) = previous else {
        return "1.0".to_string();
    };
    let (major, minor) = previous.split_once('.').unwrap_or((previous, "0"));
    let major: u32 = major.parse().unwrap_or(1);
    let minor: u32 = minor.parse().unwrap_or(0);
    format!("{major}.{}", minor + 1)
}
