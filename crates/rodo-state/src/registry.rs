//! # Assessment Registry
//!
//! In-memory store of assessment records. A record bundles an assessment
//! with everything hanging off it: chapter weights for the risk score,
//! remedial actions, change history, and the status transition log.
//!
//! The registry is a plain data structure; the API wraps it in a lock.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rodo_core::{
    AreaId, AreaVerdict, Assessment, AssessmentId, AssessmentPatch, AssessmentStatus,
    PatchOutcome, RequirementAnswer, RequirementId, RodoError,
};
use rodo_scoring::{area_scores, ChapterWeights, RiskAreaScore};

use crate::assessment::{self, StatusError, StatusTransitionRecord};
use crate::history::{ChangeHistory, HistoryEntry, HistoryError, HistorySnapshot};
use crate::remedial::ActionBook;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{0} not found")]
    NotFound(AssessmentId),

    #[error("{0} already exists")]
    Duplicate(AssessmentId),

    #[error(transparent)]
    Invalid(#[from] RodoError),
}

/// An assessment and the state attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub assessment: Assessment,
    #[serde(default)]
    pub weights: ChapterWeights,
    #[serde(default)]
    pub actions: ActionBook,
    #[serde(default)]
    pub history: ChangeHistory,
    #[serde(default)]
    pub transitions: Vec<StatusTransitionRecord>,
}

impl AssessmentRecord {
    pub fn new(assessment: Assessment) -> Self {
        Self {
            assessment,
            weights: ChapterWeights::new(),
            actions: ActionBook::new(),
            history: ChangeHistory::new(),
            transitions: Vec::new(),
        }
    }

    pub fn id(&self) -> AssessmentId {
        self.assessment.id
    }

    /// Set answer and, if given, comment of a requirement. A non-empty
    /// answer on a draft starts the assessment.
    pub fn answer_requirement(
        &mut self,
        id: RequirementId,
        value: Option<RequirementAnswer>,
        comment: Option<String>,
    ) -> Result<(), RodoError> {
        self.assessment.set_requirement_answer(id, value)?;
        if let Some(comment) = comment {
            self.assessment.set_requirement_comment(id, comment)?;
        }
        if value.is_some() {
            self.start_if_draft();
        }
        Ok(())
    }

    pub fn score_area(
        &mut self,
        id: AreaId,
        verdict: Option<AreaVerdict>,
        comment: Option<String>,
    ) -> Result<(), RodoError> {
        self.assessment.set_area_verdict(id, verdict)?;
        if let Some(comment) = comment {
            self.assessment.set_area_comment(id, comment)?;
        }
        Ok(())
    }

    pub fn apply_patch(&mut self, patch: &AssessmentPatch) -> Result<PatchOutcome, RodoError> {
        let outcome = self.assessment.apply_patch(patch)?;
        if outcome.answered > 0 {
            self.start_if_draft();
        }
        Ok(outcome)
    }

    pub fn transition(&mut self, to: AssessmentStatus, reason: &str) -> Result<(), StatusError> {
        let record = assessment::transition(&mut self.assessment, to, reason)?;
        self.transitions.push(record);
        Ok(())
    }

    fn start_if_draft(&mut self) {
        if let Some(record) = assessment::mark_started(&mut self.assessment) {
            self.transitions.push(record);
        }
    }

    pub fn risk(&self) -> RiskAreaScore {
        RiskAreaScore::for_assessment(&self.assessment, &self.weights)
    }

    /// Current scores, ready to be recorded in the change history.
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            overall_score: self.risk().overall,
            area_scores: area_scores(&self.assessment),
            status: self.assessment.status,
            notes: Default::default(),
        }
    }

    pub fn record_history(
        &mut self,
        user: &str,
        description: &str,
        date: NaiveDate,
    ) -> Result<&HistoryEntry, HistoryError> {
        let snapshot = self.snapshot();
        self.history.record(snapshot, user, description, date)
    }
}

#[derive(Debug, Default)]
pub struct AssessmentRegistry {
    records: HashMap<AssessmentId, AssessmentRecord>,
}

impl AssessmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a blank assessment from the built-in template.
    pub fn create(&mut self, name: &str, description: &str) -> Result<&AssessmentRecord, RegistryError> {
        let assessment = Assessment::from_template(name.trim(), description.trim());
        self.insert(assessment)
    }

    /// Store an existing assessment after validating it.
    pub fn insert(&mut self, assessment: Assessment) -> Result<&AssessmentRecord, RegistryError> {
        assessment.validate()?;
        let id = assessment.id;
        if self.records.contains_key(&id) {
            return Err(RegistryError::Duplicate(id));
        }
        tracing::info!(assessment = %id, name = %assessment.name, "assessment created");
        Ok(self
            .records
            .entry(id)
            .or_insert_with(|| AssessmentRecord::new(assessment)))
    }

    pub fn get(&self, id: AssessmentId) -> Result<&AssessmentRecord, RegistryError> {
        self.records.get(&id).ok_or(RegistryError::NotFound(id))
    }

    pub fn get_mut(&mut self, id: AssessmentId) -> Result<&mut AssessmentRecord, RegistryError> {
        self.records.get_mut(&id).ok_or(RegistryError::NotFound(id))
    }

    /// All records, newest first; ties broken by id.
    pub fn list(&self) -> Vec<&AssessmentRecord> {
        let mut records: Vec<&AssessmentRecord> = self.records.values().collect();
        records.sort_by(|a, b| {
            b.assessment
                .created_at
                .cmp(&a.assessment.created_at)
                .then_with(|| a.id().cmp(&b.id()))
        });
        records
    }

    /// Remove exactly the record with `id`.
    pub fn delete(&mut self, id: AssessmentId) -> Result<AssessmentRecord, RegistryError> {
        let record = self.records.remove(&id).ok_or(RegistryError::NotFound(id))?;
        tracing::info!(assessment = %id, "assessment deleted");
        Ok(record)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssessmentRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rodo_core::{AreaPatch, ChapterPatch, RequirementPatch, Timestamp};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn create_and_get() {
        let mut reg = AssessmentRegistry::new();
        let id = reg.create("Ocena RODO - Dział IT", "IT").unwrap().id();
        let record = reg.get(id).unwrap();
        assert_eq!(record.assessment.name, "Ocena RODO - Dział IT");
        assert_eq!(record.assessment.status, AssessmentStatus::Draft);
        assert!(record.actions.is_empty());
        assert!(record.history.is_empty());
    }

    #[test]
    fn create_rejects_blank_name() {
        let mut reg = AssessmentRegistry::new();
        assert!(matches!(
            reg.create("  ", ""),
            Err(RegistryError::Invalid(RodoError::Validation(_)))
        ));
        assert!(reg.is_empty());
    }

    #[test]
    fn insert_rejects_duplicates() {
        let mut reg = AssessmentRegistry::new();
        let a = Assessment::new("A", "");
        reg.insert(a.clone()).unwrap();
        assert_eq!(reg.insert(a.clone()).unwrap_err(), RegistryError::Duplicate(a.id));
    }

    #[test]
    fn list_is_newest_first() {
        let mut reg = AssessmentRegistry::new();
        let mut old = Assessment::new("old", "");
        old.created_at = Timestamp::parse("2025-01-01T00:00:00Z").unwrap();
        let mut new = Assessment::new("new", "");
        new.created_at = Timestamp::parse("2025-03-01T00:00:00Z").unwrap();
        reg.insert(old).unwrap();
        reg.insert(new).unwrap();
        let names: Vec<&str> = reg.list().iter().map(|r| r.assessment.name.as_str()).collect();
        assert_eq!(names, ["new", "old"]);
    }

    #[test]
    fn delete_unknown_is_error() {
        let mut reg = AssessmentRegistry::new();
        reg.create("A", "").unwrap();
        let missing = AssessmentId::new();
        assert_eq!(reg.delete(missing).unwrap_err(), RegistryError::NotFound(missing));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn answering_starts_draft() {
        let mut reg = AssessmentRegistry::new();
        let id = reg.create("A", "").unwrap().id();
        let record = reg.get_mut(id).unwrap();

        record.answer_requirement(RequirementId(1), None, Some("n/d".into())).unwrap();
        assert_eq!(record.assessment.status, AssessmentStatus::Draft);

        record
            .answer_requirement(RequirementId(1), Some(RequirementAnswer::Yes), None)
            .unwrap();
        assert_eq!(record.assessment.status, AssessmentStatus::InProgress);
        assert_eq!(record.transitions.len(), 1);
        assert_eq!(record.assessment.requirement(RequirementId(1)).unwrap().comment, "n/d");
    }

    #[test]
    fn patch_with_answers_starts_draft() {
        let mut record = AssessmentRecord::new(Assessment::new("A", ""));
        let patch = AssessmentPatch {
            chapters: vec![ChapterPatch {
                id: None,
                areas: vec![AreaPatch {
                    id: AreaId(1),
                    score: Some("POSITIVE".into()),
                    comment: None,
                    requirements: vec![RequirementPatch {
                        id: RequirementId(1),
                        value: Some("YES".into()),
                        comment: None,
                    }],
                }],
            }],
            ..Default::default()
        };
        record.apply_patch(&patch).unwrap();
        assert_eq!(record.assessment.status, AssessmentStatus::InProgress);
        assert_eq!(
            record.assessment.area(AreaId(1)).unwrap().score,
            Some(AreaVerdict::Positive)
        );
    }

    #[test]
    fn patch_with_only_unknown_answers_keeps_draft() {
        let mut record = AssessmentRecord::new(Assessment::new("A", ""));
        let patch = AssessmentPatch {
            chapters: vec![ChapterPatch {
                id: None,
                areas: vec![AreaPatch {
                    id: AreaId(9999),
                    score: None,
                    comment: None,
                    requirements: vec![RequirementPatch {
                        id: RequirementId(4242),
                        value: Some("YES".into()),
                        comment: None,
                    }],
                }],
            }],
            ..Default::default()
        };
        let outcome = record.apply_patch(&patch).unwrap();
        assert_eq!(outcome.skipped, 1);
        assert_eq!(record.assessment.status, AssessmentStatus::Draft);
        assert!(record.transitions.is_empty());
    }

    #[test]
    fn transitions_are_logged() {
        let mut record = AssessmentRecord::new(Assessment::new("A", ""));
        record.transition(AssessmentStatus::Completed, "zamknięto").unwrap();
        assert!(record.transition(AssessmentStatus::Draft, "").is_err());
        assert_eq!(record.transitions.len(), 1);
        assert_eq!(record.transitions[0].reason, "zamknięto");
    }

    #[test]
    fn history_snapshot_uses_current_scores() {
        let mut record = AssessmentRecord::new(Assessment::new("A", ""));
        record
            .answer_requirement(RequirementId(1), Some(RequirementAnswer::Yes), None)
            .unwrap();
        let entry = record
            .record_history("Jan Kowalski", "Pierwsza ocena", date("2025-04-15"))
            .unwrap();
        assert_eq!(entry.version, "1.0");
        assert_eq!(entry.area_scores.len(), 34);
        assert_eq!(entry.area_scores[0].score, 100.0);
        assert_eq!(entry.status, AssessmentStatus::InProgress);
        // chapter 1 at 100, five chapters at 0, equal weights
        assert!((entry.overall_score - 100.0 / 6.0).abs() < 1e-9);
    }

    proptest! {
        /// Deleting one record leaves exactly the others.
        #[test]
        fn delete_removes_exactly_one(count in 1usize..12, pick in 0usize..12) {
            let mut reg = AssessmentRegistry::new();
            let ids: Vec<AssessmentId> = (0..count)
                .map(|i| reg.create(&format!("Ocena {i}"), "").unwrap().id())
                .collect();
            let victim = ids[pick % count];

            reg.delete(victim).unwrap();

            prop_assert_eq!(reg.len(), count - 1);
            prop_assert!(reg.get(victim).is_err());
            for id in ids.iter().filter(|id| **id != victim) {
                prop_assert!(reg.get(*id).is_ok());
            }
        }
    }
}
