//! # Assessment Tree
//!
//! An assessment is an ordered list of chapters, each an ordered list of
//! areas, each a list of requirements:
//!
//! ```text
//! Assessment ──▶ Chapter* ──▶ Area* ──▶ Requirement*
//!                              │          └─ value: Option<RequirementAnswer>, comment
//!                              └─ score: Option<AreaVerdict>, comment
//! ```
//!
//! The structure is fixed at creation (copied from the template) and never
//! changes afterwards: editing only touches answers, verdicts and comments.
//! Every editing operation addresses its target by template id and bumps
//! `updated_at`.
//!
//! Bulk edits arrive as an [`AssessmentPatch`], which mirrors the tree. A
//! patch is parsed in full before anything is written, so a bad value
//! leaves the assessment untouched.

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::answer::{AreaVerdict, RequirementAnswer};
use crate::error::RodoError;
use crate::identity::{AreaId, AssessmentId, ChapterId, RequirementId};
use crate::temporal::Timestamp;
use crate::template::{rodo_template, Template};

/// Maximum length of an assessment name.
pub const MAX_NAME_LEN: usize = 255;

// ─── Status ──────────────────────────────────────────────────────────

/// Lifecycle status of an assessment.
///
/// Allowed transitions are enforced by `rodo-state`; this crate only
/// stores the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssessmentStatus {
    /// Created, nothing answered yet.
    Draft,
    /// Being filled in.
    #[serde(alias = "W TRAKCIE")]
    InProgress,
    /// Closed by the assessor.
    #[serde(alias = "ZAKOŃCZONA")]
    Completed,
}

impl AssessmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
        }
    }
}

impl std::fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssessmentStatus {
    type Err = RodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "DRAFT" => Ok(Self::Draft),
            "IN_PROGRESS" | "W TRAKCIE" => Ok(Self::InProgress),
            "COMPLETED" | "ZAKOŃCZONA" => Ok(Self::Completed),
            other => Err(RodoError::InvalidValue {
                field: "assessment status",
                value: other.to_string(),
            }),
        }
    }
}

// ─── Tree ────────────────────────────────────────────────────────────

/// A single yes/no/in-progress/not-applicable question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub id: RequirementId,
    pub text: String,
    #[serde(default)]
    pub value: Option<RequirementAnswer>,
    #[serde(default)]
    pub comment: String,
}

impl Requirement {
    /// Whether the requirement has been answered.
    pub fn is_answered(&self) -> bool {
        self.value.is_some()
    }
}

/// A grouped set of requirements with the assessor's verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    #[serde(default)]
    pub score: Option<AreaVerdict>,
    #[serde(default)]
    pub comment: String,
}

/// A chapter of the questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: ChapterId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub areas: Vec<Area>,
}

/// A complete assessment document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: AssessmentId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: AssessmentStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

impl Assessment {
    /// Shorthand for [`Assessment::from_template`].
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::from_template(name, description)
    }

    /// Create a DRAFT assessment from the built-in RODO template. All
    /// answers start empty.
    pub fn from_template(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_template(rodo_template(), name, description)
    }

    /// Create a DRAFT assessment from a custom `template`.
    pub fn with_template(
        template: &Template,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: AssessmentId::new(),
            name: name.into(),
            description: description.into(),
            status: AssessmentStatus::Draft,
            created_at: now,
            updated_at: now,
            chapters: template.instantiate(),
        }
    }

    /// Check the name and that ids are unique at every level.
    pub fn validate(&self) -> Result<(), RodoError> {
        validate_name(&self.name)?;

        let mut chapters = HashSet::new();
        let mut areas = HashSet::new();
        let mut requirements = HashSet::new();
        for chapter in &self.chapters {
            if !chapters.insert(chapter.id) {
                return Err(RodoError::Validation(format!("duplicate {}", chapter.id)));
            }
            for area in &chapter.areas {
                if !areas.insert(area.id) {
                    return Err(RodoError::Validation(format!("duplicate {}", area.id)));
                }
                for req in &area.requirements {
                    if !requirements.insert(req.id) {
                        return Err(RodoError::Validation(format!("duplicate {}", req.id)));
                    }
                }
            }
        }
        Ok(())
    }

    // ── Lookups ──────────────────────────────────────────────────────

    pub fn chapter(&self, id: ChapterId) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id == id)
    }

    pub fn area(&self, id: AreaId) -> Option<&Area> {
        self.areas().find(|a| a.id == id)
    }

    pub fn requirement(&self, id: RequirementId) -> Option<&Requirement> {
        self.requirements().find(|r| r.id == id)
    }

    /// All areas in template order.
    pub fn areas(&self) -> impl Iterator<Item = &Area> {
        self.chapters.iter().flat_map(|c| c.areas.iter())
    }

    /// All requirements in template order.
    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.areas().flat_map(|a| a.requirements.iter())
    }

    fn area_mut(&mut self, id: AreaId) -> Result<&mut Area, RodoError> {
        self.chapters
            .iter_mut()
            .flat_map(|c| c.areas.iter_mut())
            .find(|a| a.id == id)
            .ok_or_else(|| RodoError::not_found("area", id.0))
    }

    fn requirement_mut(&mut self, id: RequirementId) -> Result<&mut Requirement, RodoError> {
        self.chapters
            .iter_mut()
            .flat_map(|c| c.areas.iter_mut())
            .flat_map(|a| a.requirements.iter_mut())
            .find(|r| r.id == id)
            .ok_or_else(|| RodoError::not_found("requirement", id.0))
    }

    // ── Editing ──────────────────────────────────────────────────────

    /// Rename the assessment.
    pub fn rename(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<(), RodoError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        self.description = description.into();
        self.touch();
        Ok(())
    }

    /// Set (or clear, with `None`) the answer to a requirement.
    pub fn set_requirement_answer(
        &mut self,
        id: RequirementId,
        value: Option<RequirementAnswer>,
    ) -> Result<(), RodoError> {
        self.requirement_mut(id)?.value = value;
        self.touch();
        Ok(())
    }

    pub fn set_requirement_comment(
        &mut self,
        id: RequirementId,
        comment: impl Into<String>,
    ) -> Result<(), RodoError> {
        self.requirement_mut(id)?.comment = comment.into();
        self.touch();
        Ok(())
    }

    /// Set (or clear, with `None`) the verdict for an area.
    pub fn set_area_verdict(
        &mut self,
        id: AreaId,
        score: Option<AreaVerdict>,
    ) -> Result<(), RodoError> {
        self.area_mut(id)?.score = score;
        self.touch();
        Ok(())
    }

    pub fn set_area_comment(&mut self, id: AreaId, comment: impl Into<String>) -> Result<(), RodoError> {
        self.area_mut(id)?.comment = comment.into();
        self.touch();
        Ok(())
    }

    /// Apply a nested patch.
    ///
    /// Areas and requirements are matched by id anywhere in the tree; the
    /// chapter grouping of the patch is not significant. Entries whose id
    /// does not exist are skipped. Absent fields keep their value, an empty
    /// string clears an answer or verdict.
    pub fn apply_patch(&mut self, patch: &AssessmentPatch) -> Result<PatchOutcome, RodoError> {
        let edits = patch.to_edits()?;
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }

        let mut outcome = PatchOutcome::default();
        for edit in edits {
            let sets_answer = matches!(edit, Edit::Answer(_, Some(_)));
            let result = match edit {
                Edit::AreaScore(id, v) => self.area_mut(id).map(|a| a.score = v),
                Edit::AreaComment(id, c) => self.area_mut(id).map(|a| a.comment = c),
                Edit::Answer(id, v) => self.requirement_mut(id).map(|r| r.value = v),
                Edit::RequirementComment(id, c) => self.requirement_mut(id).map(|r| r.comment = c),
            };
            match result {
                Ok(()) => {
                    outcome.applied += 1;
                    if sets_answer {
                        outcome.answered += 1;
                    }
                }
                Err(e) => {
                    tracing::debug!(assessment = %self.id, error = %e, "skipping patch entry");
                    outcome.skipped += 1;
                }
            }
        }

        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        self.touch();
        Ok(outcome)
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

fn validate_name(name: &str) -> Result<(), RodoError> {
    if name.trim().is_empty() {
        return Err(RodoError::Validation("name must not be empty".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(RodoError::Validation(format!(
            "name must not exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

// ─── Patch ───────────────────────────────────────────────────────────

/// Nested partial update, shaped like the assessment document so that a
/// document fetched from the API can be edited and sent back as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub chapters: Vec<ChapterPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChapterPatch {
    #[serde(default)]
    pub id: Option<ChapterId>,
    #[serde(default)]
    pub areas: Vec<AreaPatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaPatch {
    pub id: AreaId,
    #[serde(default)]
    pub score: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub requirements: Vec<RequirementPatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementPatch {
    pub id: RequirementId,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Result of [`Assessment::apply_patch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchOutcome {
    /// Field writes performed.
    pub applied: usize,
    /// Entries skipped because their id does not exist.
    pub skipped: usize,
    /// Applied writes that set a requirement answer to a value.
    #[serde(default)]
    pub answered: usize,
}

enum Edit {
    AreaScore(AreaId, Option<AreaVerdict>),
    AreaComment(AreaId, String),
    Answer(RequirementId, Option<RequirementAnswer>),
    RequirementComment(RequirementId, String),
}

impl AssessmentPatch {
    fn to_edits(&self) -> Result<Vec<Edit>, RodoError> {
        let mut edits = Vec::new();
        for area in self.chapters.iter().flat_map(|c| c.areas.iter()) {
            if let Some(raw) = &area.score {
                edits.push(Edit::AreaScore(area.id, parse_optional(raw)?));
            }
            if let Some(comment) = &area.comment {
                edits.push(Edit::AreaComment(area.id, comment.clone()));
            }
            for req in &area.requirements {
                if let Some(raw) = &req.value {
                    edits.push(Edit::Answer(req.id, parse_optional(raw)?));
                }
                if let Some(comment) = &req.comment {
                    edits.push(Edit::RequirementComment(req.id, comment.clone()));
                }
            }
        }
        Ok(edits)
    }
}

/// Empty input clears the value; anything else must parse.
fn parse_optional<T>(raw: &str) -> Result<Option<T>, RodoError>
where
    T: FromStr<Err = RodoError>,
{
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        raw.parse().map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Assessment {
        Assessment::from_template("Ocena RODO - Dział IT", "IT department")
    }

    fn requirement_patch(id: u32, value: Option<&str>) -> AssessmentPatch {
        AssessmentPatch {
            chapters: vec![ChapterPatch {
                id: None,
                areas: vec![AreaPatch {
                    id: AreaId(1),
                    score: None,
                    comment: None,
                    requirements: vec![RequirementPatch {
                        id: RequirementId(id),
                        value: value.map(str::to_string),
                        comment: None,
                    }],
                }],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn new_assessment_is_blank_draft() {
        let a = fresh();
        assert_eq!(a.status, AssessmentStatus::Draft);
        assert_eq!(a.chapters.len(), 6);
        assert_eq!(a.areas().count(), 34);
        assert_eq!(a.requirements().count(), 105);
        assert!(a.requirements().all(|r| r.value.is_none()));
        assert!(a.areas().all(|area| area.score.is_none()));
        a.validate().unwrap();
    }

    #[test]
    fn set_answer_and_clear() {
        let mut a = fresh();
        a.set_requirement_answer(RequirementId(1), Some(RequirementAnswer::Yes))
            .unwrap();
        assert_eq!(
            a.requirement(RequirementId(1)).unwrap().value,
            Some(RequirementAnswer::Yes)
        );
        a.set_requirement_answer(RequirementId(1), None).unwrap();
        assert!(!a.requirement(RequirementId(1)).unwrap().is_answered());
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut a = fresh();
        let err = a
            .set_requirement_answer(RequirementId(9999), Some(RequirementAnswer::No))
            .unwrap_err();
        assert_eq!(err, RodoError::NotFound { kind: "requirement", id: 9999 });
        assert!(a.set_area_verdict(AreaId(0), None).is_err());
        assert!(a.set_area_comment(AreaId(500), "x").is_err());
    }

    #[test]
    fn verdict_and_comments() {
        let mut a = fresh();
        a.set_area_verdict(AreaId(2), Some(AreaVerdict::Warning)).unwrap();
        a.set_area_comment(AreaId(2), "Należy zaktualizować dokumentację").unwrap();
        a.set_requirement_comment(RequirementId(4), "brak polityki").unwrap();
        let area = a.area(AreaId(2)).unwrap();
        assert_eq!(area.score, Some(AreaVerdict::Warning));
        assert_eq!(area.comment, "Należy zaktualizować dokumentację");
        assert_eq!(a.requirement(RequirementId(4)).unwrap().comment, "brak polityki");
    }

    #[test]
    fn rename_validates() {
        let mut a = fresh();
        assert!(a.rename("   ", "").is_err());
        assert!(a.rename("x".repeat(MAX_NAME_LEN + 1), "").is_err());
        a.rename("Ocena HR", "kadry").unwrap();
        assert_eq!(a.name, "Ocena HR");
        assert_eq!(a.description, "kadry");
    }

    #[test]
    fn patch_sets_values_and_skips_unknown() {
        let mut a = fresh();
        let mut patch = requirement_patch(2, Some("TAK"));
        patch.chapters[0].areas[0].requirements.push(RequirementPatch {
            id: RequirementId(4242),
            value: Some("NO".to_string()),
            comment: None,
        });
        let outcome = a.apply_patch(&patch).unwrap();
        assert_eq!(
            outcome,
            PatchOutcome {
                applied: 1,
                skipped: 1,
                answered: 1
            }
        );
        assert_eq!(
            a.requirement(RequirementId(2)).unwrap().value,
            Some(RequirementAnswer::Yes)
        );
    }

    #[test]
    fn patch_empty_string_clears_and_absent_keeps() {
        let mut a = fresh();
        a.set_requirement_answer(RequirementId(3), Some(RequirementAnswer::No))
            .unwrap();
        a.apply_patch(&requirement_patch(3, None)).unwrap();
        assert_eq!(
            a.requirement(RequirementId(3)).unwrap().value,
            Some(RequirementAnswer::No)
        );
        a.apply_patch(&requirement_patch(3, Some(""))).unwrap();
        assert_eq!(a.requirement(RequirementId(3)).unwrap().value, None);
    }

    #[test]
    fn patch_with_bad_value_changes_nothing() {
        let mut a = fresh();
        let mut patch = requirement_patch(1, Some("YES"));
        patch.chapters[0].areas[0].requirements.push(RequirementPatch {
            id: RequirementId(2),
            value: Some("PERHAPS".to_string()),
            comment: None,
        });
        assert!(a.apply_patch(&patch).is_err());
        assert!(a.requirements().all(|r| r.value.is_none()));
    }

    #[test]
    fn fetched_document_roundtrips_as_patch() {
        let mut a = fresh();
        a.set_requirement_answer(RequirementId(7), Some(RequirementAnswer::InProgress))
            .unwrap();
        a.set_area_verdict(AreaId(3), Some(AreaVerdict::Negative)).unwrap();

        let doc = serde_json::to_value(&a).unwrap();
        let patch: AssessmentPatch = serde_json::from_value(doc).unwrap();

        let mut b = fresh();
        b.apply_patch(&patch).unwrap();
        assert_eq!(
            b.requirement(RequirementId(7)).unwrap().value,
            Some(RequirementAnswer::InProgress)
        );
        assert_eq!(b.area(AreaId(3)).unwrap().score, Some(AreaVerdict::Negative));
        assert_eq!(b.name, a.name);
    }

    #[test]
    fn answered_counts_only_applied_values() {
        let mut a = fresh();
        assert_eq!(a.apply_patch(&requirement_patch(1, Some("NO"))).unwrap().answered, 1);
        assert_eq!(a.apply_patch(&requirement_patch(1, Some(""))).unwrap().answered, 0);
        assert_eq!(a.apply_patch(&requirement_patch(1, None)).unwrap().answered, 0);

        let unknown = a.apply_patch(&requirement_patch(4242, Some("YES"))).unwrap();
        assert_eq!((unknown.skipped, unknown.answered), (1, 0));
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let mut a = fresh();
        let dup = a.chapters[0].areas[0].requirements[0].clone();
        a.chapters[1].areas[0].requirements.push(dup);
        assert!(a.validate().is_err());
    }

    #[test]
    fn status_parse_and_aliases() {
        assert_eq!("DRAFT".parse::<AssessmentStatus>().unwrap(), AssessmentStatus::Draft);
        assert_eq!(
            "W TRAKCIE".parse::<AssessmentStatus>().unwrap(),
            AssessmentStatus::InProgress
        );
        assert_eq!(
            serde_json::from_str::<AssessmentStatus>("\"ZAKOŃCZONA\"").unwrap(),
            AssessmentStatus::Completed
        );
        assert!("DONE".parse::<AssessmentStatus>().is_err());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn value_strategy() -> impl Strategy<Value = String> {
            prop::sample::select(vec!["", "YES", "NO", "ND", "IN_PROGRESS", "NOT_APPLICABLE"])
                .prop_map(str::to_string)
        }

        proptest! {
            /// Patches never add or remove nodes, and every edit is either
            /// applied or skipped.
            #[test]
            fn patch_preserves_structure(
                edits in prop::collection::vec((1u32..40, 1u32..130, value_strategy()), 0..30)
            ) {
                let mut a = fresh();
                let patch = AssessmentPatch {
                    chapters: vec![ChapterPatch {
                        id: None,
                        areas: edits
                            .iter()
                            .map(|(area, req, value)| AreaPatch {
                                id: AreaId(*area),
                                score: None,
                                comment: None,
                                requirements: vec![RequirementPatch {
                                    id: RequirementId(*req),
                                    value: Some(value.clone()),
                                    comment: None,
                                }],
                            })
                            .collect(),
                    }],
                    ..Default::default()
                };

                let outcome = a.apply_patch(&patch).unwrap();
                prop_assert_eq!(outcome.applied + outcome.skipped, edits.len());
                prop_assert_eq!(a.chapters.len(), 6);
                prop_assert_eq!(a.areas().count(), 34);
                prop_assert_eq!(a.requirements().count(), 105);
                prop_assert!(a.validate().is_ok());
            }
        }
    }
}
