//! # Identity Newtypes
//!
//! Newtype wrappers for every identifier in the stack. Assessments and
//! remedial actions are created at runtime and get random UUIDs. Chapters,
//! areas and requirements are defined by the questionnaire template and keep
//! its stable numeric ids, so answers can be matched across assessments and
//! across template revisions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentId(pub Uuid);

/// Unique identifier for a remedial action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub Uuid);

/// Template id of a chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterId(pub u32);

/// Template id of an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaId(pub u32);

/// Template id of a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementId(pub u32);

impl AssessmentId {
    /// Generate a new random assessment identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AssessmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionId {
    /// Generate a new random action identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "assessment:{}", self.0)
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "action:{}", self.0)
    }
}

impl std::fmt::Display for ChapterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chapter:{}", self.0)
    }
}

impl std::fmt::Display for AreaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "area:{}", self.0)
    }
}

impl std::fmt::Display for RequirementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "requirement:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_ids_are_unique() {
        assert_ne!(AssessmentId::new(), AssessmentId::new());
        assert_ne!(ActionId::new(), ActionId::new());
    }

    #[test]
    fn display_prefixes() {
        assert_eq!(AreaId(7).to_string(), "area:7");
        assert_eq!(RequirementId(105).to_string(), "requirement:105");
        assert_eq!(ChapterId(1).to_string(), "chapter:1");
        let id = AssessmentId::new();
        assert!(id.to_string().starts_with("assessment:"));
    }

    #[test]
    fn template_ids_serialize_as_plain_numbers() {
        assert_eq!(serde_json::to_string(&AreaId(3)).unwrap(), "3");
        let parsed: RequirementId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, RequirementId(42));
    }

    #[test]
    fn uuid_ids_serialize_as_plain_strings() {
        let id = AssessmentId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    }
}
