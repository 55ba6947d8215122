//! # Questionnaire Template
//!
//! The static RODO questionnaire every assessment starts from. It is
//! embedded at compile time from `data/rodo_template.json` and parsed once
//! on first use.
//!
//! A template carries structure and wording only. [`Template::instantiate`]
//! turns it into a blank chapter tree with every answer and verdict unset.

use std::collections::HashSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::RodoError;
use crate::identity::{AreaId, ChapterId, RequirementId};
use crate::model::{Area, Chapter, Requirement};

const RODO_TEMPLATE_JSON: &str = include_str!("../data/rodo_template.json");

static RODO_TEMPLATE: OnceLock<Template> = OnceLock::new();

/// The built-in RODO questionnaire.
pub fn rodo_template() -> &'static Template {
    RODO_TEMPLATE.get_or_init(|| {
        // Compile-time constant, covered by the tests below.
        Template::from_json(RODO_TEMPLATE_JSON).expect("embedded RODO template is valid")
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub chapters: Vec<TemplateChapter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateChapter {
    pub id: ChapterId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub areas: Vec<TemplateArea>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateArea {
    pub id: AreaId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub requirements: Vec<TemplateRequirement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRequirement {
    pub id: RequirementId,
    pub text: String,
}

impl Template {
    /// Parse and validate a template document.
    pub fn from_json(json: &str) -> Result<Self, RodoError> {
        let template: Template = serde_json::from_str(json)?;
        template.validate()?;
        Ok(template)
    }

    /// Ids must be unique per level and names non-blank.
    pub fn validate(&self) -> Result<(), RodoError> {
        let mut chapters = HashSet::new();
        let mut areas = HashSet::new();
        let mut requirements = HashSet::new();

        for chapter in &self.chapters {
            if !chapters.insert(chapter.id) {
                return Err(RodoError::Validation(format!("duplicate {}", chapter.id)));
            }
            if chapter.name.trim().is_empty() {
                return Err(RodoError::Validation(format!("{} has no name", chapter.id)));
            }
            for area in &chapter.areas {
                if !areas.insert(area.id) {
                    return Err(RodoError::Validation(format!("duplicate {}", area.id)));
                }
                if area.name.trim().is_empty() {
                    return Err(RodoError::Validation(format!("{} has no name", area.id)));
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

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub fn area_count(&self) -> usize {
        self.chapters.iter().map(|c| c.areas.len()).sum()
    }

    pub fn requirement_count(&self) -> usize {
        self.chapters
            .iter()
            .flat_map(|c| c.areas.iter())
            .map(|a| a.requirements.len())
            .sum()
    }

    /// Build a blank chapter tree.
    pub fn instantiate(&self) -> Vec<Chapter> {
        self.chapters
            .iter()
            .map(|c| Chapter {
                id: c.id,
                name: c.name.clone(),
                description: c.description.clone(),
                areas: c
                    .areas
                    .iter()
                    .map(|a| Area {
                        id: a.id,
                        name: a.name.clone(),
                        description: a.description.clone(),
                        requirements: a
                            .requirements
                            .iter()
                            .map(|r| Requirement {
                                id: r.id,
                                text: r.text.clone(),
                                value: None,
                                comment: String::new(),
                            })
                            .collect(),
                        score: None,
                        comment: String::new(),
                    })
                    .collect(),
            })
            .collect()
    }
}
