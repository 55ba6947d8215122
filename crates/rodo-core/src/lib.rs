//! # rodo-core: Foundational Types for the RODO Assessment Stack
//!
//! Defines the types every other crate in the workspace builds on. It
//! depends on nothing internal.
//!
//! ## Contents
//!
//! - **Identifiers** (`identity.rs`): `AssessmentId` and `ActionId` wrap
//!   UUIDs; `ChapterId`, `AreaId` and `RequirementId` wrap the numeric ids
//!   of the questionnaire template. You cannot pass an `AreaId` where a
//!   `RequirementId` is expected.
//!
//! - **Answers** (`answer.rs`): `RequirementAnswer` (YES / NO / IN_PROGRESS /
//!   NOT_APPLICABLE) and `AreaVerdict` (POSITIVE / WARNING / NEGATIVE /
//!   IN_PROGRESS / NOT_APPLICABLE). One definition each, exhaustive `match`
//!   everywhere.
//!
//! - **Time** (`temporal.rs`): `Timestamp`, UTC-only with seconds precision.
//!
//! - **Model** (`model.rs`): the three-level assessment tree
//!   (chapter → area → requirement) and its in-place editing operations.
//!
//! - **Template** (`template.rs`): the static RODO questionnaire every new
//!   assessment is created from.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `rodo-*` crates.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.

pub mod answer;
pub mod error;
pub mod identity;
pub mod model;
pub mod temporal;
pub mod template;

pub use answer::{AreaVerdict, RequirementAnswer};
pub use error::RodoError;
pub use identity::{ActionId, AreaId, AssessmentId, ChapterId, RequirementId};
pub use model::{
    AreaPatch, Assessment, AssessmentPatch, AssessmentStatus, Chapter, ChapterPatch, Area,
    PatchOutcome, Requirement, RequirementPatch,
};
pub use temporal::Timestamp;
pub use template::{rodo_template, Template};
