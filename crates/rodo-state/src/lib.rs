//! # rodo-state: Lifecycles and Records
//!
//! Everything in the stack that changes over time:
//!
//! - **Assessment lifecycle** (`assessment.rs`): `DRAFT → IN_PROGRESS →
//!   COMPLETED`, with reopening and direct completion. Every accepted
//!   transition is recorded.
//!
//! - **Remedial actions** (`remedial.rs`): corrective tasks attached to an
//!   assessment, with a `NEW → IN_PROGRESS → COMPLETED` status history,
//!   comments, attachments, deadline checks, and filter/sort queries.
//!
//! - **Change history** (`history.rs`): versioned score snapshots of an
//!   assessment, with search filters and version-to-version comparison.
//!
//! - **Registry** (`registry.rs`): the in-memory store of assessment
//!   records the API serves from.
//!
//! Calendar dates (`chrono::NaiveDate`) are passed in by the caller rather
//! than read from the clock, so deadline logic is deterministic under test.

pub mod assessment;
pub mod history;
pub mod registry;
pub mod remedial;

// ─── Lifecycle re-exports ───────────────────────────────────────────

pub use assessment::{StatusError, StatusTransitionRecord};

// ─── Remedial action re-exports ─────────────────────────────────────

pub use remedial::{
    ActionBook, ActionError, ActionPriority, ActionQuery, ActionStatus, Attachment, Comment,
    NewAction, RemedialAction, SortDirection, SortKey, StatusChange, StatusCounts,
};

// ─── History re-exports ─────────────────────────────────────────────

pub use history::{
    AreaVersionDiff, ChangeHistory, HistoryEntry, HistoryError, HistoryFilter, HistorySnapshot,
    ScoreChange, VersionComparison,
};

// ─── Registry re-exports ────────────────────────────────────────────

pub use registry::{AssessmentRecord, AssessmentRegistry, RegistryError};
