//! # Assessment Status Lifecycle
//!
//! ```text
//! Draft ──▶ InProgress ──▶ Completed
//!   │           ▲              │
//!   │           └── reopen ────┘
//!   └──────────────────────────▶ Completed
//! ```
//!
//! Nothing returns to `Draft`, and a transition to the current status is
//! rejected. The first answer given on a draft moves it to `InProgress`
//! implicitly (see [`mark_started`]).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use rodo_core::{Assessment, AssessmentStatus, Timestamp};

// ─── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatusError {
    /// Attempted transition is not allowed from the current status.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status.
        from: AssessmentStatus,
        /// Attempted target status.
        to: AssessmentStatus,
    },
}

// ─── Transition record ───────────────────────────────────────────────

/// Record of an accepted status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransitionRecord {
    pub from_status: AssessmentStatus,
    pub to_status: AssessmentStatus,
    pub timestamp: Timestamp,
    /// Why the transition happened.
    pub reason: String,
}

/// Statuses reachable from `from` in one step.
pub fn allowed_transitions(from: AssessmentStatus) -> &'static [AssessmentStatus] {
    match from {
        AssessmentStatus::Draft => &[AssessmentStatus::InProgress, AssessmentStatus::Completed],
        AssessmentStatus::InProgress => &[AssessmentStatus::Completed],
        AssessmentStatus::Completed => &[AssessmentStatus::InProgress],
    }
}

pub fn can_transition(from: AssessmentStatus, to: AssessmentStatus) -> bool {
    allowed_transitions(from).contains(&to)
}

/// Move `assessment` to `to`, or fail without touching it.
pub fn transition(
    assessment: &mut Assessment,
    to: AssessmentStatus,
    reason: &str,
) -> Result<StatusTransitionRecord, StatusError> {
    let from = assessment.status;
    if !can_transition(from, to) {
        return Err(StatusError::InvalidTransition { from, to });
    }
    Ok(do_transition(assessment, to, reason))
}

/// Move a draft to `InProgress`. Returns `None` for any other status.
pub fn mark_started(assessment: &mut Assessment) -> Option<StatusTransitionRecord> {
    if assessment.status != AssessmentStatus::Draft {
        return None;
    }
    Some(do_transition(
        assessment,
        AssessmentStatus::InProgress,
        "first answer recorded",
    ))
}

fn do_transition(
    assessment: &mut Assessment,
    to: AssessmentStatus,
    reason: &str,
) -> StatusTransitionRecord {
    let record = StatusTransitionRecord {
        from_status: assessment.status,
        to_status: to,
        timestamp: Timestamp::now(),
        reason: reason.to_string(),
    };
    tracing::info!(
        assessment = %assessment.id,
        from = %record.from_status,
        to = %to,
        "assessment status changed"
    );
    assessment.status = to;
    assessment.updated_at = record.timestamp;
    record
}
