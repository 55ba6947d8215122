//! # API Route Modules
//!
//! - `assessments`: template, CRUD, per-requirement and per-area edits,
//!   status lifecycle and the aggregated summary.
//! - `risk`: per-assessment risk areas and chapter weights, plus the
//!   stateless factor, weighted and comparison calculators.
//! - `actions`: remedial actions attached to an assessment.
//! - `history`: change history snapshots and version comparison.
//! - `dashboard`: portfolio overview across all assessments.

pub mod actions;
pub mod assessments;
pub mod dashboard;
pub mod history;
pub mod risk;

use chrono::NaiveDate;

/// Calendar date used for due-date and history bookkeeping.
pub(crate) fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
