//! # rodo-scoring: Assessment Aggregator
//!
//! Pure, deterministic functions over the assessment tree. Nothing here
//! mutates its input or touches I/O; every percentage guards its
//! denominator and yields 0 instead of NaN.
//!
//! - **Progress** (`progress.rs`): answered / total requirements per area,
//!   chapter and assessment, with half-up rounding and progress bands.
//! - **Summary** (`summary.rs`): tallies of area verdicts and requirement
//!   answers.
//! - **Compliance** (`compliance.rs`): share of YES among applicable
//!   answered requirements.
//! - **Risk** (`risk.rs`): validated risk areas, the weighted overall
//!   score Σ(score×weight)/Σ(weight), per-chapter weights, and the
//!   likelihood × impact / controls factor score.
//! - **Bands** (`band.rs`): GOOD / FAIR / POOR classification of scores.
//! - **Comparison** (`comparison.rs`): statistics over area scores and
//!   the diff between two score snapshots.
//! - **Overview** (`overview.rs`): verdict distribution across many
//!   assessments.
//!
//! ## Crate Policy
//!
//! - Depends only on `rodo-core` internally.
//! - No floating-point result is ever NaN or infinite.

pub mod band;
pub mod comparison;
pub mod compliance;
pub mod error;
pub mod overview;
pub mod progress;
pub mod risk;
pub mod summary;

pub use band::ScoreBand;
pub use comparison::{
    area_scores, compare_snapshots, AreaChange, AreaScore, ScoreStats, SnapshotComparison, Trend,
};
pub use compliance::{area_compliance, assessment_compliance, chapter_compliance, Compliance};
pub use error::ScoringError;
pub use overview::PortfolioOverview;
pub use progress::{
    area_progress, assessment_progress, chapter_progress, progress_report, Progress,
    ProgressBand, ProgressReport,
};
pub use risk::{
    risk_areas_from_assessment, weighted_risk_score, ChapterWeights, RiskAreaScore, RiskArea,
    RiskFactors, RiskLevel,
};
pub use summary::{summarize, AnswerTally, AssessmentSummary, VerdictTally};
