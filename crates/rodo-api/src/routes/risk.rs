//! # Risk Endpoints
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `GET` | `/v1/assessments/{id}/risk` | `get_assessment_risk` |
//! | `PUT` | `/v1/assessments/{id}/risk` | `set_chapter_weights` |
//! | `POST` | `/v1/risk/score` | `score_factors` |
//! | `POST` | `/v1/risk/weighted` | `score_weighted` |
//! | `POST` | `/v1/risk/compare` | `compare` |
//!
//! The `/v1/risk/*` calculators are stateless: they score what the request
//! carries and touch no stored assessment.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use rodo_core::{AssessmentId, ChapterId};
use rodo_scoring::{
    compare_snapshots, weighted_risk_score, AreaScore, ChapterWeights, RiskArea, RiskFactors,
    RiskLevel, ScoreBand, ScoreStats, SnapshotComparison,
};

use crate::error::AppError;
use crate::extractors::{Validate, ValidatedJson, ValidatedPath};
use crate::state::AppState;

// ─── Request / response types ────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssessmentRiskResponse {
    #[schema(value_type = Vec<Object>)]
    pub areas: Vec<RiskArea>,
    pub overall: f64,
    #[schema(value_type = String)]
    pub band: ScoreBand,
    /// Explicit chapter weights; chapters not listed weigh 1.0.
    #[schema(value_type = Object)]
    pub weights: ChapterWeights,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ChapterWeightsRequest {
    /// Chapter id → weight. Merged into the existing weights.
    #[schema(value_type = Object)]
    pub weights: BTreeMap<u32, f64>,
}

impl Validate for ChapterWeightsRequest {
    fn validate(&self) -> Result<(), String> {
        if self.weights.is_empty() {
            return Err("weights must not be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RiskFactorsRequest {
    /// 1..=5
    pub likelihood: u8,
    /// 1..=5
    pub impact: u8,
    /// 1..=5, 1 = strongest safeguards.
    pub controls: u8,
}

impl Validate for RiskFactorsRequest {
    fn validate(&self) -> Result<(), String> {
        self.factors().map(|_| ()).map_err(|e| e.to_string())
    }
}

impl RiskFactorsRequest {
    fn factors(&self) -> Result<RiskFactors, rodo_scoring::ScoringError> {
        RiskFactors::new(self.likelihood, self.impact, self.controls)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RiskFactorsResponse {
    pub score: u8,
    #[schema(value_type = String)]
    pub level: RiskLevel,
    pub recommendation: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct WeightedRiskRequest {
    #[schema(value_type = Vec<Object>)]
    pub areas: Vec<RiskArea>,
}

impl Validate for WeightedRiskRequest {
    fn validate(&self) -> Result<(), String> {
        for area in &self.areas {
            area.validate().map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WeightedRiskResponse {
    pub score: f64,
    #[schema(value_type = String)]
    pub band: ScoreBand,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CompareRequest {
    #[schema(value_type = Vec<Object>)]
    pub current: Vec<AreaScore>,
    #[schema(value_type = Vec<Object>)]
    pub previous: Vec<AreaScore>,
}

impl Validate for CompareRequest {
    fn validate(&self) -> Result<(), String> {
        self.current
            .iter()
            .chain(&self.previous)
            .try_for_each(AreaScore::validate)
            .map_err(|e| e.to_string())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompareResponse {
    #[schema(value_type = Object)]
    pub comparison: SnapshotComparison,
    #[schema(value_type = Object)]
    pub current_stats: ScoreStats,
    #[schema(value_type = Object)]
    pub previous_stats: ScoreStats,
}

// ─── Router ──────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/assessments/{id}/risk",
            get(get_assessment_risk).put(set_chapter_weights),
        )
        .route("/v1/risk/score", post(score_factors))
        .route("/v1/risk/weighted", post(score_weighted))
        .route("/v1/risk/compare", post(compare))
}

// ─── Handlers ────────────────────────────────────────────────────────

/// GET /v1/assessments/{id}/risk: Chapter risk areas and weighted score.
#[utoipa::path(
    get,
    path = "/v1/assessments/{id}/risk",
    params(("id" = Uuid, Path, description = "Assessment id")),
    responses(
        (status = 200, description = "Risk areas", body = AssessmentRiskResponse),
        (status = 404, description = "Unknown assessment", body = crate::error::ErrorBody),
    ),
    tag = "risk"
)]
pub(crate) async fn get_assessment_risk(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<AssessmentRiskResponse>, AppError> {
    let registry = state.registry.read();
    let record = registry.get(AssessmentId(id))?;
    Ok(Json(risk_response(record)))
}

/// PUT /v1/assessments/{id}/risk: Set chapter weights.
///
/// All weights are checked before any is stored.
#[utoipa::path(
    put,
    path = "/v1/assessments/{id}/risk",
    params(("id" = Uuid, Path, description = "Assessment id")),
    request_body = ChapterWeightsRequest,
    responses(
        (status = 200, description = "Weights stored", body = AssessmentRiskResponse),
        (status = 404, description = "Unknown assessment or chapter", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid weight", body = crate::error::ErrorBody),
    ),
    tag = "risk"
)]
pub(crate) async fn set_chapter_weights(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(req): ValidatedJson<ChapterWeightsRequest>,
) -> Result<Json<AssessmentRiskResponse>, AppError> {
    let mut registry = state.registry.write();
    let record = registry.get_mut(AssessmentId(id))?;

    let mut weights = record.weights.clone();
    for (&chapter, &weight) in &req.weights {
        let chapter = ChapterId(chapter);
        if record.assessment.chapter(chapter).is_none() {
            return Err(AppError::NotFound(format!("chapter {chapter} not found")));
        }
        weights.set(chapter, weight)?;
    }
    record.weights = weights;
    tracing::info!(assessment = %record.id(), chapters = req.weights.len(), "chapter weights updated");

    Ok(Json(risk_response(record)))
}

fn risk_response(record: &rodo_state::AssessmentRecord) -> AssessmentRiskResponse {
    let risk = record.risk();
    AssessmentRiskResponse {
        band: ScoreBand::from_score(risk.overall),
        areas: risk.areas,
        overall: risk.overall,
        weights: record.weights.clone(),
    }
}

/// POST /v1/risk/score: Likelihood × impact / controls.
#[utoipa::path(
    post,
    path = "/v1/risk/score",
    request_body = RiskFactorsRequest,
    responses(
        (status = 200, description = "Risk score", body = RiskFactorsResponse),
        (status = 422, description = "Factor outside 1..=5", body = crate::error::ErrorBody),
    ),
    tag = "risk"
)]
pub(crate) async fn score_factors(
    ValidatedJson(req): ValidatedJson<RiskFactorsRequest>,
) -> Result<Json<RiskFactorsResponse>, AppError> {
    let factors = req.factors()?;
    let level = factors.level();
    Ok(Json(RiskFactorsResponse {
        score: factors.score(),
        level,
        recommendation: level.recommendation().map(str::to_string),
    }))
}

/// POST /v1/risk/weighted: Weighted score of an explicit area list.
#[utoipa::path(
    post,
    path = "/v1/risk/weighted",
    request_body = WeightedRiskRequest,
    responses(
        (status = 200, description = "Weighted score", body = WeightedRiskResponse),
        (status = 422, description = "Invalid score or weight", body = crate::error::ErrorBody),
    ),
    tag = "risk"
)]
pub(crate) async fn score_weighted(
    ValidatedJson(req): ValidatedJson<WeightedRiskRequest>,
) -> Json<WeightedRiskResponse> {
    let score = weighted_risk_score(&req.areas);
    Json(WeightedRiskResponse {
        score,
        band: ScoreBand::from_score(score),
    })
}

/// POST /v1/risk/compare: Compare two area-score snapshots.
#[utoipa::path(
    post,
    path = "/v1/risk/compare",
    request_body = CompareRequest,
    responses((status = 200, description = "Comparison", body = CompareResponse)),
    tag = "risk"
)]
pub(crate) async fn compare(ValidatedJson(req): ValidatedJson<CompareRequest>) -> Json<CompareResponse> {
    Json(CompareResponse {
        comparison: compare_snapshots(&req.current, &req.previous),
        current_stats: ScoreStats::from_scores(&req.current),
        previous_stats: ScoreStats::from_scores(&req.previous),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_request_validation() {
        let ok = RiskFactorsRequest {
            likelihood: 5,
            impact: 5,
            controls: 1,
        };
        assert!(ok.validate().is_ok());
        let bad = RiskFactorsRequest {
            likelihood: 0,
            impact: 3,
            controls: 3,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn weighted_request_rejects_out_of_range_score() {
        let req = WeightedRiskRequest {
            areas: vec![RiskArea {
                id: 1,
                name: "Zgody".into(),
                score: 140.0,
                weight: 1.0,
            }],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn compare_request_rejects_out_of_range_score() {
        let score = |score| AreaScore {
            id: 7,
            name: "Rejestr".into(),
            score,
        };
        let ok = CompareRequest {
            current: vec![score(100.0)],
            previous: vec![score(0.0)],
        };
        assert!(ok.validate().is_ok());
        let bad = CompareRequest {
            current: vec![score(50.0)],
            previous: vec![score(101.0)],
        };
        assert_eq!(bad.validate().unwrap_err(), "area 7: score 101 outside 0..=100");
    }
}
