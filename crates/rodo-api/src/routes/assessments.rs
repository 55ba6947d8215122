//! # Assessment Endpoints
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `GET` | `/v1/assessments/template` | `get_template` |
//! | `GET` | `/v1/assessments` | `list_assessments` |
//! | `POST` | `/v1/assessments` | `create_assessment` |
//! | `GET` | `/v1/assessments/{id}` | `get_assessment` |
//! | `PUT` | `/v1/assessments/{id}` | `update_assessment` |
//! | `DELETE` | `/v1/assessments/{id}` | `delete_assessment` |
//! | `PUT` | `/v1/assessments/{id}/requirements/{requirement_id}` | `answer_requirement` |
//! | `PUT` | `/v1/assessments/{id}/areas/{area_id}` | `score_area` |
//! | `POST` | `/v1/assessments/{id}/status` | `transition_assessment` |
//! | `GET` | `/v1/assessments/{id}/summary` | `get_summary` |
//!
//! Single-field edits follow the same rules as the nested `PUT` patch: an
//! absent field is left alone and an empty string clears an answer or
//! verdict.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use rodo_core::{
    rodo_template, AreaId, AreaVerdict, Assessment, AssessmentId, AssessmentPatch,
    AssessmentStatus, ChapterPatch, RequirementAnswer, RequirementId, RodoError, Template,
    Timestamp,
};
use rodo_scoring::{
    assessment_compliance, assessment_progress, progress_report, summarize, AssessmentSummary,
    ProgressReport, ScoreBand,
};
use rodo_state::StatusTransitionRecord;

use crate::error::AppError;
use crate::extractors::{require_non_blank, Validate, ValidatedJson, ValidatedPath};
use crate::state::AppState;

// ─── Request / response types ────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateAssessmentRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Validate for CreateAssessmentRequest {
    fn validate(&self) -> Result<(), String> {
        require_non_blank("name", &self.name)
    }
}

/// Nested partial update, shaped like the assessment document.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAssessmentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub chapters: Vec<ChapterPatch>,
}

impl Validate for UpdateAssessmentRequest {
    fn validate(&self) -> Result<(), String> {
        match &self.name {
            Some(name) => require_non_blank("name", name),
            None => Ok(()),
        }
    }
}

impl From<UpdateAssessmentRequest> for AssessmentPatch {
    fn from(req: UpdateAssessmentRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            chapters: req.chapters,
        }
    }
}

/// Answer and/or comment for one requirement.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AnswerRequirementRequest {
    /// "YES", "NO", "IN_PROGRESS", "NOT_APPLICABLE", or "" to clear.
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Validate for AnswerRequirementRequest {
    fn validate(&self) -> Result<(), String> {
        if self.value.is_none() && self.comment.is_none() {
            return Err("at least one of value or comment is required".to_string());
        }
        Ok(())
    }
}

/// Verdict and/or comment for one area.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ScoreAreaRequest {
    /// "POSITIVE", "WARNING", "NEGATIVE", "IN_PROGRESS", "NOT_APPLICABLE", or "" to clear.
    #[serde(default)]
    pub score: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Validate for ScoreAreaRequest {
    fn validate(&self) -> Result<(), String> {
        if self.score.is_none() && self.comment.is_none() {
            return Err("at least one of score or comment is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct TransitionRequest {
    /// "DRAFT", "IN_PROGRESS" or "COMPLETED".
    #[schema(value_type = String)]
    pub status: AssessmentStatus,
    #[serde(default)]
    pub reason: String,
}

impl Validate for TransitionRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// One row of the assessment list.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssessmentListItem {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[schema(value_type = String)]
    pub status: AssessmentStatus,
    #[schema(value_type = String)]
    pub created_at: Timestamp,
    #[schema(value_type = String)]
    pub updated_at: Timestamp,
    pub answered: usize,
    pub total: usize,
    /// Rounded share of answered requirements.
    pub progress: u8,
}

impl From<&Assessment> for AssessmentListItem {
    fn from(a: &Assessment) -> Self {
        let progress = assessment_progress(a);
        Self {
            id: *a.id.as_uuid(),
            name: a.name.clone(),
            description: a.description.clone(),
            status: a.status,
            created_at: a.created_at,
            updated_at: a.updated_at,
            answered: progress.answered,
            total: progress.total,
            progress: progress.rounded_percent(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssessmentResponse {
    #[schema(value_type = Object)]
    pub assessment: Assessment,
    pub progress: u8,
    #[schema(value_type = Vec<Object>)]
    pub transitions: Vec<StatusTransitionRecord>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateAssessmentResponse {
    #[schema(value_type = Object)]
    pub assessment: Assessment,
    /// Field writes performed.
    pub applied: usize,
    /// Patch entries whose id does not exist.
    pub skipped: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SummaryResponse {
    #[schema(value_type = Object)]
    pub summary: AssessmentSummary,
    #[schema(value_type = Object)]
    pub progress: ProgressReport,
    /// YES answers over applicable answered requirements.
    pub compliance_percent: u8,
    /// Weighted risk score over chapter risk areas.
    pub weighted_risk: f64,
    #[schema(value_type = String)]
    pub risk_band: ScoreBand,
}

// ─── Router ──────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/assessments/template", get(get_template))
        .route(
            "/v1/assessments",
            get(list_assessments).post(create_assessment),
        )
        .route(
            "/v1/assessments/{id}",
            get(get_assessment)
                .put(update_assessment)
                .delete(delete_assessment),
        )
        .route(
            "/v1/assessments/{id}/requirements/{requirement_id}",
            put(answer_requirement),
        )
        .route("/v1/assessments/{id}/areas/{area_id}", put(score_area))
        .route("/v1/assessments/{id}/status", post(transition_assessment))
        .route("/v1/assessments/{id}/summary", get(get_summary))
}

// ─── Handlers ────────────────────────────────────────────────────────

/// GET /v1/assessments/template: The blank questionnaire.
#[utoipa::path(
    get,
    path = "/v1/assessments/template",
    responses((status = 200, description = "Questionnaire template")),
    tag = "assessments"
)]
pub(crate) async fn get_template() -> Json<Template> {
    Json(rodo_template().clone())
}

/// GET /v1/assessments: All assessments, newest first.
#[utoipa::path(
    get,
    path = "/v1/assessments",
    responses((status = 200, description = "Assessment list", body = Vec<AssessmentListItem>)),
    tag = "assessments"
)]
pub(crate) async fn list_assessments(State(state): State<AppState>) -> Json<Vec<AssessmentListItem>> {
    let registry = state.registry.read();
    let items = registry
        .list()
        .into_iter()
        .map(|record| AssessmentListItem::from(&record.assessment))
        .collect();
    Json(items)
}

/// POST /v1/assessments: Create a blank assessment from the template.
#[utoipa::path(
    post,
    path = "/v1/assessments",
    request_body = CreateAssessmentRequest,
    responses(
        (status = 201, description = "Assessment created", body = AssessmentResponse),
        (status = 422, description = "Invalid name", body = crate::error::ErrorBody),
    ),
    tag = "assessments"
)]
pub(crate) async fn create_assessment(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateAssessmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut registry = state.registry.write();
    let record = registry.create(&req.name, &req.description)?;
    let response = AssessmentResponse {
        assessment: record.assessment.clone(),
        progress: 0,
        transitions: Vec::new(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /v1/assessments/{id}
#[utoipa::path(
    get,
    path = "/v1/assessments/{id}",
    params(("id" = Uuid, Path, description = "Assessment id")),
    responses(
        (status = 200, description = "Assessment document", body = AssessmentResponse),
        (status = 404, description = "Unknown assessment", body = crate::error::ErrorBody),
    ),
    tag = "assessments"
)]
pub(crate) async fn get_assessment(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<AssessmentResponse>, AppError> {
    let registry = state.registry.read();
    let record = registry.get(AssessmentId(id))?;
    Ok(Json(AssessmentResponse {
        assessment: record.assessment.clone(),
        progress: assessment_progress(&record.assessment).rounded_percent(),
        transitions: record.transitions.clone(),
    }))
}

/// PUT /v1/assessments/{id}: Apply a nested patch.
#[utoipa::path(
    put,
    path = "/v1/assessments/{id}",
    params(("id" = Uuid, Path, description = "Assessment id")),
    request_body = UpdateAssessmentRequest,
    responses(
        (status = 200, description = "Patch applied", body = UpdateAssessmentResponse),
        (status = 404, description = "Unknown assessment", body = crate::error::ErrorBody),
        (status = 422, description = "Unparseable value", body = crate::error::ErrorBody),
    ),
    tag = "assessments"
)]
pub(crate) async fn update_assessment(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateAssessmentRequest>,
) -> Result<Json<UpdateAssessmentResponse>, AppError> {
    let patch = AssessmentPatch::from(req);
    let mut registry = state.registry.write();
    let record = registry.get_mut(AssessmentId(id))?;
    let outcome = record.apply_patch(&patch)?;
    tracing::info!(
        assessment = %record.id(),
        applied = outcome.applied,
        skipped = outcome.skipped,
        "assessment updated"
    );
    Ok(Json(UpdateAssessmentResponse {
        assessment: record.assessment.clone(),
        applied: outcome.applied,
        skipped: outcome.skipped,
    }))
}

/// DELETE /v1/assessments/{id}
#[utoipa::path(
    delete,
    path = "/v1/assessments/{id}",
    params(("id" = Uuid, Path, description = "Assessment id")),
    responses(
        (status = 204, description = "Assessment deleted"),
        (status = 404, description = "Unknown assessment", body = crate::error::ErrorBody),
    ),
    tag = "assessments"
)]
pub(crate) async fn delete_assessment(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.registry.write().delete(AssessmentId(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /v1/assessments/{id}/requirements/{requirement_id}
#[utoipa::path(
    put,
    path = "/v1/assessments/{id}/requirements/{requirement_id}",
    params(
        ("id" = Uuid, Path, description = "Assessment id"),
        ("requirement_id" = u32, Path, description = "Requirement id"),
    ),
    request_body = AnswerRequirementRequest,
    responses(
        (status = 200, description = "Requirement updated", body = AssessmentResponse),
        (status = 404, description = "Unknown assessment or requirement", body = crate::error::ErrorBody),
    ),
    tag = "assessments"
)]
pub(crate) async fn answer_requirement(
    State(state): State<AppState>,
    ValidatedPath((id, requirement_id)): ValidatedPath<(Uuid, u32)>,
    ValidatedJson(req): ValidatedJson<AnswerRequirementRequest>,
) -> Result<Json<AssessmentResponse>, AppError> {
    let answer: Option<Option<RequirementAnswer>> =
        req.value.as_deref().map(parse_optional).transpose()?;
    let requirement_id = RequirementId(requirement_id);

    let mut registry = state.registry.write();
    let record = registry.get_mut(AssessmentId(id))?;
    if record.assessment.requirement(requirement_id).is_none() {
        return Err(RodoError::NotFound {
            kind: "requirement",
            id: requirement_id.0,
        }
        .into());
    }

    match (answer, req.comment) {
        (Some(value), comment) => record.answer_requirement(requirement_id, value, comment)?,
        (None, Some(comment)) => record
            .assessment
            .set_requirement_comment(requirement_id, comment)?,
        (None, None) => {}
    }

    Ok(Json(AssessmentResponse {
        assessment: record.assessment.clone(),
        progress: assessment_progress(&record.assessment).rounded_percent(),
        transitions: record.transitions.clone(),
    }))
}

/// PUT /v1/assessments/{id}/areas/{area_id}
#[utoipa::path(
    put,
    path = "/v1/assessments/{id}/areas/{area_id}",
    params(
        ("id" = Uuid, Path, description = "Assessment id"),
        ("area_id" = u32, Path, description = "Area id"),
    ),
    request_body = ScoreAreaRequest,
    responses(
        (status = 200, description = "Area updated", body = AssessmentResponse),
        (status = 404, description = "Unknown assessment or area", body = crate::error::ErrorBody),
    ),
    tag = "assessments"
)]
pub(crate) async fn score_area(
    State(state): State<AppState>,
    ValidatedPath((id, area_id)): ValidatedPath<(Uuid, u32)>,
    ValidatedJson(req): ValidatedJson<ScoreAreaRequest>,
) -> Result<Json<AssessmentResponse>, AppError> {
    let verdict: Option<Option<AreaVerdict>> =
        req.score.as_deref().map(parse_optional).transpose()?;
    let area_id = AreaId(area_id);

    let mut registry = state.registry.write();
    let record = registry.get_mut(AssessmentId(id))?;
    if record.assessment.area(area_id).is_none() {
        return Err(RodoError::NotFound {
            kind: "area",
            id: area_id.0,
        }
        .into());
    }

    match (verdict, req.comment) {
        (Some(verdict), comment) => record.score_area(area_id, verdict, comment)?,
        (None, Some(comment)) => record.assessment.set_area_comment(area_id, comment)?,
        (None, None) => {}
    }

    Ok(Json(AssessmentResponse {
        assessment: record.assessment.clone(),
        progress: assessment_progress(&record.assessment).rounded_percent(),
        transitions: record.transitions.clone(),
    }))
}

/// POST /v1/assessments/{id}/status: Lifecycle transition.
#[utoipa::path(
    post,
    path = "/v1/assessments/{id}/status",
    params(("id" = Uuid, Path, description = "Assessment id")),
    request_body = TransitionRequest,
    responses(
        (status = 200, description = "Status changed", body = AssessmentResponse),
        (status = 409, description = "Transition not allowed", body = crate::error::ErrorBody),
    ),
    tag = "assessments"
)]
pub(crate) async fn transition_assessment(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(req): ValidatedJson<TransitionRequest>,
) -> Result<Json<AssessmentResponse>, AppError> {
    let mut registry = state.registry.write();
    let record = registry.get_mut(AssessmentId(id))?;
    record.transition(req.status, &req.reason)?;
    Ok(Json(AssessmentResponse {
        assessment: record.assessment.clone(),
        progress: assessment_progress(&record.assessment).rounded_percent(),
        transitions: record.transitions.clone(),
    }))
}

/// GET /v1/assessments/{id}/summary: Progress, tallies, compliance and risk.
#[utoipa::path(
    get,
    path = "/v1/assessments/{id}/summary",
    params(("id" = Uuid, Path, description = "Assessment id")),
    responses(
        (status = 200, description = "Aggregated summary", body = SummaryResponse),
        (status = 404, description = "Unknown assessment", body = crate::error::ErrorBody),
    ),
    tag = "assessments"
)]
pub(crate) async fn get_summary(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> Result<Json<SummaryResponse>, AppError> {
    let registry = state.registry.read();
    let record = registry.get(AssessmentId(id))?;
    let weighted_risk = record.risk().overall;
    Ok(Json(SummaryResponse {
        summary: summarize(&record.assessment),
        progress: progress_report(&record.assessment),
        compliance_percent: assessment_compliance(&record.assessment).rounded_percent(),
        weighted_risk,
        risk_band: ScoreBand::from_score(weighted_risk),
    }))
}

/// Empty input clears; anything else must parse.
fn parse_optional<T>(raw: &str) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr<Err = RodoError>,
{
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        raw.parse().map(Some).map_err(AppError::from)
    }
}
