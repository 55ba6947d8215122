//! # Remedial Action Endpoints
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `GET` | `/v1/assessments/{id}/actions` | `list_actions` |
//! | `POST` | `/v1/assessments/{id}/actions` | `create_action` |
//! | `GET` | `/v1/assessments/{id}/actions/{action_id}` | `get_action` |
//! | `DELETE` | `/v1/assessments/{id}/actions/{action_id}` | `delete_action` |
//! | `POST` | `/v1/assessments/{id}/actions/{action_id}/status` | `change_action_status` |
//! | `POST` | `/v1/assessments/{id}/actions/{action_id}/comments` | `add_comment` |
//! | `POST` | `/v1/assessments/{id}/actions/{action_id}/attachments` | `add_attachment` |
//!
//! Listing accepts `status`, `priority`, `search`, `sort` (`title`,
//! `priority`, `status`, `due_date`) and `direction` (`asc`, `desc`) as
//! query parameters.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use rodo_core::{ActionId, AssessmentId};
use rodo_scoring::RiskLevel;
use rodo_state::{
    ActionError, ActionPriority, ActionQuery, ActionStatus, Attachment, Comment, NewAction,
    RemedialAction, StatusCounts,
};

use crate::error::AppError;
use crate::extractors::{
    require_non_blank, Validate, ValidatedJson, ValidatedPath, ValidatedQuery,
};
use crate::routes::today;
use crate::state::AppState;

// ─── Request / response types ────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateActionRequest {
    pub title: String,
    pub description: String,
    /// "HIGH", "MEDIUM" or "LOW".
    #[schema(value_type = String)]
    pub priority: ActionPriority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub assignee: String,
    /// Assessment area the action addresses.
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub risk_level: Option<RiskLevel>,
    #[serde(default)]
    pub gdpr_articles: Vec<String>,
}

impl Validate for CreateActionRequest {
    fn validate(&self) -> Result<(), String> {
        require_non_blank("title", &self.title)?;
        require_non_blank("description", &self.description)
    }
}

impl From<CreateActionRequest> for NewAction {
    fn from(req: CreateActionRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            priority: req.priority,
            due_date: req.due_date,
            assignee: req.assignee,
            area: req.area,
            risk_level: req.risk_level,
            gdpr_articles: req.gdpr_articles,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ActionStatusRequest {
    /// "NEW", "IN_PROGRESS" or "COMPLETED".
    #[schema(value_type = String)]
    pub status: ActionStatus,
    pub user: String,
}

impl Validate for ActionStatusRequest {
    fn validate(&self) -> Result<(), String> {
        require_non_blank("user", &self.user)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CommentRequest {
    pub text: String,
    pub user: String,
}

impl Validate for CommentRequest {
    fn validate(&self) -> Result<(), String> {
        require_non_blank("text", &self.text)?;
        require_non_blank("user", &self.user)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AttachmentRequest {
    pub name: String,
    /// File kind, e.g. "pdf" or "docx".
    #[serde(default)]
    pub kind: String,
}

impl Validate for AttachmentRequest {
    fn validate(&self) -> Result<(), String> {
        require_non_blank("name", &self.name)
    }
}

/// An action with its due-date flags evaluated for today.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActionView {
    #[schema(value_type = Object)]
    pub action: RemedialAction,
    pub days_until_due: Option<i64>,
    pub overdue: bool,
    pub approaching: bool,
}

impl ActionView {
    fn new(action: &RemedialAction, today: NaiveDate) -> Self {
        Self {
            days_until_due: action.days_until_due(today),
            overdue: action.is_overdue(today),
            approaching: action.is_approaching(today),
            action: action.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActionListResponse {
    pub actions: Vec<ActionView>,
    /// Counts over every action of the assessment, not just the matches.
    #[schema(value_type = Object)]
    pub counts: StatusCounts,
}

// ─── Router ──────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/assessments/{id}/actions",
            get(list_actions).post(create_action),
        )
        .route(
            "/v1/assessments/{id}/actions/{action_id}",
            get(get_action).delete(delete_action),
        )
        .route(
            "/v1/assessments/{id}/actions/{action_id}/status",
            post(change_action_status),
        )
        .route(
            "/v1/assessments/{id}/actions/{action_id}/comments",
            post(add_comment),
        )
        .route(
            "/v1/assessments/{id}/actions/{action_id}/attachments",
            post(add_attachment),
        )
}

// ─── Handlers ────────────────────────────────────────────────────────

/// GET /v1/assessments/{id}/actions: Filtered, sorted action list.
#[utoipa::path(
    get,
    path = "/v1/assessments/{id}/actions",
    params(("id" = Uuid, Path, description = "Assessment id")),
    responses(
        (status = 200, description = "Matching actions", body = ActionListResponse),
        (status = 404, description = "Unknown assessment", body = crate::error::ErrorBody),
    ),
    tag = "actions"
)]
pub(crate) async fn list_actions(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedQuery(query): ValidatedQuery<ActionQuery>,
) -> Result<Json<ActionListResponse>, AppError> {
    let today = today();
    let registry = state.registry.read();
    let record = registry.get(AssessmentId(id))?;
    let actions = record
        .actions
        .query(&query)
        .into_iter()
        .map(|action| ActionView::new(action, today))
        .collect();
    Ok(Json(ActionListResponse {
        actions,
        counts: record.actions.counts(today),
    }))
}

/// POST /v1/assessments/{id}/actions
#[utoipa::path(
    post,
    path = "/v1/assessments/{id}/actions",
    params(("id" = Uuid, Path, description = "Assessment id")),
    request_body = CreateActionRequest,
    responses(
        (status = 201, description = "Action created", body = ActionView),
        (status = 404, description = "Unknown assessment", body = crate::error::ErrorBody),
        (status = 422, description = "Missing title or description", body = crate::error::ErrorBody),
    ),
    tag = "actions"
)]
pub(crate) async fn create_action(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(req): ValidatedJson<CreateActionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let today = today();
    let action = RemedialAction::create(req.into(), today)?;
    let mut registry = state.registry.write();
    let record = registry.get_mut(AssessmentId(id))?;
    tracing::info!(assessment = %record.id(), action = %action.id, "remedial action created");
    let action = record.actions.insert(action);
    Ok((StatusCode::CREATED, Json(ActionView::new(action, today))))
}

/// GET /v1/assessments/{id}/actions/{action_id}
#[utoipa::path(
    get,
    path = "/v1/assessments/{id}/actions/{action_id}",
    params(
        ("id" = Uuid, Path, description = "Assessment id"),
        ("action_id" = Uuid, Path, description = "Action id"),
    ),
    responses(
        (status = 200, description = "Action", body = ActionView),
        (status = 404, description = "Unknown assessment or action", body = crate::error::ErrorBody),
    ),
    tag = "actions"
)]
pub(crate) async fn get_action(
    State(state): State<AppState>,
    ValidatedPath((id, action_id)): ValidatedPath<(Uuid, Uuid)>,
) -> Result<Json<ActionView>, AppError> {
    let registry = state.registry.read();
    let record = registry.get(AssessmentId(id))?;
    let action_id = ActionId(action_id);
    let action = record
        .actions
        .get(action_id)
        .ok_or(ActionError::NotFound(action_id))?;
    Ok(Json(ActionView::new(action, today())))
}

/// DELETE /v1/assessments/{id}/actions/{action_id}
#[utoipa::path(
    delete,
    path = "/v1/assessments/{id}/actions/{action_id}",
    params(
        ("id" = Uuid, Path, description = "Assessment id"),
        ("action_id" = Uuid, Path, description = "Action id"),
    ),
    responses(
        (status = 204, description = "Action deleted"),
        (status = 404, description = "Unknown assessment or action", body = crate::error::ErrorBody),
    ),
    tag = "actions"
)]
pub(crate) async fn delete_action(
    State(state): State<AppState>,
    ValidatedPath((id, action_id)): ValidatedPath<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let mut registry = state.registry.write();
    let record = registry.get_mut(AssessmentId(id))?;
    record.actions.remove(ActionId(action_id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/assessments/{id}/actions/{action_id}/status
#[utoipa::path(
    post,
    path = "/v1/assessments/{id}/actions/{action_id}/status",
    params(
        ("id" = Uuid, Path, description = "Assessment id"),
        ("action_id" = Uuid, Path, description = "Action id"),
    ),
    request_body = ActionStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ActionView),
        (status = 409, description = "Action already has that status", body = crate::error::ErrorBody),
    ),
    tag = "actions"
)]
pub(crate) async fn change_action_status(
    State(state): State<AppState>,
    ValidatedPath((id, action_id)): ValidatedPath<(Uuid, Uuid)>,
    ValidatedJson(req): ValidatedJson<ActionStatusRequest>,
) -> Result<Json<ActionView>, AppError> {
    let today = today();
    let mut registry = state.registry.write();
    let record = registry.get_mut(AssessmentId(id))?;
    let action = record.actions.get_mut(ActionId(action_id))?;
    action.change_status(req.status, req.user.trim(), today)?;
    Ok(Json(ActionView::new(action, today)))
}

/// POST /v1/assessments/{id}/actions/{action_id}/comments
#[utoipa::path(
    post,
    path = "/v1/assessments/{id}/actions/{action_id}/comments",
    params(
        ("id" = Uuid, Path, description = "Assessment id"),
        ("action_id" = Uuid, Path, description = "Action id"),
    ),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment added"),
        (status = 404, description = "Unknown assessment or action", body = crate::error::ErrorBody),
    ),
    tag = "actions"
)]
pub(crate) async fn add_comment(
    State(state): State<AppState>,
    ValidatedPath((id, action_id)): ValidatedPath<(Uuid, Uuid)>,
    ValidatedJson(req): ValidatedJson<CommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let mut registry = state.registry.write();
    let record = registry.get_mut(AssessmentId(id))?;
    let action = record.actions.get_mut(ActionId(action_id))?;
    let comment = action.add_comment(&req.text, req.user.trim(), today())?;
    Ok((StatusCode::CREATED, Json(comment.clone())))
}

/// POST /v1/assessments/{id}/actions/{action_id}/attachments
///
/// Records attachment metadata only; file contents are stored elsewhere.
#[utoipa::path(
    post,
    path = "/v1/assessments/{id}/actions/{action_id}/attachments",
    params(
        ("id" = Uuid, Path, description = "Assessment id"),
        ("action_id" = Uuid, Path, description = "Action id"),
    ),
    request_body = AttachmentRequest,
    responses(
        (status = 201, description = "Attachment recorded"),
        (status = 404, description = "Unknown assessment or action", body = crate::error::ErrorBody),
    ),
    tag = "actions"
)]
pub(crate) async fn add_attachment(
    State(state): State<AppState>,
    ValidatedPath((id, action_id)): ValidatedPath<(Uuid, Uuid)>,
    ValidatedJson(req): ValidatedJson<AttachmentRequest>,
) -> Result<(StatusCode, Json<Attachment>), AppError> {
    let mut registry = state.registry.write();
    let record = registry.get_mut(AssessmentId(id))?;
    let action = record.actions.get_mut(ActionId(action_id))?;
    let attachment = action.add_attachment(&req.name, &req.kind, today())?;
    Ok((StatusCode::CREATED, Json(attachment.clone())))
}
