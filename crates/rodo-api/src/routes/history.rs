//! # Change History Endpoints
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | `GET` | `/v1/assessments/{id}/history` | `list_history` |
//! | `POST` | `/v1/assessments/{id}/history` | `record_history` |
//! | `GET` | `/v1/assessments/{id}/history/compare` | `compare_versions` |
//!
//! Recording takes a snapshot of the assessment's current scores.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use rodo_core::AssessmentId;
use rodo_state::{HistoryEntry, HistoryFilter, VersionComparison};

use crate::error::AppError;
use crate::extractors::{
    require_non_blank, Validate, ValidatedJson, ValidatedPath, ValidatedQuery,
};
use crate::routes::today;
use crate::state::AppState;

// ─── Request / response types ────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RecordHistoryRequest {
    pub user: String,
    pub description: String,
    /// Optional note per area id, attached to that area's change.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub notes: BTreeMap<u32, String>,
}

impl Validate for RecordHistoryRequest {
    fn validate(&self) -> Result<(), String> {
        require_non_blank("user", &self.user)?;
        require_non_blank("description", &self.description)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryListResponse {
    #[schema(value_type = Vec<Object>)]
    pub entries: Vec<HistoryEntry>,
    /// Distinct users across the whole history, for filter pickers.
    pub users: Vec<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CompareParams {
    /// Entry id of one side.
    pub older: u32,
    /// Entry id of the other side.
    pub newer: u32,
}

// ─── Router ──────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/assessments/{id}/history",
            get(list_history).post(record_history),
        )
        .route("/v1/assessments/{id}/history/compare", get(compare_versions))
}

// ─── Handlers ────────────────────────────────────────────────────────

/// GET /v1/assessments/{id}/history: Filtered entries, oldest first.
#[utoipa::path(
    get,
    path = "/v1/assessments/{id}/history",
    params(("id" = Uuid, Path, description = "Assessment id")),
    responses(
        (status = 200, description = "History entries", body = HistoryListResponse),
        (status = 404, description = "Unknown assessment", body = crate::error::ErrorBody),
    ),
    tag = "history"
)]
pub(crate) async fn list_history(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedQuery(filter): ValidatedQuery<HistoryFilter>,
) -> Result<Json<HistoryListResponse>, AppError> {
    let registry = state.registry.read();
    let record = registry.get(AssessmentId(id))?;
    Ok(Json(HistoryListResponse {
        entries: record.history.filter(&filter).into_iter().cloned().collect(),
        users: record.history.users().into_iter().map(str::to_string).collect(),
    }))
}

/// POST /v1/assessments/{id}/history: Record a snapshot.
#[utoipa::path(
    post,
    path = "/v1/assessments/{id}/history",
    params(("id" = Uuid, Path, description = "Assessment id")),
    request_body = RecordHistoryRequest,
    responses(
        (status = 201, description = "Entry recorded"),
        (status = 404, description = "Unknown assessment", body = crate::error::ErrorBody),
        (status = 422, description = "Missing user or description", body = crate::error::ErrorBody),
    ),
    tag = "history"
)]
pub(crate) async fn record_history(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(req): ValidatedJson<RecordHistoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut registry = state.registry.write();
    let record = registry.get_mut(AssessmentId(id))?;
    let mut snapshot = record.snapshot();
    snapshot.notes = req.notes;
    let assessment = record.id();
    let entry = record
        .history
        .record(snapshot, &req.user, &req.description, today())?;
    tracing::info!(
        %assessment,
        version = %entry.version,
        changes = entry.changes.len(),
        "history entry recorded"
    );
    Ok((StatusCode::CREATED, Json(entry.clone())))
}

/// GET /v1/assessments/{id}/history/compare?older=&newer=
#[utoipa::path(
    get,
    path = "/v1/assessments/{id}/history/compare",
    params(("id" = Uuid, Path, description = "Assessment id"), CompareParams),
    responses(
        (status = 200, description = "Version comparison"),
        (status = 404, description = "Unknown assessment or entry", body = crate::error::ErrorBody),
        (status = 422, description = "Both ids name the same entry", body = crate::error::ErrorBody),
    ),
    tag = "history"
)]
pub(crate) async fn compare_versions(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedQuery(params): ValidatedQuery<CompareParams>,
) -> Result<Json<VersionComparison>, AppError> {
    let registry = state.registry.read();
    let record = registry.get(AssessmentId(id))?;
    Ok(Json(record.history.compare(params.older, params.newer)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_request_notes_default_empty() {
        let req: RecordHistoryRequest = serde_json::from_value(serde_json::json!({
            "user": "Anna Nowak",
            "description": "Przegląd kwartalny"
        }))
        .unwrap();
        assert!(req.notes.is_empty());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn record_request_rejects_blank_user() {
        let req = RecordHistoryRequest {
            user: "".into(),
            description: "x".into(),
            notes: BTreeMap::new(),
        };
        assert!(req.validate().is_err());
    }
}
