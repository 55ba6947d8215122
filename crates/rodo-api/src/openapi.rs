//! # OpenAPI Specification Assembly
//!
//! Collects every utoipa-documented route into one OpenAPI document served
//! at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Adds the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Static bearer token. Set via RODO_AUTH_TOKEN."))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "RODO Assessment API",
        description = "GDPR (RODO) compliance self-assessment service.\n\nProvides:\n- **Assessments** created from the built-in questionnaire, edited per requirement and per area\n- **Aggregation**: progress, verdict and answer tallies, compliance percentage\n- **Risk**: weighted chapter risk, factor-based risk score, snapshot comparison\n- **Remedial actions** with status history, comments and attachments\n- **Change history** with versioned snapshots and version comparison\n\nAll `/v1/*` endpoints require `Authorization: Bearer <token>` when a token is configured. Health probes are unauthenticated."
    ),
    servers((url = "http://localhost:8080", description = "Local development server")),
    security(("bearer_auth" = [])),
    paths(
        // ── Assessments ──────────────────────────────────────────────
        crate::routes::assessments::get_template,
        crate::routes::assessments::list_assessments,
        crate::routes::assessments::create_assessment,
        crate::routes::assessments::get_assessment,
        crate::routes::assessments::update_assessment,
        crate::routes::assessments::delete_assessment,
        crate::routes::assessments::answer_requirement,
        crate::routes::assessments::score_area,
        crate::routes::assessments::transition_assessment,
        crate::routes::assessments::get_summary,
        // ── Risk ─────────────────────────────────────────────────────
        crate::routes::risk::get_assessment_risk,
        crate::routes::risk::set_chapter_weights,
        crate::routes::risk::score_factors,
        crate::routes::risk::score_weighted,
        crate::routes::risk::compare,
        // ── Remedial actions ─────────────────────────────────────────
        crate::routes::actions::list_actions,
        crate::routes::actions::create_action,
        crate::routes::actions::get_action,
        crate::routes::actions::delete_action,
        crate::routes::actions::change_action_status,
        crate::routes::actions::add_comment,
        crate::routes::actions::add_attachment,
        // ── History ──────────────────────────────────────────────────
        crate::routes::history::list_history,
        crate::routes::history::record_history,
        crate::routes::history::compare_versions,
        // ── Dashboard ────────────────────────────────────────────────
        crate::routes::dashboard::get_dashboard,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::assessments::CreateAssessmentRequest,
        crate::routes::assessments::UpdateAssessmentRequest,
        crate::routes::assessments::AnswerRequirementRequest,
        crate::routes::assessments::ScoreAreaRequest,
        crate::routes::assessments::TransitionRequest,
        crate::routes::assessments::AssessmentListItem,
        crate::routes::assessments::AssessmentResponse,
        crate::routes::assessments::UpdateAssessmentResponse,
        crate::routes::assessments::SummaryResponse,
        crate::routes::risk::AssessmentRiskResponse,
        crate::routes::risk::ChapterWeightsRequest,
        crate::routes::risk::RiskFactorsRequest,
        crate::routes::risk::RiskFactorsResponse,
        crate::routes::risk::WeightedRiskRequest,
        crate::routes::risk::WeightedRiskResponse,
        crate::routes::risk::CompareRequest,
        crate::routes::risk::CompareResponse,
        crate::routes::actions::CreateActionRequest,
        crate::routes::actions::ActionStatusRequest,
        crate::routes::actions::CommentRequest,
        crate::routes::actions::AttachmentRequest,
        crate::routes::actions::ActionView,
        crate::routes::actions::ActionListResponse,
        crate::routes::history::RecordHistoryRequest,
        crate::routes::history::HistoryListResponse,
        crate::routes::dashboard::StatusBreakdown,
        crate::routes::dashboard::DashboardResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "assessments", description = "Assessment documents and aggregation"),
        (name = "risk", description = "Risk scoring"),
        (name = "actions", description = "Remedial actions"),
        (name = "history", description = "Change history"),
        (name = "dashboard", description = "Portfolio overview"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_route_group() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/v1/assessments",
            "/v1/assessments/{id}/summary",
            "/v1/risk/score",
            "/v1/assessments/{id}/actions",
            "/v1/assessments/{id}/history/compare",
            "/v1/dashboard",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected}"
            );
        }
    }

    #[test]
    fn spec_has_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
