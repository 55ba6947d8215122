//! # Dashboard Endpoint
//!
//! `GET /v1/dashboard`: portfolio overview across every stored assessment:
//! count, average progress, the POSITIVE / WARNING / NEGATIVE verdict
//! split, assessments per status and remedial action counts.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use rodo_core::AssessmentStatus;
use rodo_scoring::{summarize, AssessmentSummary, PortfolioOverview};
use rodo_state::{AssessmentRegistry, StatusCounts};

use crate::routes::today;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusBreakdown {
    pub draft: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl StatusBreakdown {
    pub fn as_pairs(&self) -> [(AssessmentStatus, usize); 3] {
        [
            (AssessmentStatus::Draft, self.draft),
            (AssessmentStatus::InProgress, self.in_progress),
            (AssessmentStatus::Completed, self.completed),
        ]
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    #[schema(value_type = Object)]
    pub overview: PortfolioOverview,
    pub statuses: StatusBreakdown,
    /// Remedial actions summed over all assessments.
    #[schema(value_type = Object)]
    pub actions: StatusCounts,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/dashboard", get(get_dashboard))
}

/// GET /v1/dashboard
#[utoipa::path(
    get,
    path = "/v1/dashboard",
    responses((status = 200, description = "Portfolio overview", body = DashboardResponse)),
    tag = "dashboard"
)]
pub(crate) async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let registry = state.registry.read();
    Json(dashboard(&registry, today()))
}

/// Aggregate the registry. Also feeds the `/metrics` gauges.
pub(crate) fn dashboard(registry: &AssessmentRegistry, today: chrono::NaiveDate) -> DashboardResponse {
    let summaries: Vec<AssessmentSummary> = registry
        .iter()
        .map(|record| summarize(&record.assessment))
        .collect();

    let mut statuses = StatusBreakdown::default();
    let mut actions = StatusCounts::default();
    for record in registry.iter() {
        match record.assessment.status {
            AssessmentStatus::Draft => statuses.draft += 1,
            AssessmentStatus::InProgress => statuses.in_progress += 1,
            AssessmentStatus::Completed => statuses.completed += 1,
        }
        let counts = record.actions.counts(today);
        actions.new += counts.new;
        actions.in_progress += counts.in_progress;
        actions.completed += counts.completed;
        actions.overdue += counts.overdue;
        actions.approaching += counts.approaching;
        actions.total += counts.total;
    }

    DashboardResponse {
        overview: PortfolioOverview::from_summaries(&summaries),
        statuses,
        actions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rodo_state::{ActionPriority, NewAction, RemedialAction};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn empty_registry() {
        let d = dashboard(&AssessmentRegistry::new(), date("2025-05-01"));
        assert_eq!(d.overview.assessments, 0);
        assert_eq!(d.statuses, StatusBreakdown::default());
        assert_eq!(d.actions.total, 0);
    }

    #[test]
    fn counts_statuses_and_actions() {
        let mut registry = AssessmentRegistry::new();
        let a = registry.create("A", "").unwrap().id();
        registry.create("B", "").unwrap();
        let record = registry.get_mut(a).unwrap();
        record
            .transition(AssessmentStatus::Completed, "done")
            .unwrap();
        let action = RemedialAction::create(
            NewAction {
                title: "Szkolenie".into(),
                description: "Szkolenie RODO dla działu HR".into(),
                priority: ActionPriority::Medium,
                due_date: Some(date("2025-04-01")),
                assignee: String::new(),
                area: String::new(),
                risk_level: None,
                gdpr_articles: Vec::new(),
            },
            date("2025-03-01"),
        )
        .unwrap();
        record.actions.insert(action);

        let d = dashboard(&registry, date("2025-05-01"));
        assert_eq!(d.overview.assessments, 2);
        assert_eq!(d.statuses.draft, 1);
        assert_eq!(d.statuses.completed, 1);
        assert_eq!(d.actions.new, 1);
        assert_eq!(d.actions.overdue, 1);
    }
}
