//! # rodo-api: HTTP Service for the RODO Assessment Stack
//!
//! Serves the in-memory assessment registry over Axum: assessment CRUD and
//! editing, progress and risk aggregation, remedial actions, change history
//! and the portfolio dashboard.
//!
//! ## Layout
//!
//! - `state`: `AppConfig` (environment) and the shared `AppState`.
//! - `auth`: optional static bearer token on `/v1/*`.
//! - `error`: `AppError` and its structured JSON body.
//! - `extractors`: `ValidatedJson<T>`.
//! - `middleware::metrics`: request metrics and registry gauges.
//! - `routes`: one module per resource.
//! - `openapi`: `/openapi.json`.
//!
//! ## Crate Policy
//!
//! - Handlers never hold the registry lock across an `.await`.
//! - No `.unwrap()` outside tests.

pub mod auth;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::header::CONTENT_TYPE;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

pub use crate::error::AppError;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) and `/metrics` are mounted outside the auth
/// middleware so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };
    let metrics = ApiMetrics::new();
    let metrics_on = state.config.metrics_enabled;

    let api = Router::new()
        .merge(routes::assessments::router())
        .merge(routes::risk::router())
        .merge(routes::actions::router())
        .merge(routes::history::router())
        .merge(routes::dashboard::router())
        .merge(openapi::router());

    // Body size limit: 2 MiB.
    let mut api = api
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(from_fn(auth::auth_middleware));

    if metrics_on {
        api = api
            .layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(Extension(metrics.clone()));
    }

    let api = api
        .layer(TraceLayer::new_for_http())
        .layer(Extension(auth_config))
        .with_state(state.clone());

    let mut unauthenticated = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    if metrics_on {
        unauthenticated = unauthenticated
            .route("/metrics", axum::routing::get(prometheus_metrics))
            .layer(Extension(metrics));
    }

    let unauthenticated = unauthenticated.with_state(state);

    Router::new().merge(unauthenticated).merge(api)
}

async fn liveness() -> &'static str {
    "ok"
}

/// The registry is in memory, so the service is ready once it can take
/// the read lock.
async fn readiness(State(state): State<AppState>) -> &'static str {
    let _registry = state.registry.read();
    "ready"
}

/// GET /metrics: Prometheus text exposition.
///
/// Registry gauges are refreshed on every scrape.
async fn prometheus_metrics(
    State(state): State<AppState>,
    Extension(metrics): Extension<ApiMetrics>,
) -> impl IntoResponse {
    let dashboard = {
        let registry = state.registry.read();
        routes::dashboard::dashboard(&registry, routes::today())
    };
    metrics.set_registry_gauges(&dashboard.statuses.as_pairs(), &dashboard.actions);
    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics.render(),
    )
}
