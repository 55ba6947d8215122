//! # Request Metrics
//!
//! Each app instance owns its own Prometheus recorder, so several routers
//! (tests, mostly) never share counters. Recording goes through the
//! `metrics` facade scoped to that recorder with
//! [`metrics::with_local_recorder`].
//!
//! ## Metrics
//!
//! | Name | Kind | Labels |
//! |------|------|--------|
//! | `rodo_http_requests_total` | counter | method, path, status |
//! | `rodo_http_request_duration_seconds` | histogram | method, path |
//! | `rodo_assessments` | gauge | status |
//! | `rodo_remedial_actions` | gauge | status |
//! | `rodo_remedial_actions_overdue` | gauge | |
//!
//! The `path` label is the matched route template, or `unmatched`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusRecorder};

use rodo_core::AssessmentStatus;
use rodo_state::StatusCounts;

struct Inner {
    recorder: PrometheusRecorder,
    requests: AtomicU64,
    errors: AtomicU64,
}

/// Metrics for one app instance. Clones share the same recorder.
#[derive(Clone)]
pub struct ApiMetrics {
    inner: Arc<Inner>,
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiMetrics {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                recorder: PrometheusBuilder::new().build_recorder(),
                requests: AtomicU64::new(0),
                errors: AtomicU64::new(0),
            }),
        }
    }

    /// Requests recorded so far.
    pub fn requests(&self) -> u64 {
        self.inner.requests.load(Ordering::Relaxed)
    }

    /// Requests that ended with a 4xx or 5xx status.
    pub fn errors(&self) -> u64 {
        self.inner.errors.load(Ordering::Relaxed)
    }

    pub fn record_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        self.inner.requests.fetch_add(1, Ordering::Relaxed);
        if status >= 400 {
            self.inner.errors.fetch_add(1, Ordering::Relaxed);
        }
        metrics::with_local_recorder(&self.inner.recorder, || {
            metrics::counter!(
                "rodo_http_requests_total",
                "method" => method.to_string(),
                "path" => path.to_string(),
                "status" => status.to_string()
            )
            .increment(1);
            metrics::histogram!(
                "rodo_http_request_duration_seconds",
                "method" => method.to_string(),
                "path" => path.to_string()
            )
            .record(duration_secs);
        });
    }

    /// Refresh the registry gauges.
    pub fn set_registry_gauges(
        &self,
        assessments: &[(AssessmentStatus, usize)],
        actions: &StatusCounts,
    ) {
        metrics::with_local_recorder(&self.inner.recorder, || {
            for (status, count) in assessments {
                metrics::gauge!("rodo_assessments", "status" => status.as_str()).set(*count as f64);
            }
            for (status, count) in [
                ("NEW", actions.new),
                ("IN_PROGRESS", actions.in_progress),
                ("COMPLETED", actions.completed),
            ] {
                metrics::gauge!("rodo_remedial_actions", "status" => status).set(count as f64);
            }
            metrics::gauge!("rodo_remedial_actions_overdue").set(actions.overdue as f64);
        });
    }

    /// Prometheus text exposition of everything recorded so far.
    pub fn render(&self) -> String {
        self.inner.recorder.handle().render()
    }
}

/// Path label for requests that matched no route.
pub const UNMATCHED_PATH: &str = "unmatched";

/// Route template of the request, e.g. `/v1/assessments/{id}`. Raw paths
/// never become label values, so the series count is bounded by the
/// route table.
fn path_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH.to_string())
}

/// Record method, route template, status and latency of every request.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();
    let method = request.method().to_string();
    let path = path_label(&request);
    let start = Instant::now();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        let duration = start.elapsed().as_secs_f64();
        m.record_request(&method, &path, response.status().as_u16(), duration);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_metrics_new_starts_at_zero() {
        let m = ApiMetrics::new();
        assert_eq!(m.requests(), 0);
        assert_eq!(m.errors(), 0);
    }

    #[test]
    fn errors_count_client_and_server_failures() {
        let m = ApiMetrics::new();
        m.record_request("GET", "/v1/assessments", 200, 0.01);
        m.record_request("GET", "/v1/assessments/{id}", 404, 0.01);
        m.record_request("POST", "/v1/assessments", 500, 0.2);
        assert_eq!(m.requests(), 3);
        assert_eq!(m.errors(), 2);
    }

    #[test]
    fn clones_share_counters() {
        let m = ApiMetrics::new();
        let other = m.clone();
        other.record_request("GET", "/x", 200, 0.0);
        assert_eq!(m.requests(), 1);
    }

    #[test]
    fn instances_are_isolated() {
        let a = ApiMetrics::new();
        let b = ApiMetrics::new();
        a.record_request("GET", "/only-a", 200, 0.0);
        assert!(a.render().contains("rodo_http_requests_total"));
        assert!(!b.render().contains("/only-a"));
    }

    #[test]
    fn render_includes_registry_gauges() {
        let m = ApiMetrics::new();
        let actions = StatusCounts {
            new: 2,
            overdue: 1,
            total: 2,
            ..Default::default()
        };
        m.set_registry_gauges(&[(AssessmentStatus::Draft, 3)], &actions);
        let output = m.render();
        assert!(output.contains("rodo_assessments"));
        assert!(output.contains("status=\"DRAFT\""));
        assert!(output.contains("rodo_remedial_actions_overdue"));
    }

    fn routed_app(metrics: &ApiMetrics) -> axum::Router {
        use axum::routing::put;
        axum::Router::new()
            .route(
                "/v1/assessments/{id}/requirements/{requirement_id}",
                put(|| async { axum::http::StatusCode::NOT_FOUND }),
            )
            .layer(axum::middleware::from_fn(metrics_middleware))
            .layer(axum::Extension(metrics.clone()))
    }

    async fn put(app: &axum::Router, uri: &str) {
        use tower::ServiceExt;
        let request = Request::builder()
            .method("PUT")
            .uri(uri)
            .body(axum::body::Body::empty())
            .unwrap();
        app.clone().oneshot(request).await.unwrap();
    }

    #[tokio::test]
    async fn path_label_is_the_route_template() {
        let m = ApiMetrics::new();
        let app = routed_app(&m);
        let id = "550e8400-e29b-41d4-a716-446655440000";
        for requirement in 1000..1050 {
            put(&app, &format!("/v1/assessments/{id}/requirements/{requirement}")).await;
        }
        put(&app, "/no/such/route/1").await;
        put(&app, "/no/such/route/2").await;
        assert_eq!(m.requests(), 52);

        let output = m.render();
        let series = output
            .lines()
            .filter(|line| line.starts_with("rodo_http_requests_total{"))
            .count();
        assert_eq!(series, 2);
        assert!(output.contains("path=\"/v1/assessments/{id}/requirements/{requirement_id}\""));
        assert!(output.contains("path=\"unmatched\""));
        assert!(!output.contains(id));
        assert!(!output.contains("1049"));
    }
}
