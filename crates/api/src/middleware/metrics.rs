//! Prometheus metrics middleware.
//!
//! HTTP request metrics plus the business counters recorded by handlers.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::services::template_save::{FallbackReason, SaveOutcome, SyncReport};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Records `http_requests_total` and `http_request_duration_seconds`.
///
/// Paths are labelled by route template so slugs and ids do not explode
/// label cardinality.
pub async fn metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = method_to_str(req.method());
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    counter!(
        "http_requests_total",
        "method" => method,
        "path" => path.clone(),
        "status" => response.status().as_u16().to_string()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(start.elapsed().as_secs_f64());

    response
}

fn method_to_str(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::PATCH => "PATCH",
        Method::HEAD => "HEAD",
        Method::OPTIONS => "OPTIONS",
        _ => "OTHER",
    }
}

fn storage_label(outcome: &SaveOutcome) -> &'static str {
    match outcome {
        SaveOutcome::Remote { .. } => "remote",
        SaveOutcome::Local { record } => match record.reason {
            FallbackReason::TableMissing => "local_table_missing",
            FallbackReason::RemoteError => "local_remote_error",
        },
    }
}

/// Counts editor saves by where they landed.
pub fn record_template_saved(outcome: &SaveOutcome) {
    counter!("templates_saved_total", "storage" => storage_label(outcome)).increment(1);
}

/// Counts saves that failed in both stores.
pub fn record_template_save_failed() {
    counter!("templates_save_failures_total").increment(1);
}

pub fn record_template_sync(report: &SyncReport) {
    counter!("templates_synced_total").increment(report.synced as u64);
    counter!("templates_sync_failures_total").increment(report.failed as u64);
    persistence::metrics::record_pending_local_templates(report.remaining);
}

pub fn record_rsvp_submitted(will_attend: bool) {
    let answer = if will_attend { "yes" } else { "no" };
    counter!("rsvps_submitted_total", "will_attend" => answer).increment(1);
}

pub fn record_invitation_viewed() {
    counter!("invitation_views_total").increment(1);
}

/// Handler for `/metrics` in Prometheus text format.
pub async fn metrics_handler() -> impl IntoResponse {
    match PROMETHEUS_HANDLE.get() {
        Some(handle) => (
            axum::http::StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            [(axum::http::header::CONTENT_TYPE, "text/plain")],
            "Metrics not initialized".to_string(),
        ),
    }
}

/// Installs the global Prometheus recorder.
///
/// A second call keeps the first recorder and returns `Ok`.
pub fn init_metrics() -> Result<(), BuildError> {
    if PROMETHEUS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .set_buckets(&[0.001, 0.005, 0.01, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0])?
        .install_recorder()?;

    let _ = PROMETHEUS_HANDLE.set(handle);
    Ok(())
}
