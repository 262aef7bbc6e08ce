use actix_web::{http::StatusCode, HttpResponse};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static CLIENT_ERROR_COUNT: AtomicU64 = AtomicU64::new(0);
static SERVER_ERROR_COUNT: AtomicU64 = AtomicU64::new(0);

pub fn increment_request_count() {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
}

/// Counts a failed request under its status class. Requests that never
/// produced a response count as server errors.
pub fn increment_error_count(status: Option<StatusCode>) {
    match status {
        Some(status) if status.is_client_error() => CLIENT_ERROR_COUNT.fetch_add(1, Ordering::Relaxed),
        _ => SERVER_ERROR_COUNT.fetch_add(1, Ordering::Relaxed),
    };
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MetricsResponse {
    pub http_requests_total: u64,
    pub http_client_errors_total: u64,
    pub http_server_errors_total: u64,
}

fn snapshot() -> MetricsResponse {
    MetricsResponse {
        http_requests_total: REQUEST_COUNT.load(Ordering::Relaxed),
        http_client_errors_total: CLIENT_ERROR_COUNT.load(Ordering::Relaxed),
        http_server_errors_total: SERVER_ERROR_COUNT.load(Ordering::Relaxed),
    }
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Request counters in Prometheus text format", body = String, content_type = "text/plain")
    )
)]
pub async fn get_metrics() -> HttpResponse {
    let metrics = snapshot();

    let body = format!(
        "# HELP http_requests_total Total number of HTTP requests\n\
         # TYPE http_requests_total counter\n\
         http_requests_total {}\n\
         \n\
         # HELP http_errors_total Total number of failed HTTP requests\n\
         # TYPE http_errors_total counter\n\
         http_errors_total{{class=\"4xx\"}} {}\n\
         http_errors_total{{class=\"5xx\"}} {}\n",
        metrics.http_requests_total, metrics.http_client_errors_total, metrics.http_server_errors_total
    );

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_split_by_class() {
        let before = snapshot();

        increment_request_count();
        increment_error_count(Some(StatusCode::NOT_FOUND));
        increment_error_count(Some(StatusCode::INTERNAL_SERVER_ERROR));
        increment_error_count(None);

        // Counters are process-wide and other tests may bump them concurrently.
        let after = snapshot();
        assert!(after.http_requests_total >= before.http_requests_total + 1);
        assert!(after.http_client_errors_total >= before.http_client_errors_total + 1);
        assert!(after.http_server_errors_total >= before.http_server_errors_total + 2);
    }
}
