//! HTTP server implementation using axum.

use std::net::SocketAddr;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use liqrelay_telemetry::Metrics;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::state::{HealthSnapshot, HealthState};

/// Create the axum router. Unmatched paths fall through to axum's
/// built-in 404 handler.
pub fn create_router(state: HealthState) -> Router {
    Router::new()
        .route("/", get(get_health))
        .route("/health", get(get_health))
        .route("/metrics", get(get_metrics))
        .with_state(state)
}

/// Serve the health snapshot as JSON.
async fn get_health(State(state): State<HealthState>) -> Json<HealthSnapshot> {
    Json(state.collect_snapshot())
}

/// Serve the Prometheus registry in text exposition format.
async fn get_metrics() -> Response {
    match Metrics::gather() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics unavailable").into_response()
        }
    }
}

/// Run the health server until the shutdown token fires. In-flight
/// responses finish before the server exits.
pub async fn run_server(
    state: HealthState,
    port: u16,
    shutdown: CancellationToken,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(port, "Starting health server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    async fn get(router: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_root_and_health_return_snapshot() {
        for uri in ["/", "/health"] {
            let router = create_router(HealthState::new());
            let (status, body) = get(router, uri).await;
            assert_eq!(status, StatusCode::OK);

            let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(json["status"], "ok");
            assert_eq!(json["connection"], "not_initialized");
            assert!(json["uptime_secs"].is_number());
            assert!(json["timestamp"].is_string());
        }
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let router = create_router(HealthState::new());
        let (status, _) = get(router, "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_metrics_endpoint_serves_text() {
        let router = create_router(HealthState::new());
        let (status, body) = get(router, "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        let text = String::from_utf8(body).unwrap();
        // registry may be empty until counters are touched, but the
        // endpoint itself must respond with the exposition format
        assert!(text.is_empty() || text.contains("liqrelay_") || text.contains("# HELP"));
    }
}
