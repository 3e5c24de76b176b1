//! Webhook delivery client.
//!
//! One fixed endpoint, POST JSON, any 2xx is success. A hung endpoint is
//! bounded by the client-level timeout so delivery can never stall the
//! frame pipeline behind it.

use crate::embed::WebhookPayload;
use crate::error::{NotifyError, NotifyResult};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Delivery timeout for webhook requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the configured notification endpoint.
#[derive(Debug, Clone)]
pub struct WebhookSink {
    client: Client,
    url: String,
}

impl WebhookSink {
    /// Create a sink for the given webhook URL.
    pub fn new(url: impl Into<String>) -> NotifyResult<Self> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Deliver one rendered payload.
    ///
    /// Non-2xx responses are errors carrying the verbatim response body so
    /// the caller can log it. Never retried.
    pub async fn deliver(&self, payload: &WebhookPayload) -> NotifyResult<()> {
        let response = self.client.post(&self.url).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), "Notification delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::render;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::Router;
    use liqrelay_core::{LiquidationEvent, Price, Qty, Side};
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    type Captured = Arc<Mutex<Vec<String>>>;

    async fn capture_ok(State(captured): State<Captured>, body: String) -> StatusCode {
        captured.lock().await.push(body);
        StatusCode::NO_CONTENT
    }

    async fn always_fail() -> (StatusCode, &'static str) {
        (StatusCode::INTERNAL_SERVER_ERROR, "webhook exploded")
    }

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/hook")
    }

    fn sample_payload() -> WebhookPayload {
        let event = LiquidationEvent::new(
            "BTCUSDT".to_string(),
            Side::Long,
            Price::new(dec!(50000.00)),
            Qty::new(dec!(0.02)),
        )
        .unwrap();
        render(&event)
    }

    #[tokio::test]
    async fn test_deliver_success_on_2xx() {
        let captured: Captured = Arc::new(Mutex::new(Vec::new()));
        let router = Router::new()
            .route("/hook", post(capture_ok))
            .with_state(captured.clone());
        let url = spawn_server(router).await;

        let sink = WebhookSink::new(&url).unwrap();
        sink.deliver(&sample_payload()).await.unwrap();

        let bodies = captured.lock().await;
        assert_eq!(bodies.len(), 1);
        assert!(bodies[0].contains("\"embeds\""));
        assert!(bodies[0].contains("Liquidation Tracker"));
    }

    #[tokio::test]
    async fn test_deliver_error_carries_response_body() {
        let router = Router::new().route("/hook", post(always_fail));
        let url = spawn_server(router).await;

        let sink = WebhookSink::new(&url).unwrap();
        let err = sink.deliver(&sample_payload()).await.unwrap_err();

        match err {
            NotifyError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "webhook exploded");
            }
            other => panic!("Expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_deliver_error_on_unreachable_endpoint() {
        let sink = WebhookSink::new("http://127.0.0.1:59998/hook").unwrap();
        let err = sink.deliver(&sample_payload()).await.unwrap_err();
        assert!(matches!(err, NotifyError::Http(_)));
    }
}
