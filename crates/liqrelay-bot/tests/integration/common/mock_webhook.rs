//! Mock webhook endpoint for integration tests.
//!
//! Records every POSTed body so tests can assert exactly which
//! notifications went out.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use std::sync::Arc;
use tokio::sync::Mutex;

type Received = Arc<Mutex<Vec<String>>>;

/// A mock notification endpoint.
pub struct MockWebhookServer {
    url: String,
    received: Received,
}

impl MockWebhookServer {
    /// Start the endpoint on an ephemeral port.
    pub async fn start() -> Self {
        let received: Received = Arc::new(Mutex::new(Vec::new()));

        let router = Router::new()
            .route("/hook", post(record_body))
            .with_state(received.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            url: format!("http://{addr}/hook"),
            received,
        }
    }

    /// URL to configure as the relay's webhook endpoint.
    pub fn url(&self) -> String {
        self.url.clone()
    }

    /// All request bodies received so far.
    pub async fn received(&self) -> Vec<String> {
        self.received.lock().await.clone()
    }
}

async fn record_body(State(received): State<Received>, body: String) -> StatusCode {
    received.lock().await.push(body);
    StatusCode::NO_CONTENT
}
