//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process router
//! with mock upstream seams injected, so the titles API can be exercised
//! without a fleet API.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use titlerank_core::{
    testing::{MockReleaseSource, MockTorrentActions},
    Config, Release, ReleaseSource, TorrentActions, UpstreamConfig,
};
use titlerank_server::state::AppState;

/// Re-export fixtures for test convenience
pub use titlerank_core::testing::fixtures;

/// Test fixture for API testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_rows() {
///     let fixture = TestFixture::with_titles(vec![fixtures::movie("h1", "Dune", 2021, "2160p")]).await;
///
///     let response = fixture.get("/api/v1/titles").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Shared state behind the router
    pub state: Arc<AppState>,
    /// Mock release source - configure the served collection
    pub source: Arc<MockReleaseSource>,
    /// Mock action sink - inspect dispatched actions
    pub actions: Arc<MockTorrentActions>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

fn test_config() -> Config {
    Config {
        upstream: Some(UpstreamConfig {
            url: "http://fleet.test".to_string(),
            api_key: Some("secret-key".to_string()),
            instance_id: "seedbox".to_string(),
            timeout_secs: 5,
            poll_interval_secs: 30,
        }),
        ..Default::default()
    }
}

impl TestFixture {
    /// Create a new test fixture with an empty collection.
    pub async fn new() -> Self {
        Self::with_titles(Vec::new()).await
    }

    /// Create a test fixture serving `titles`, already fetched once.
    pub async fn with_titles(titles: Vec<Release>) -> Self {
        let source = Arc::new(MockReleaseSource::with_titles(titles));
        let actions = Arc::new(MockTorrentActions::new());

        let state = Arc::new(AppState::new(
            test_config(),
            Some(Arc::clone(&source) as Arc<dyn ReleaseSource>),
            Some(Arc::clone(&actions) as Arc<dyn TorrentActions>),
        ));
        state.refresh().await.expect("Initial refresh failed");

        let router = titlerank_server::api::create_router(Arc::clone(&state));

        Self {
            router,
            state,
            source,
            actions,
        }
    }

    /// Create a fixture with no upstream at all.
    pub fn without_upstream() -> (Router, Arc<AppState>) {
        let state = Arc::new(AppState::new(Config::default(), None, None));
        (
            titlerank_server::api::create_router(Arc::clone(&state)),
            state,
        )
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        send(&self.router, "GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        send(&self.router, "POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        send(&self.router, "POST", path, None).await
    }
}

/// Send a request to a router.
pub async fn send(router: &Router, method: &str, path: &str, body: Option<Value>) -> TestResponse {
    let mut request_builder = Request::builder().method(method).uri(path);

    let body = if let Some(json_body) = body {
        request_builder = request_builder.header("Content-Type", "application/json");
        Body::from(serde_json::to_vec(&json_body).unwrap())
    } else {
        Body::empty()
    };

    let request = request_builder.body(body).unwrap();

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let body_bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect body")
        .to_bytes();

    let body: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into_owned()))
    };

    TestResponse { status, body }
}

/// Helper to assert a response has expected status.
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
