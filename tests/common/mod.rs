#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    Json, Router,
};
use photoapp_client::{ClientOptions, PhotoAppClient};
use serde_json::{json, Value as JsonValue};

#[derive(Clone)]
pub struct MockResponse {
    status: StatusCode,
    body: JsonValue,
    delay: Duration,
}

impl MockResponse {
    pub fn json(status: StatusCode, body: JsonValue) -> Self {
        Self {
            status,
            body,
            delay: Duration::from_millis(0),
        }
    }

    pub fn ok(body: JsonValue) -> Self {
        Self::json(StatusCode::OK, body)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// What the mock server saw.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: String,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> JsonValue {
        serde_json::from_str(&self.body).expect("request body must be JSON")
    }
}

#[derive(Clone)]
struct MockState {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

async fn any_handler(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    body: String,
) -> impl IntoResponse {
    state
        .requests
        .lock()
        .expect("request log mutex must not be poisoned")
        .push(RecordedRequest {
            method,
            uri: uri.to_string(),
            body,
        });

    let response = {
        let mut queue = state
            .responses
            .lock()
            .expect("response queue mutex must not be poisoned");
        queue.pop_front().unwrap_or_else(|| {
            MockResponse::json(
                StatusCode::NOT_IMPLEMENTED,
                json!({"message": "no mock response available"}),
            )
        })
    };

    if !response.delay.is_zero() {
        tokio::time::sleep(response.delay).await;
    }

    (response.status, Json(response.body))
}

pub struct TestServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl TestServer {
    pub fn hits(&self) -> usize {
        self.requests().len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .expect("request log mutex must not be poisoned")
            .clone()
    }

    /// Client with a 1 ms backoff unit so retry tests stay fast.
    pub fn client(&self) -> PhotoAppClient {
        PhotoAppClient::with_options(&self.base_url, fast_options())
            .expect("mock server url must be valid")
    }
}

pub fn fast_options() -> ClientOptions {
    ClientOptions {
        timeout_ms: Some(2_000),
        max_attempts: 3,
        retry_backoff_ms: 1,
    }
}

/// Serves `responses` in order, whatever the route.
pub async fn spawn_server(responses: Vec<MockResponse>) -> TestServer {
    let state = MockState {
        responses: Arc::new(Mutex::new(responses.into())),
        requests: Arc::new(Mutex::new(Vec::new())),
    };

    let app = Router::new()
        .fallback(any_handler)
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind test listener");
    let address = listener.local_addr().expect("must have local addr");
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("mock server must run");
    });

    TestServer {
        base_url: format!("http://{address}"),
        requests: state.requests,
        task,
    }
}

/// A `/bucket` page body holding `count` objects keyed `u1/NNNN.jpg`,
/// numbered from `first`.
pub fn bucket_page(first: usize, count: usize) -> JsonValue {
    let data: Vec<JsonValue> = (first..first + count)
        .map(|i| {
            json!({
                "Key": format!("u1/{i:04}.jpg"),
                "LastModified": "2024-03-01T12:00:00.000Z",
                "ETag": format!("\"etag{i}\""),
                "Size": 1000 + i,
                "StorageClass": "STANDARD"
            })
        })
        .collect();
    json!({"messgage": "success", "data": data})
}
