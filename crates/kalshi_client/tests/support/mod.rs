//! Shared helpers for the REST client integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use common::{ClientConfig, Result};
use kalshi_client::{HttpRequest, HttpResponse, HttpTransport, KalshiRestClient};

pub const TEST_KEY_PEM: &str = include_str!("../fixtures/test_key_pkcs1.pem");
pub const TEST_BASE_URL: &str = "https://kalshi.test/trade-api/v2";

#[derive(Default)]
struct State {
    requests: Vec<HttpRequest>,
    responses: VecDeque<HttpResponse>,
}

/// Spy transport: records every request and replays queued responses.
/// With nothing queued it answers `200 {}`.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    state: Arc<Mutex<State>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, status: u16, body: &str) -> &Self {
        self.state.lock().unwrap().responses.push_back(HttpResponse {
            status,
            body: body.to_string(),
        });
        self
    }

    pub fn push_json(&self, body: serde_json::Value) -> &Self {
        self.push_response(200, &body.to_string())
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.state
            .lock()
            .unwrap()
            .requests
            .last()
            .cloned()
            .expect("no request was recorded")
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request);
        Ok(state.responses.pop_front().unwrap_or(HttpResponse {
            status: 200,
            body: "{}".into(),
        }))
    }
}

pub fn public_config() -> ClientConfig {
    ClientConfig {
        api_key: None,
        private_key_pem: None,
        base_url: TEST_BASE_URL.into(),
    }
}

pub fn signed_config() -> ClientConfig {
    ClientConfig {
        api_key: Some("test-key-id".into()),
        private_key_pem: Some(TEST_KEY_PEM.into()),
        base_url: TEST_BASE_URL.into(),
    }
}

pub fn public_client() -> (KalshiRestClient<RecordingTransport>, RecordingTransport) {
    let transport = RecordingTransport::new();
    let client = KalshiRestClient::with_transport(&public_config(), transport.clone())
        .expect("client init failed");
    (client, transport)
}

pub fn signed_client() -> (KalshiRestClient<RecordingTransport>, RecordingTransport) {
    let transport = RecordingTransport::new();
    let client = KalshiRestClient::with_transport(&signed_config(), transport.clone())
        .expect("client init failed");
    (client, transport)
}

/// Query pairs as borrowed tuples, for compact assertions.
pub fn query_of(request: &HttpRequest) -> Vec<(&str, &str)> {
    request
        .query
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect()
}
