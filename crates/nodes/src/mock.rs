//! `MockHttpClient`: a test double for the `HttpClient` capability.
//!
//! Useful in unit and integration tests where a real network is either
//! unavailable or irrelevant.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use crate::http::{HttpClient, HttpRequest};
use crate::HttpError;

/// Behaviour injected into `MockHttpClient` at construction time.
pub enum MockBehaviour {
    /// Respond with a specific JSON body.
    Respond(Value),
    /// Fail with the given error.
    Fail(HttpError),
}

/// A mock HTTP capability that records every request it receives and
/// returns a programmer-specified result.
pub struct MockHttpClient {
    /// What the client will do when `request` is called.
    pub behaviour: MockBehaviour,
    /// All requests seen by this client (in call order).
    pub calls: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockHttpClient {
    /// Create a mock that always succeeds with the given body.
    pub fn responding(body: Value) -> Self {
        Self {
            behaviour: MockBehaviour::Respond(body),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that always fails with the given error.
    pub fn failing(err: HttpError) -> Self {
        Self {
            behaviour: MockBehaviour::Fail(err),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of requests issued through this client.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    /// Snapshot of every recorded request.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn request(&self, request: HttpRequest) -> Result<Value, HttpError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request);
        }

        match &self.behaviour {
            MockBehaviour::Respond(body) => Ok(body.clone()),
            MockBehaviour::Fail(err) => Err(err.clone()),
        }
    }
}
