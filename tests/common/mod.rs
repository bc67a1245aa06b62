//! Shared test doubles for the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use hrm_cache::{ApiRequest, Backend, HrmError};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

/// Backend answering canned responses per action and recording every call.
#[derive(Default)]
pub struct MockBackend {
    responses: Mutex<HashMap<String, Result<Value, String>>>,
    requests: Mutex<Vec<ApiRequest>>,
    gate: Option<Semaphore>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls block until `open` releases them.
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    pub fn respond(self, action: &str, value: Value) -> Self {
        self.set_response(action, Ok(value));
        self
    }

    pub fn fail(self, action: &str, message: &str) -> Self {
        self.set_response(action, Err(message.to_string()));
        self
    }

    pub fn set_response(&self, action: &str, response: Result<Value, String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(action.to_string(), response);
    }

    /// Let `n` blocked (or future) calls through.
    pub fn open(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn calls_for(&self, action: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.action == action)
            .count()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Yield until at least `n` calls have reached the backend.
    pub async fn wait_for_calls(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.calls() < n {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("backend was never called");
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn call(&self, request: ApiRequest) -> Result<Value, HrmError> {
        let action = request.action.clone();
        self.requests.lock().unwrap().push(request);

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        let response = self.responses.lock().unwrap().get(&action).cloned();
        match response {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(HrmError::Api(message)),
            None => Err(HrmError::Api(format!("no mock response for {}", action))),
        }
    }
}

/// `Arc<MockBackend>` is what the tests keep; the cache gets a trait object clone.
pub fn as_backend(mock: &Arc<MockBackend>) -> Arc<dyn Backend> {
    Arc::clone(mock) as Arc<dyn Backend>
}
