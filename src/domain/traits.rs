use crate::domain::error::HrmError;
use crate::domain::model::Identity;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Instant;

/// One action-addressed call against the HRM API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub action: String,
    pub params: Vec<(String, String)>,
    pub token: Option<String>,
    /// JSON body; `Some` makes this a POST.
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            params: Vec::new(),
            token: None,
            body: None,
        }
    }

    pub fn post(action: impl Into<String>, body: Value) -> Self {
        Self {
            body: Some(body),
            ..Self::get(action)
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn is_post(&self) -> bool {
        self.body.is_some()
    }
}

/// Transport for the HRM API.
///
/// The request cache only ever talks to this trait, so tests and embedding
/// hosts can swap the HTTP client for anything that answers JSON.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn call(&self, request: ApiRequest) -> Result<Value, HrmError>;
}

/// Read-only view of the persisted login session.
pub trait SessionStore: Send + Sync {
    /// The bearer token, `None` when logged out.
    fn auth_token(&self) -> Option<String>;

    /// The logged-in user, `None` when absent or without an employee id.
    fn identity(&self) -> Option<Identity>;
}

/// Monotonic time source for cache freshness.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}
