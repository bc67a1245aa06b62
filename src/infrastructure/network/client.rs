use crate::domain::error::HrmError;
use crate::domain::traits::{ApiRequest, Backend};
use crate::infrastructure::config::Config;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

/// HRM API backend over the legacy `?action=` endpoint.
pub struct HttpBackend {
    client: Client,
    endpoint: String,
}

impl HttpBackend {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            endpoint: legacy_endpoint(config),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn call(&self, request: ApiRequest) -> Result<Value, HrmError> {
        debug!(action = %request.action, post = request.is_post(), "calling HRM API");

        let mut builder = if let Some(body) = &request.body {
            self.client.post(&self.endpoint).json(body)
        } else {
            self.client.get(&self.endpoint)
        };

        builder = builder
            .query(&query_pairs(&request))
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = request.token.as_deref().filter(|t| !t.is_empty()) {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(api_error(&request.action, status, &text));
        }

        Ok(serde_json::from_str(&text)?)
    }
}

fn legacy_endpoint(config: &Config) -> String {
    format!(
        "{}{}",
        config.api_base_url.trim_end_matches('/'),
        config.legacy_path
    )
}

/// `action` first, then the request's own parameters in order.
pub(crate) fn query_pairs(request: &ApiRequest) -> Vec<(&str, &str)> {
    std::iter::once(("action", request.action.as_str()))
        .chain(
            request
                .params
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        )
        .collect()
}

// The API answers failures with `{ "message": "..." }`; fall back to the status text.
fn api_error(action: &str, status: StatusCode, body: &str) -> HrmError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

    HrmError::Api(format!("{} failed with {}: {}", action, status.as_u16(), message))
}
