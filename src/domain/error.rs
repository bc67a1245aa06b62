use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HrmError {
    #[error("No employee ID found in the stored login session")]
    MissingIdentity,

    #[error("No auth token found in the stored login session")]
    MissingAuthToken,

    #[error("Failed to fetch {resource}: {source}")]
    UpstreamFetchFailed {
        resource: &'static str,
        #[source]
        source: Arc<HrmError>,
    },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API Error: {0}")]
    Api(String),

    #[error("Unexpected response shape: {0}")]
    Decode(String),

    #[error("Background fetch failed: {0}")]
    Task(String),
}

impl HrmError {
    /// Precondition failures mean the session is gone and the user has to log in again.
    pub fn needs_login(&self) -> bool {
        matches!(self, HrmError::MissingIdentity | HrmError::MissingAuthToken)
    }

    /// The error produced by the backend, looking through `UpstreamFetchFailed`.
    pub fn upstream(&self) -> Option<&Arc<HrmError>> {
        match self {
            HrmError::UpstreamFetchFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}
