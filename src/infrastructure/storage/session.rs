// Persisted login session (the CLI's counterpart of the browser's local storage)
use crate::domain::error::HrmError;
use crate::domain::model::Identity;
use crate::domain::traits::SessionStore;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::warn;

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const USER_DATA_KEY: &str = "loggedInUser";

/// Session stored as a JSON file with the browser storage keys.
///
/// The file is re-read on every lookup so a logout that rewrites it is
/// seen by the next cache miss.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Option<Value> {
        match read_session(&self.path) {
            Ok(value) => value,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable session file");
                None
            }
        }
    }
}

fn read_session(path: &Path) -> Result<Option<Value>, HrmError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

impl SessionStore for FileSessionStore {
    fn auth_token(&self) -> Option<String> {
        self.read().as_ref().and_then(token_from)
    }

    fn identity(&self) -> Option<Identity> {
        self.read().as_ref().and_then(identity_from)
    }
}

fn token_from(session: &Value) -> Option<String> {
    session
        .get(AUTH_TOKEN_KEY)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

// Local storage only holds strings, so the user record may be JSON inside a string.
fn identity_from(session: &Value) -> Option<Identity> {
    let user = match session.get(USER_DATA_KEY)? {
        Value::String(raw) => serde_json::from_str::<Value>(raw).ok()?,
        other => other.clone(),
    };
    serde_json::from_value(user).ok()
}

/// In-process session, for tests and hosts that own the login flow.
#[derive(Default)]
pub struct MemorySessionStore {
    token: RwLock<Option<String>>,
    identity: RwLock<Option<Identity>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logged_in(token: impl Into<String>, identity: Identity) -> Self {
        let store = Self::new();
        store.set_token(Some(token.into()));
        store.set_identity(Some(identity));
        store
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    pub fn set_identity(&self, identity: Option<Identity>) {
        *self.identity.write().unwrap_or_else(PoisonError::into_inner) = identity;
    }
}

impl SessionStore for MemorySessionStore {
    fn auth_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .filter(|t| !t.trim().is_empty())
    }

    fn identity(&self) -> Option<Identity> {
        self.identity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
