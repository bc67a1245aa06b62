use crate::domain::error::HrmError;
use crate::domain::traits::SessionStore;
use crate::infrastructure::config::{get_session_path, Config};
use crate::infrastructure::network::http::create_client;
use crate::infrastructure::network::HttpBackend;
use crate::infrastructure::storage::{FileSessionStore, RequestCache};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub cache: RequestCache,
    pub session: Arc<dyn SessionStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, HrmError> {
        config.validate()?;

        let http_client = create_client(&config)?;
        let backend = Arc::new(HttpBackend::new(http_client, &config));
        let session: Arc<dyn SessionStore> =
            Arc::new(FileSessionStore::new(get_session_path(&config)));
        let cache = RequestCache::with_system_clock(backend, Arc::clone(&session));

        Ok(Self {
            cache,
            session,
            config: Arc::new(config),
        })
    }

    /// State around an existing cache, for hosts that inject their own backend.
    pub fn with_cache(config: Config, cache: RequestCache, session: Arc<dyn SessionStore>) -> Self {
        Self {
            cache,
            session,
            config: Arc::new(config),
        }
    }
}
