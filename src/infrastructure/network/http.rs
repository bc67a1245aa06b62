// HTTP client utilities
use crate::domain::error::HrmError;
use crate::infrastructure::config::Config;
use reqwest::Client;

/// Create the shared HTTP client from config
pub fn create_client(config: &Config) -> Result<Client, HrmError> {
    Ok(Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(std::time::Duration::from_secs(30))
        .timeout(config.request_timeout())
        .user_agent(concat!("hrmc/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
