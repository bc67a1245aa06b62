use crate::domain::error::HrmError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_legacy_path")]
    pub legacy_path: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Where the login flow leaves `authToken` and `loggedInUser`
    pub session_path: Option<String>,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_enable_emoji")]
    pub enable_emoji: bool,
    #[serde(default)]
    pub logging: Logging,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Logging {
    #[serde(default = "default_enable")]
    pub enable: bool,
    pub path: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            enable: true,
            path: None,
            level: "WARN".to_string(),
        }
    }
}

impl Logging {
    /// `EnvFilter` directive for the configured level; unknown levels mean warn.
    pub fn filter_directive(&self) -> &'static str {
        match self.level.to_uppercase().as_str() {
            "DEBUG" => "debug",
            "INFO" => "info",
            "WARN" => "warn",
            "ERROR" => "error",
            _ => "warn",
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            legacy_path: default_legacy_path(),
            request_timeout_secs: default_request_timeout_secs(),
            session_path: None,
            theme: default_theme(),
            enable_emoji: true,
            logging: Logging::default(),
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Validate the values the HTTP client depends on.
    pub fn validate(&self) -> Result<(), HrmError> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(HrmError::Config(format!(
                "api_base_url must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }
        if !self.legacy_path.is_empty() && !self.legacy_path.starts_with('/') {
            return Err(HrmError::Config(format!(
                "legacy_path must start with '/', got '{}'",
                self.legacy_path
            )));
        }
        Ok(())
    }
}

// Defaults
fn default_api_base_url() -> String {
    "https://hrm-api.tocotoco.workers.dev".to_string()
}
fn default_legacy_path() -> String {
    "/api/legacy".to_string()
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_theme() -> String {
    "classic".to_string()
}
fn default_enable_emoji() -> bool {
    true
}
fn default_enable() -> bool {
    true
}
fn default_log_level() -> String {
    "WARN".to_string()
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("hrmc").join("config.toml"))
}

/// Get session file path (config value, else next to the config file)
pub fn get_session_path(config: &Config) -> PathBuf {
    if let Some(path) = config.session_path.as_deref().filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }

    // ~/.config/hrmc/session.json (Linux)
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hrmc")
        .join("session.json")
}

pub fn load_config() -> Result<Config, HrmError> {
    match get_config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(Config::default()),
    }
}

/// Load config from a specific file; a missing or broken file yields defaults.
pub fn load_config_from(path: &Path) -> Result<Config, HrmError> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)?;
    match toml::from_str::<Config>(&content) {
        Ok(config) => Ok(config),
        Err(e) => {
            eprintln!(
                "Warning: Failed to parse config file: {}. Using defaults.",
                e
            );
            Ok(Config::default())
        }
    }
}

pub fn generate_config_sample() -> Result<(), HrmError> {
    let path = get_config_path()
        .ok_or_else(|| HrmError::Config("Cannot determine config directory".to_string()))?;

    if path.exists() {
        eprintln!("Config file already exists at: {}", path.display());
        return Ok(());
    }

    write_config_sample(&path)?;
    println!("Generated config file at: {}", path.display());
    Ok(())
}

pub fn write_config_sample(path: &Path) -> Result<(), HrmError> {
    // Create directory if needed
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let sample = Config::default();
    let toml_content = toml::to_string_pretty(&sample)
        .map_err(|e| HrmError::Config(format!("Failed to serialize config: {}", e)))?;
    fs::write(path, toml_content)
        .map_err(|e| HrmError::Config(format!("Failed to write config file: {}", e)))?;
    Ok(())
}
