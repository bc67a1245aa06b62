//! Logging config tests

use hrm_cache::infrastructure::config::{Config, Logging};

fn with_level(level: &str) -> Logging {
    Logging {
        level: level.to_string(),
        ..Logging::default()
    }
}

#[test]
fn test_log_level_parsing() {
    let levels = [
        ("DEBUG", "debug"),
        ("INFO", "info"),
        ("WARN", "warn"),
        ("ERROR", "error"),
        ("info", "info"),
    ];

    for (level, expected) in levels {
        assert_eq!(with_level(level).filter_directive(), expected);
    }
}

#[test]
fn test_unknown_level_means_warn() {
    assert_eq!(with_level("TRACE").filter_directive(), "warn");
    assert_eq!(with_level("").filter_directive(), "warn");
}

#[test]
fn test_logging_config() {
    let logging = Config::default().logging;

    assert!(logging.enable);
    assert!(logging.path.is_none());
    assert_eq!(logging.level, "WARN");
}

#[test]
fn test_logging_section_is_optional() {
    let config: Config = toml::from_str("theme = \"light\"").unwrap();
    assert_eq!(config.logging, Logging::default());
}
