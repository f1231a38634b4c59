//! Logging setup for the gqlvalidate CLI
//!
//! This module provides:
//! - Run ID generation
//! - Redaction of sensitive input values before they reach trace logs
//! - Timing guards for operations
//! - Subscriber setup for the compact, full and json formats
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use is_terminal::IsTerminal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::{field, Span};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Run ID for the current invocation
static RUN_ID: OnceLock<String> = OnceLock::new();

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter
    pub level: String,
    pub format: LogFormat,
    /// Enable ANSI colors on stderr
    pub console: bool,
    pub thread_ids: bool,
    /// Include file and line numbers
    pub source_location: bool,
    /// Per-module levels, e.g. `gqlvalidate_codegen: debug`
    pub module_filter: BTreeMap<String, String>,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Full,
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            console: true,
            thread_ids: false,
            source_location: false,
            module_filter: BTreeMap::new(),
        }
    }
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "compact" => Some(Self::Compact),
            "full" => Some(Self::Full),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl LoggingConfig {
    /// Raise the level according to `-v` flags
    pub fn apply_verbosity(&mut self, verbosity: u8) {
        match verbosity {
            0 => {}
            1 => self.level = "info".to_string(),
            2 => {
                self.level = "debug".to_string();
                self.source_location = true;
            }
            _ => {
                self.level = "trace".to_string();
                self.format = LogFormat::Full;
                self.source_location = true;
                self.thread_ids = true;
            }
        }
    }

    /// Apply `RUST_LOG` and `GQLVALIDATE_LOG_FORMAT`
    pub fn merge_with_env(&mut self) {
        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            self.level = rust_log;
        }

        if let Ok(format) = std::env::var("GQLVALIDATE_LOG_FORMAT") {
            match LogFormat::parse(&format) {
                Some(parsed) => self.format = parsed,
                None => eprintln!("Warning: invalid log format '{}', using default", format),
            }
        }
    }
}

/// Install the global subscriber and record the run ID
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let env_filter = create_env_filter(&config)?;
    let ansi = config.console && std::io::stderr().is_terminal();

    let installed = match config.format {
        LogFormat::Compact => tracing::subscriber::set_global_default(
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(ansi)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .compact()
                .finish(),
        ),
        LogFormat::Json => tracing::subscriber::set_global_default(
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(false)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .json()
                .finish(),
        ),
        LogFormat::Full => tracing::subscriber::set_global_default(
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(ansi)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .finish(),
        ),
    };
    installed.map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))?;

    let run_id = RUN_ID.get_or_init(generate_run_id);
    tracing::info!(run_id = %run_id, format = ?config.format, level = %config.level, "Logging initialized");
    Ok(())
}

fn create_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|e| Error::config(format!("Invalid log level '{}': {}", config.level, e)))?;

    for (module, level) in &config.module_filter {
        filter = filter.add_directive(
            format!("{}={}", module, level)
                .parse()
                .map_err(|e| Error::config(format!("Invalid filter directive: {}", e)))?,
        );
    }
    Ok(filter)
}

pub fn generate_run_id() -> String {
    format!("run_{}", Uuid::new_v4().simple())
}

pub fn current_run_id() -> Option<&'static str> {
    RUN_ID.get().map(String::as_str)
}

/// Span carrying the run ID and a duration slot
pub fn create_operation_span(operation: &str, details: Option<&str>) -> Span {
    tracing::info_span!(
        "operation",
        operation = operation,
        run_id = current_run_id().unwrap_or("unknown"),
        details = details.unwrap_or(""),
        duration_ms = field::Empty,
    )
}

/// Redaction of secrets in user-supplied input values
pub mod redaction {
    use regex::Regex;
    use std::sync::OnceLock;

    static SECRET_ASSIGNMENT: OnceLock<Option<Regex>> = OnceLock::new();

    fn secret_assignment() -> Option<&'static Regex> {
        SECRET_ASSIGNMENT
            .get_or_init(|| {
                Regex::new(r#"(?i)(api[_-]?key|token|bearer|password|passwd|pwd|secret)[=:\s]+['"]?([^\s'"]{3,})['"]?"#)
                    .ok()
            })
            .as_ref()
    }

    pub fn redact_sensitive(input: &str) -> String {
        match secret_assignment() {
            Some(regex) => regex.replace_all(input, "$1=***").to_string(),
            None => input.to_string(),
        }
    }

    /// Redact sensitive keys and embedded secrets in a JSON value
    pub fn redact_json_value(value: &mut serde_json::Value) {
        match value {
            serde_json::Value::Object(map) => {
                for (key, val) in map.iter_mut() {
                    if is_sensitive_key(key) {
                        *val = serde_json::Value::String("***".to_string());
                    } else {
                        redact_json_value(val);
                    }
                }
            }
            serde_json::Value::Array(items) => items.iter_mut().for_each(redact_json_value),
            serde_json::Value::String(s) => *s = redact_sensitive(s),
            _ => {}
        }
    }

    fn is_sensitive_key(key: &str) -> bool {
        let key = key.to_lowercase();
        ["password", "passwd", "secret", "token", "apikey", "api_key", "credential"]
            .iter()
            .any(|needle| key.contains(needle))
    }
}

/// Performance timing utilities
pub mod timing {
    use std::time::Instant;
    use tracing::Span;

    /// Logs the elapsed time of an operation when dropped
    pub struct Timer {
        start: Instant,
        span: Span,
        operation: String,
    }

    impl Timer {
        pub fn new(operation: &str) -> Self {
            Self {
                start: Instant::now(),
                span: super::create_operation_span(operation, None),
                operation: operation.to_string(),
            }
        }

        pub fn with_details(operation: &str, details: &str) -> Self {
            Self {
                start: Instant::now(),
                span: super::create_operation_span(operation, Some(details)),
                operation: operation.to_string(),
            }
        }

        pub fn elapsed(&self) -> std::time::Duration {
            self.start.elapsed()
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            let duration = self.start.elapsed();
            self.span.record("duration_ms", duration.as_millis() as u64);

            tracing::debug!(
                operation = %self.operation,
                duration_ms = duration.as_millis() as u64,
                "Operation completed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction() {
        let redacted = redaction::redact_sensitive("password=hunter22 token: abcdefghijkl");
        assert!(redacted.contains("password=***"));
        assert!(redacted.contains("token=***"));
        assert!(!redacted.contains("hunter22"));
        assert!(!redacted.contains("abcdefghijkl"));
    }

    #[test]
    fn test_json_redaction_keeps_plain_fields() {
        let mut value = serde_json::json!({
            "name": "Ada",
            "password": "hunter22",
            "profile": {"apiKey": "k-123456", "bio": "likes maths"}
        });
        redaction::redact_json_value(&mut value);

        assert_eq!(value["name"], "Ada");
        assert_eq!(value["password"], "***");
        assert_eq!(value["profile"]["apiKey"], "***");
        assert_eq!(value["profile"]["bio"], "likes maths");
    }

    fn from_verbosity(verbosity: u8) -> LoggingConfig {
        let mut config = LoggingConfig::default();
        config.apply_verbosity(verbosity);
        config
    }

    #[test]
    fn test_logging_config_from_verbosity() {
        let config = from_verbosity(0);
        assert_eq!(config.level, "warn");
        assert!(!config.source_location);

        let config = from_verbosity(2);
        assert_eq!(config.level, "debug");
        assert!(config.source_location);

        let config = from_verbosity(3);
        assert_eq!(config.level, "trace");
        assert_eq!(config.format, LogFormat::Full);
        assert!(config.thread_ids);
    }

    #[test]
    fn test_logging_config_deserializes_partial() {
        let config: LoggingConfig = serde_yaml::from_str("format: json\n").unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "warn");
    }

    #[test]
    fn test_invalid_module_filter_rejected() {
        let mut config = LoggingConfig::default();
        config
            .module_filter
            .insert("gqlvalidate_codegen".to_string(), "loud".to_string());
        assert!(create_env_filter(&config).is_err());
    }

    #[test]
    fn test_run_ids_are_unique() {
        let a = generate_run_id();
        let b = generate_run_id();
        assert!(a.starts_with("run_"));
        assert_ne!(a, b);
    }
}
