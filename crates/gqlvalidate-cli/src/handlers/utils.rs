//! Shared utilities for command handlers

use crate::error::{Error, Result};
use crate::logging::redaction;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::trace;

/// Fail early with a friendly error when a required file is missing
pub fn require_file(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::FileNotFound {
            path: path.to_path_buf(),
        })
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false)
}

/// Read a JSON or YAML document as a JSON value
pub fn load_value(path: &Path) -> Result<Value> {
    require_file(path)?;
    let content = fs::read_to_string(path)?;

    let value: Value = if is_yaml(path) {
        serde_yaml::from_str(&content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "YAML".to_string(),
        })?
    } else {
        serde_json::from_str(&content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON".to_string(),
        })?
    };

    let mut redacted = value.clone();
    redaction::redact_json_value(&mut redacted);
    trace!(path = %path.display(), value = %redacted, "Loaded input");
    Ok(value)
}
