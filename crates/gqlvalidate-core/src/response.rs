//! Protocol-shaped errors
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::path::ResponsePath;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Extension code attached to every field validation error
pub const BAD_USER_INPUT: &str = "BAD_USER_INPUT";

/// A GraphQL response error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLError {
    pub message: String,

    #[serde(default, skip_serializing_if = "ResponsePath::is_empty")]
    pub path: ResponsePath,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
}

impl GraphQLError {
    pub fn new(message: impl Into<String>, path: ResponsePath) -> Self {
        Self {
            message: message.into(),
            path,
            extensions: None,
        }
    }

    /// Add one extension entry
    pub fn with_extension(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extensions
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value.into());
        self
    }

    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.as_ref()?.get(key)
    }

    /// The `code` extension, if set
    pub fn code(&self) -> Option<&str> {
        self.extension("code")?.as_str()
    }
}

impl fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl std::error::Error for GraphQLError {}

/// Errors recorded for a response without failing the current field
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Mutex<Vec<GraphQLError>>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, error: GraphQLError) {
        self.errors.lock().push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.lock().is_empty()
    }

    /// Copy of every recorded error, in insertion order
    pub fn snapshot(&self) -> Vec<GraphQLError> {
        self.errors.lock().clone()
    }

    /// Drain every recorded error
    pub fn take(&self) -> Vec<GraphQLError> {
        std::mem::take(&mut *self.errors.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_serialization() {
        let mut path = ResponsePath::field("input");
        path.push_field("name");
        let error = GraphQLError::new("name is required", path)
            .with_extension("code", BAD_USER_INPUT)
            .with_extension("rule", "required");

        assert_eq!(error.code(), Some(BAD_USER_INPUT));
        assert_eq!(error.to_string(), "input.name: name is required");
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({
                "message": "name is required",
                "path": ["input", "name"],
                "extensions": {"code": "BAD_USER_INPUT", "rule": "required"}
            })
        );
    }

    #[test]
    fn test_pathless_error_omits_path() {
        let error = GraphQLError::new("boom", ResponsePath::new());
        assert_eq!(serde_json::to_value(&error).unwrap(), json!({"message": "boom"}));
        assert_eq!(error.to_string(), "boom");
    }

    #[test]
    fn test_collector_preserves_order() {
        let collector = ErrorCollector::new();
        collector.push(GraphQLError::new("first", ResponsePath::new()));
        collector.push(GraphQLError::new("second", ResponsePath::new()));

        let messages: Vec<_> = collector.snapshot().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert_eq!(collector.take().len(), 2);
        assert!(collector.is_empty());
    }
}
