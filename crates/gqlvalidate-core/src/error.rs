//! Error types for the gqlvalidate runtime
//!
//! This module defines the error handling system for the validation engine,
//! using thiserror for ergonomic error definitions and anyhow for flexible error contexts.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::rules::ValidationErrors;
use thiserror::Error;

/// Main error type for runtime validation operations
#[derive(Error, Debug)]
pub enum Error {
    /// Structural validation failed on one or more fields
    #[error("{0}")]
    FieldValidation(ValidationErrors),

    /// A compiled rule names a validation the evaluator does not know
    #[error("Undefined validation rule '{rule}' on field {field}")]
    UnknownRule {
        rule: String,
        field: String,
    },

    /// A rule parameter could not be interpreted
    #[error("Malformed parameter '{param}' for rule '{rule}': {message}")]
    MalformedRule {
        rule: String,
        param: String,
        message: String,
    },

    /// A value references an input type missing from the catalog
    #[error("Unknown input type: {type_name}")]
    UnknownType {
        type_name: String,
    },

    /// Invalid translation configuration, detected at startup
    #[error("Translation configuration error: {message}")]
    Translation {
        message: String,
    },

    /// Validation was cancelled or ran past its deadline
    #[error("Validation cancelled: {reason}")]
    Cancelled {
        reason: String,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// YAML parsing errors
    #[error("YAML error: {message}")]
    Yaml {
        message: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a translation configuration error
    pub fn translation(message: impl Into<String>) -> Self {
        Error::Translation {
            message: message.into(),
        }
    }

    /// Create a malformed rule parameter error
    pub fn malformed(rule: &str, param: &str, message: impl Into<String>) -> Self {
        Error::MalformedRule {
            rule: rule.to_string(),
            param: param.to_string(),
            message: message.into(),
        }
    }

    /// Field errors carried by this error, if it is a structural failure
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Error::FieldValidation(errors) => Some(errors),
            _ => None,
        }
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::FieldValidation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownRule {
            rule: "frobnicate".to_string(),
            field: "SimpleInput.name".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Undefined validation rule 'frobnicate' on field SimpleInput.name"
        );

        let err = Error::translation("no translators registered");
        assert_eq!(
            err.to_string(),
            "Translation configuration error: no translators registered"
        );
    }

    #[test]
    fn test_field_errors_accessor() {
        let err = Error::FieldValidation(ValidationErrors::default());
        assert!(err.field_errors().is_some());

        let err = Error::Cancelled {
            reason: "deadline exceeded".to_string(),
        };
        assert!(err.field_errors().is_none());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json { .. }));
    }
}
