//! Error types for gqlvalidate code generation
//!
//! Schema errors abort the whole generation run; nothing is written when
//! any of them is raised.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for generation operations
#[derive(Error, Debug)]
pub enum Error {
    /// SDL that graphql-parser rejected
    #[error("Failed to parse schema {source_name}: {message}")]
    SchemaParse {
        source_name: String,
        message: String,
    },

    /// Structurally invalid schema, e.g. a duplicate type
    #[error("Invalid schema: {message}")]
    InvalidSchema {
        message: String,
    },

    #[error("@validate may only be applied to input fields (found on {type_name})")]
    DirectiveOnType {
        type_name: String,
    },

    #[error("@validate may only be applied once per field ({type_name}.{field})")]
    RepeatedDirective {
        type_name: String,
        field: String,
    },

    #[error("@validate on {type_name}.{field} requires a rule")]
    MissingRule {
        type_name: String,
        field: String,
    },

    #[error("@validate is not supported on argument {type_name}.{field}({argument})")]
    DirectiveOnArgument {
        type_name: String,
        field: String,
        argument: String,
    },

    #[error("@validate only supports the 'rule' and 'message' arguments (unexpected \"{argument}\" on {type_name}.{field})")]
    UnexpectedArgument {
        argument: String,
        type_name: String,
        field: String,
    },

    /// Generator configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
    },

    /// Writing or removing a generated artifact failed
    #[error("Failed to {operation} artifact {}: {source}", path.display())]
    Artifact {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Errors raised by the runtime crate, e.g. manifest serialization
    #[error("Runtime error: {message}")]
    Runtime {
        message: String,
        #[source]
        source: gqlvalidate_core::Error,
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

    /// TOML parsing errors
    #[error("TOML error: {message}")]
    Toml {
        message: String,
        #[source]
        source: toml::de::Error,
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
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Error::InvalidSchema {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Whether this error reports a misplaced or malformed `@validate`
    pub fn is_annotation_error(&self) -> bool {
        matches!(
            self,
            Error::DirectiveOnType { .. }
                | Error::RepeatedDirective { .. }
                | Error::MissingRule { .. }
                | Error::DirectiveOnArgument { .. }
                | Error::UnexpectedArgument { .. }
        )
    }
}

// Conversion implementations
impl From<gqlvalidate_core::Error> for Error {
    fn from(err: gqlvalidate_core::Error) -> Self {
        Error::Runtime {
            message: err.to_string(),
            source: err,
        }
    }
}

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

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Toml {
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
