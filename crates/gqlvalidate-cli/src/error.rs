//! Error types and handling for the CLI
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from the runtime library
    #[error("Runtime error: {0}")]
    Core(#[from] gqlvalidate_core::Error),

    /// Error from the generator; annotation errors keep their own wording
    #[error("{0}")]
    Codegen(#[from] gqlvalidate_codegen::Error),

    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Invalid file format for {}: expected {} format", path.display(), expected)]
    InvalidFormat { path: PathBuf, expected: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// The manifest has no such input type
    #[error("Type '{}' not found in manifest {}", type_name, manifest.display())]
    TypeNotFound { type_name: String, manifest: PathBuf },

    /// Input failed validation
    #[error("Validation failed with {} error(s)", count)]
    ValidationFailed { count: usize },

    /// Rule names the runtime evaluator does not implement
    #[error("{} unknown rule name(s) found", count)]
    UnknownRules { count: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{message}")]
    Other { message: String },
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(_) => 2,
            Self::Codegen(e) if e.is_annotation_error() => 3,
            Self::Codegen(_) => 4,
            Self::FileNotFound { .. } => 5,
            Self::InvalidFormat { .. } => 6,
            Self::Config(_) => 7,
            Self::InvalidArgs(_) => 8,
            Self::TypeNotFound { .. } => 9,
            Self::ValidationFailed { .. } => 10,
            Self::UnknownRules { .. } => 11,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Toml(_) => 14,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

/// Extension trait for adding context to errors
pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> Result<T>;

    /// Add context with a closure (only evaluated on error)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other {
                message: format!("{}: {}", msg, inner),
            }
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other {
                message: format!("{}: {}", f(), inner),
            }
        })
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}
