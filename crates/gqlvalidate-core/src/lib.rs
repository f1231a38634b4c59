//! gqlvalidate runtime
//!
//! Validates GraphQL resolver arguments against the rules compiled from
//! `@validate(rule: "...", message: "...")` directives and reports failures
//! as protocol errors with client-facing paths.
//!
//! # Overview
//!
//! Generated input types describe themselves through a [`TypeCatalog`].
//! At request time the [`ValidationMiddleware`] hands each validatable
//! argument to the [`ValidationEngine`], which:
//!
//! 1. evaluates the compiled rules with the [`Evaluator`]
//! 2. maps every failing namespace onto wire names via the
//!    [`FieldMetadataRegistry`]
//! 3. resolves the message (override, translation, fallback)
//! 4. records all errors but the last on the request and returns the last
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

pub mod engine;
pub mod error;
pub mod metadata;
pub mod middleware;
pub mod path;
pub mod response;
pub mod rules;
pub mod translation;
pub mod types;

pub use engine::{fallback_message, resolve_message, ValidationEngine, ValidationEngineBuilder};
pub use error::{Error, Result};
pub use metadata::{FieldMetadata, FieldMetadataRegistry, TypeMetadata};
pub use middleware::{FieldContext, RequestContext, ValidationMiddleware};
pub use path::{PathSegment, ResponsePath};
pub use response::{ErrorCollector, GraphQLError, BAD_USER_INPUT};
pub use rules::{
    is_known_rule, CancelSignal, Evaluator, FieldError, Rule, RuleSet, Step, ValidationErrors,
};
pub use translation::{
    LocaleSelector, TranslationConfig, TranslationRegistration, Translations, Translator,
    TranslatorInit,
};
pub use types::{
    ArgumentValue, FieldDescriptor, FieldType, InputObject, ResolvedArgument, TypeCatalog,
    TypeDescriptor, Validatable,
};

/// Version of the runtime crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
