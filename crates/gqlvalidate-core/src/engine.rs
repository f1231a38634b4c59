//! Runtime validation engine
//!
//! The engine validates each validatable argument of a field, converts
//! every field error into a protocol error and applies the aggregation
//! contract: all errors but the last are recorded on the request, the last
//! one is returned and fails the field.
//!
//! Message precedence for each error:
//! 1. the override message of the deepest resolved field
//! 2. the request translator's message for the rule
//! 3. `"<field> failed on the '<rule>' rule"`, plus `" (param: <p>)"`
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::metadata::FieldMetadataRegistry;
use crate::middleware::FieldContext;
use crate::path::{self, ResponsePath};
use crate::response::{GraphQLError, BAD_USER_INPUT};
use crate::rules::{Evaluator, FieldError, ValidationErrors};
use crate::translation::{TranslationConfig, Translations, Translator};
use crate::types::{ArgumentValue, ResolvedArgument, TypeCatalog};
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Builder for [`ValidationEngine`]
#[derive(Debug)]
pub struct ValidationEngineBuilder {
    catalog: Arc<TypeCatalog>,
    registry: Option<Arc<FieldMetadataRegistry>>,
    translations: Option<TranslationConfig>,
}

impl ValidationEngineBuilder {
    /// Share an existing registry instead of creating one
    pub fn with_registry(mut self, registry: Arc<FieldMetadataRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_translations(mut self, config: TranslationConfig) -> Self {
        self.translations = Some(config);
        self
    }

    /// Validate the configuration and build the engine
    pub fn build(self) -> Result<ValidationEngine> {
        let translations = self
            .translations
            .map(Translations::from_config)
            .transpose()?;

        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(FieldMetadataRegistry::new(Arc::clone(&self.catalog))));

        info!(
            types = self.catalog.len(),
            validatable = self.catalog.validatable_types().len(),
            languages = ?translations.as_ref().map(Translations::languages),
            "Validation engine ready"
        );

        Ok(ValidationEngine {
            catalog: self.catalog,
            registry,
            translations,
        })
    }
}

/// Validates resolver arguments and builds protocol errors
#[derive(Debug)]
pub struct ValidationEngine {
    catalog: Arc<TypeCatalog>,
    registry: Arc<FieldMetadataRegistry>,
    translations: Option<Translations>,
}

impl ValidationEngine {
    pub fn builder(catalog: Arc<TypeCatalog>) -> ValidationEngineBuilder {
        ValidationEngineBuilder {
            catalog,
            registry: None,
            translations: None,
        }
    }

    /// Engine without translations
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        let registry = Arc::new(FieldMetadataRegistry::new(Arc::clone(&catalog)));
        Self {
            catalog,
            registry,
            translations: None,
        }
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &FieldMetadataRegistry {
        &self.registry
    }

    pub fn translations(&self) -> Option<&Translations> {
        self.translations.as_ref()
    }

    /// Validate every argument of a field, stopping at the first failing one
    pub fn validate_arguments(&self, field: &FieldContext) -> std::result::Result<(), GraphQLError> {
        for argument in &field.arguments {
            self.validate_argument(field, argument)?;
        }
        Ok(())
    }

    /// Validate one argument; non-validatable arguments always pass
    pub fn validate_argument(
        &self,
        field: &FieldContext,
        argument: &ResolvedArgument,
    ) -> std::result::Result<(), GraphQLError> {
        let ArgumentValue::Validatable { type_name, value } = &argument.value else {
            return Ok(());
        };

        let evaluator = Evaluator::new(&self.catalog).with_signal(field.request.signal());
        match evaluator.validate(type_name, value) {
            Ok(()) => Ok(()),
            Err(Error::FieldValidation(errors)) => Err(self.report(field, type_name, &errors)),
            Err(err) => {
                warn!(argument = %argument.name, error = %err, "Validation aborted");
                Err(GraphQLError::new(err.to_string(), field.path.clone()))
            }
        }
    }

    /// Record all errors but the last on the request and return the last
    fn report(&self, field: &FieldContext, root_type: &str, errors: &ValidationErrors) -> GraphQLError {
        let translator = self
            .translations
            .as_ref()
            .and_then(|translations| translations.translator_for(&field.request));

        let mut converted: Vec<GraphQLError> = errors
            .iter()
            .map(|error| self.to_graphql_error(&field.path, root_type, error, translator))
            .collect();

        let Some(last) = converted.pop() else {
            return GraphQLError::new("validation failed", field.path.clone());
        };
        for error in converted {
            field.request.errors().push(error);
        }
        last
    }

    /// Convert one field error, resolving its path and message
    pub fn to_graphql_error(
        &self,
        field_path: &ResponsePath,
        root_type: &str,
        error: &FieldError,
        translator: Option<&Translator>,
    ) -> GraphQLError {
        let resolved = path::reconstruct(&self.registry, root_type, &error.namespace);
        let override_message = resolved
            .field
            .as_ref()
            .and_then(|field| field.override_message.as_deref());
        let message = resolve_message(error, override_message, translator);

        debug!(
            namespace = %error.namespace,
            rule = %error.tag,
            path = %resolved.path,
            "Converted field error"
        );

        let mut extensions = Map::new();
        extensions.insert("code".to_string(), Value::from(BAD_USER_INPUT));
        extensions.insert("field".to_string(), Value::from(error.field.as_str()));
        extensions.insert("rule".to_string(), Value::from(error.tag.as_str()));
        if let Some(param) = error.param() {
            extensions.insert("param".to_string(), Value::from(param));
        }

        GraphQLError {
            message,
            path: field_path.join(&resolved.path),
            extensions: Some(extensions),
        }
    }
}

/// Pick the message for a field error
pub fn resolve_message(
    error: &FieldError,
    override_message: Option<&str>,
    translator: Option<&Translator>,
) -> String {
    if let Some(message) = override_message.filter(|m| !m.is_empty()) {
        return message.to_string();
    }
    if let Some(message) = translator.and_then(|t| error.translate(t)) {
        return message;
    }
    fallback_message(error)
}

/// `"<field> failed on the '<rule>' rule"` with an optional param suffix
pub fn fallback_message(error: &FieldError) -> String {
    match error.param() {
        Some(param) => format!(
            "{} failed on the '{}' rule (param: {})",
            error.field, error.tag, param
        ),
        None => format!("{} failed on the '{}' rule", error.field, error.tag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::RequestContext;
    use crate::translation::TranslationRegistration;
    use crate::types::{FieldDescriptor, FieldType, TypeDescriptor};
    use serde_json::json;

    fn field_error(tag: &str, param: Option<&str>) -> FieldError {
        FieldError {
            namespace: "SimpleInput.Name".to_string(),
            wire_namespace: "SimpleInput.name".to_string(),
            field: "name".to_string(),
            struct_field: "Name".to_string(),
            tag: tag.to_string(),
            param: param.map(str::to_string),
            value: Value::Null,
        }
    }

    fn catalog() -> Arc<TypeCatalog> {
        Arc::new(
            TypeCatalog::new().with_type(
                TypeDescriptor::new("PairInput")
                    .field(
                        FieldDescriptor::new("First", FieldType::String)
                            .with_wire_name("first")
                            .with_rules("required"),
                    )
                    .field(
                        FieldDescriptor::new("Second", FieldType::String)
                            .with_wire_name("second")
                            .with_rules("min=3"),
                    ),
            ),
        )
    }

    #[test]
    fn test_fallback_message() {
        assert_eq!(
            fallback_message(&field_error("required", None)),
            "name failed on the 'required' rule"
        );
        assert_eq!(
            fallback_message(&field_error("min", Some("2"))),
            "name failed on the 'min' rule (param: 2)"
        );
        assert_eq!(
            fallback_message(&field_error("required", Some(""))),
            "name failed on the 'required' rule"
        );
    }

    #[test]
    fn test_message_precedence() {
        let error = field_error("required", None);
        let english = Translator::english();

        assert_eq!(
            resolve_message(&error, Some("custom"), Some(&english)),
            "custom"
        );
        assert_eq!(
            resolve_message(&error, Some(""), Some(&english)),
            "name is a required field"
        );
        assert_eq!(
            resolve_message(&field_error("frobnicate", None), None, Some(&english)),
            "name failed on the 'frobnicate' rule"
        );
    }

    #[test]
    fn test_last_error_returned_others_recorded() {
        let engine = ValidationEngine::new(catalog());
        let ctx = RequestContext::new();
        let field = FieldContext::new(ctx.clone(), ResponsePath::field("input")).with_argument(
            ResolvedArgument::classify("input", Some("PairInput"), json!({"first": "", "second": "ab"}), engine.catalog()),
        );

        let error = engine.validate_arguments(&field).unwrap_err();
        assert_eq!(error.message, "second failed on the 'min' rule (param: 3)");
        assert_eq!(error.path.to_string(), "input.second");
        assert_eq!(error.extension("param"), Some(&json!("3")));

        let recorded = ctx.errors().snapshot();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].message, "first failed on the 'required' rule");
        assert_eq!(recorded[0].code(), Some(BAD_USER_INPUT));
    }

    #[test]
    fn test_non_validatable_arguments_pass() {
        let engine = ValidationEngine::new(catalog());
        let field = FieldContext::new(RequestContext::new(), ResponsePath::field("items"))
            .with_argument(ResolvedArgument::classify("limit", None, json!(10), engine.catalog()));
        assert!(engine.validate_arguments(&field).is_ok());
    }

    #[test]
    fn test_list_of_inputs_is_skipped() {
        let engine = ValidationEngine::new(catalog());
        let inputs = json!([{"first": "a", "second": "abc"}]);
        let field = FieldContext::new(RequestContext::new(), ResponsePath::field("pairs"))
            .with_argument(ResolvedArgument::classify("inputs", Some("PairInput"), inputs, engine.catalog()));
        assert!(engine.validate_arguments(&field).is_ok());
    }

    #[test]
    fn test_internal_errors_are_generic() {
        let catalog = Arc::new(
            TypeCatalog::new().with_type(
                TypeDescriptor::new("BadInput").field(
                    FieldDescriptor::new("Name", FieldType::String).with_rules("frobnicate"),
                ),
            ),
        );
        let engine = ValidationEngine::new(catalog);
        let field = FieldContext::new(RequestContext::new(), ResponsePath::field("input"))
            .with_argument(ResolvedArgument::classify("input", Some("BadInput"), json!({"Name": "x"}), engine.catalog()));

        let error = engine.validate_arguments(&field).unwrap_err();
        assert_eq!(error.path, ResponsePath::field("input"));
        assert!(error.extensions.is_none());
        assert!(error.message.contains("frobnicate"));
    }

    #[test]
    fn test_builder_rejects_bad_translations() {
        let result = ValidationEngine::builder(catalog())
            .with_translations(TranslationConfig::new("de").register(TranslationRegistration::new("en", Translator::english())))
            .build();
        assert!(matches!(result, Err(Error::Translation { .. })));
    }
}
