//! End-to-end tests for argument validation
//!
//! These cover the full request path: classification, rule evaluation,
//! path reconstruction, message resolution and error aggregation.

mod test_support;

use gqlvalidate_core::{
    FieldContext, GraphQLError, RequestContext, ResolvedArgument, ResponsePath, TypeCatalog,
    ValidationEngine, ValidationMiddleware, BAD_USER_INPUT,
};
use serde_json::json;
use std::sync::Arc;
use test_support::*;
use tokio_util::sync::CancellationToken;

fn engine() -> ValidationEngine {
    ValidationEngine::new(Arc::new(catalog()))
}

fn field_for(ctx: RequestContext, argument: ResolvedArgument) -> FieldContext {
    FieldContext::new(ctx, ResponsePath::field("input")).with_argument(argument)
}

fn validate(engine: &ValidationEngine, argument: ResolvedArgument) -> Result<(), GraphQLError> {
    engine.validate_arguments(&field_for(RequestContext::new(), argument))
}

#[cfg(test)]
mod validate_tests {
    use super::*;

    #[test]
    fn test_simple_ok() {
        let input = SimpleInput {
            name: "Alice".to_string(),
            age: 0,
        };
        let argument = ResolvedArgument::validatable("input", &input).unwrap();
        assert!(validate(&engine(), argument).is_ok());
    }

    #[test]
    fn test_simple_missing_name_uses_override() {
        let argument = ResolvedArgument::validatable("input", &SimpleInput::default()).unwrap();
        let error = validate(&engine(), argument).unwrap_err();

        assert_eq!(error.message, "name must not be empty");
        assert_eq!(error.path.to_string(), "input.name");
        assert_eq!(error.code(), Some(BAD_USER_INPUT));
        assert_eq!(error.extension("field"), Some(&json!("name")));
        assert_eq!(error.extension("rule"), Some(&json!("required")));
        assert!(error.extension("param").is_none());
    }

    #[test]
    fn test_ownership_ok() {
        let input = OwnershipInput {
            user_owned: true,
            legal_name: None,
        };
        let argument = ResolvedArgument::validatable("input", &input).unwrap();
        assert!(validate(&engine(), argument).is_ok());
    }

    #[test]
    fn test_ownership_missing_legal_name() {
        let argument = ResolvedArgument::validatable("input", &OwnershipInput::default()).unwrap();
        let error = validate(&engine(), argument).unwrap_err();

        assert_eq!(
            error.message,
            "legalName failed on the 'required_if' rule (param: UserOwned false)"
        );
        assert_eq!(error.path.to_string(), "input.legalName");
        assert_eq!(error.extension("param"), Some(&json!("UserOwned false")));
    }

    #[test]
    fn test_nested_ok() {
        let input = NestedOuter {
            inner: NestedInner {
                message: "ok".to_string(),
            },
        };
        let argument = ResolvedArgument::validatable("input", &input).unwrap();
        assert!(validate(&engine(), argument).is_ok());
    }

    #[test]
    fn test_nested_too_short() {
        let input = NestedOuter {
            inner: NestedInner {
                message: "a".to_string(),
            },
        };
        let argument = ResolvedArgument::validatable("input", &input).unwrap();
        let error = validate(&engine(), argument).unwrap_err();

        assert_eq!(error.message, "message too short");
        assert_eq!(error.path.to_string(), "input.inner.message");
    }

    #[test]
    fn test_list_element() {
        let input = ListRoot {
            items: vec![NestedInner {
                message: "a".to_string(),
            }],
        };
        let argument = ResolvedArgument::validatable("input", &input).unwrap();
        let error = validate(&engine(), argument).unwrap_err();

        assert_eq!(error.message, "message too short");
        assert_eq!(error.path.to_string(), "input.items[0].message");
        assert_eq!(
            serde_json::to_value(&error.path).unwrap(),
            json!(["input", "items", 0, "message"])
        );
    }

    #[test]
    fn test_null_argument_is_skipped() {
        let catalog = catalog();
        let argument = ResolvedArgument::classify("input", Some("SimpleInput"), json!(null), &catalog);
        assert!(validate(&engine(), argument).is_ok());
    }
}

#[cfg(test)]
mod aggregation_tests {
    use super::*;

    #[test]
    fn test_only_last_error_terminates() {
        let engine = engine();
        let ctx = RequestContext::new();
        let input = ListRoot {
            items: vec![
                NestedInner {
                    message: "a".to_string(),
                },
                NestedInner {
                    message: "fine".to_string(),
                },
                NestedInner {
                    message: "b".to_string(),
                },
            ],
        };
        let field = field_for(ctx.clone(), ResolvedArgument::validatable("input", &input).unwrap());

        let error = engine.validate_arguments(&field).unwrap_err();
        assert_eq!(error.path.to_string(), "input.items[2].message");

        let recorded = ctx.errors().snapshot();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].path.to_string(), "input.items[0].message");
    }

    #[test]
    fn test_cancelled_request_yields_generic_error() {
        let token = CancellationToken::new();
        token.cancel();
        let ctx = RequestContext::new().with_cancellation(token);
        let field = field_for(
            ctx.clone(),
            ResolvedArgument::validatable("input", &SimpleInput::default()).unwrap(),
        );

        let error = engine().validate_arguments(&field).unwrap_err();
        assert_eq!(error.path, ResponsePath::field("input"));
        assert!(error.code().is_none());
        assert!(error.message.contains("cancelled"));
        assert!(ctx.errors().is_empty());
    }

    #[test]
    fn test_end_to_end_min_and_required() {
        let catalog = TypeCatalog::from_json(
            r#"{
                "types": {
                    "ProfileInput": {
                        "name": "ProfileInput",
                        "fields": [{
                            "ident": "Name",
                            "wire_name": "name",
                            "field_type": {"kind": "optional", "of": {"kind": "string"}},
                            "rules": "min=2,required",
                            "message": "name is required"
                        }]
                    }
                }
            }"#,
        )
        .unwrap();
        let engine = ValidationEngine::new(Arc::new(catalog));
        let ctx = RequestContext::new();
        let argument = ResolvedArgument::classify(
            "input",
            Some("ProfileInput"),
            json!({"name": ""}),
            engine.catalog(),
        );
        let field = FieldContext::new(ctx.clone(), ResponsePath::new()).with_argument(argument);

        let error = engine.validate_arguments(&field).unwrap_err();
        assert_eq!(error.message, "name is required");
        assert_eq!(error.path, ResponsePath::field("name"));
        assert_eq!(error.extension("rule"), Some(&json!("min")));
        assert!(ctx.errors().is_empty());
    }
}

#[cfg(test)]
mod translation_tests {
    use super::*;

    fn translated_engine() -> ValidationEngine {
        ValidationEngine::builder(Arc::new(catalog()))
            .with_translations(translation_config())
            .build()
            .unwrap()
    }

    fn validate_with_locale(locale: &str, argument: ResolvedArgument) -> GraphQLError {
        let ctx = RequestContext::new().with_locale(locale);
        translated_engine()
            .validate_arguments(&field_for(ctx, argument))
            .unwrap_err()
    }

    #[test]
    fn test_uses_requested_translator() {
        let argument = ResolvedArgument::validatable("input", &TranslationInput::default()).unwrap();
        let error = validate_with_locale("ro", argument);
        assert_eq!(error.message, "name trebuie completat");
        assert_eq!(error.path.to_string(), "input.name");
    }

    #[test]
    fn test_falls_back_to_default_translator() {
        let argument = ResolvedArgument::validatable("input", &TranslationInput::default()).unwrap();
        let error = validate_with_locale("fr", argument);
        assert_eq!(error.message, "name is required (en)");
        assert_eq!(error.path.to_string(), "input.name");
    }

    #[test]
    fn test_directive_message_overrides_translations() {
        let argument = ResolvedArgument::validatable("input", &SimpleInput::default()).unwrap();
        let error = validate_with_locale("ro", argument);
        assert_eq!(error.message, "name must not be empty");
    }

    #[test]
    fn test_custom_selector() {
        let config = translation_config().with_selector(|_| Some("ro".to_string()));
        let engine = ValidationEngine::builder(Arc::new(catalog()))
            .with_translations(config)
            .build()
            .unwrap();
        let argument = ResolvedArgument::validatable("input", &TranslationInput::default()).unwrap();

        let error = engine
            .validate_arguments(&field_for(RequestContext::new(), argument))
            .unwrap_err();
        assert_eq!(error.message, "name trebuie completat");
    }
}

#[cfg(test)]
mod middleware_tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_valid_arguments_run_resolver() {
        let middleware = ValidationMiddleware::new(Arc::new(engine()));
        let input = SimpleInput {
            name: "Alice".to_string(),
            age: 30,
        };
        let field = field_for(
            RequestContext::new(),
            ResolvedArgument::validatable("input", &input).unwrap(),
        );

        let called = AtomicBool::new(false);
        let result = middleware
            .around_field(&field, || async {
                called.store(true, Ordering::SeqCst);
                Ok::<_, GraphQLError>("ok")
            })
            .await;

        assert_eq!(result.unwrap(), "ok");
        assert!(called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_invalid_arguments_short_circuit() {
        let middleware = ValidationMiddleware::new(Arc::new(engine()));
        let field = field_for(
            RequestContext::new(),
            ResolvedArgument::validatable("input", &SimpleInput::default()).unwrap(),
        );

        let called = AtomicBool::new(false);
        let result = middleware
            .around_field(&field, || async {
                called.store(true, Ordering::SeqCst);
                Ok::<_, GraphQLError>("ok")
            })
            .await;

        assert!(result.is_err());
        assert!(!called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_engine() {
        let middleware = ValidationMiddleware::new(Arc::new(engine()));
        let mut handles = Vec::new();

        for i in 0..16 {
            let middleware = middleware.clone();
            handles.push(tokio::spawn(async move {
                let input = NestedOuter {
                    inner: NestedInner {
                        message: if i % 2 == 0 { "a".to_string() } else { "long".to_string() },
                    },
                };
                let field = field_for(
                    RequestContext::new(),
                    ResolvedArgument::validatable("input", &input).unwrap(),
                );
                middleware
                    .around_field(&field, || async { Ok::<_, GraphQLError>(i) })
                    .await
                    .is_ok()
            }));
        }

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.await.unwrap(), i % 2 == 1);
        }
        assert_eq!(middleware.engine().registry().stats().cached_types, 2);
    }
}
