//! Validate command handler

use super::utils::{load_value, require_file};
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, ErrorContext, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use gqlvalidate_core::{
    FieldContext, GraphQLError, RequestContext, ResolvedArgument, ResponsePath, TypeCatalog,
    ValidationEngine, ValidationMiddleware,
};
use std::sync::Arc;
use tracing::debug;

/// Handle the validate command
///
/// The input runs through the same interceptor a server would use, so the
/// printed errors are exactly what a client would receive.
pub async fn handle_validate(
    args: ValidateArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::with_details("validate", &args.type_name);

    require_file(&args.manifest)?;
    let catalog = TypeCatalog::from_file(&args.manifest)
        .with_context(|| format!("Failed to load manifest {}", args.manifest.display()))?;
    if catalog.get(&args.type_name).is_none() {
        return Err(Error::TypeNotFound {
            type_name: args.type_name,
            manifest: args.manifest,
        });
    }
    if !catalog.is_validatable(&args.type_name) {
        output.warning(&format!("{} carries no rules; nothing to validate", args.type_name))?;
    }

    let engine = ValidationEngine::builder(Arc::new(catalog))
        .with_translations(config.translations.to_translation_config()?)
        .build()?;

    let value = load_value(&args.input)?;
    if !value.is_object() {
        return Err(Error::InvalidFormat {
            path: args.input,
            expected: "JSON or YAML object".to_string(),
        });
    }
    let mut request = RequestContext::new();
    if let Some(locale) = &args.locale {
        request = request.with_locale(locale.clone());
    }

    let argument = ResolvedArgument::classify(
        args.argument.clone(),
        Some(&args.type_name),
        value,
        engine.catalog(),
    );
    let field = FieldContext::new(request.clone(), ResponsePath::new()).with_argument(argument);

    output.info(&format!("Validating {} as {}", args.input.display(), args.type_name))?;
    let middleware = ValidationMiddleware::new(Arc::new(engine));
    let outcome = middleware
        .around_field(&field, || async { Ok::<(), GraphQLError>(()) })
        .await;

    let mut errors = request.errors().take();
    if let Err(error) = outcome {
        errors.push(error);
    }
    debug!(errors = errors.len(), "Validation finished");

    output.graphql_errors(&errors)?;
    if errors.is_empty() {
        output.success("✓ Input is valid")
    } else {
        Err(Error::ValidationFailed { count: errors.len() })
    }
}
