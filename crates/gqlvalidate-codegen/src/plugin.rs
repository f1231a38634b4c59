//! `@validate` generation plugin
//!
//! Lifecycle, in the order the generator drives it:
//! 1. [`ValidatePlugin::mutate_config`] marks the directive as needing no
//!    runtime handler
//! 2. [`ValidatePlugin::mutate_schema`] registers the directive definition,
//!    collects annotations and seeds the field name map
//! 3. [`FieldHook::begin_type`] refines the map with every identifier of a
//!    type before any of its rules is rewritten
//! 4. [`FieldHook::mutate_field`] compiles the field's rule and attaches the
//!    `validate` and `message` tags
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::collector::{self, Annotations, Compilation, CompiledRule, MarkerSet, DIRECTIVE_NAME};
use crate::config::{DirectiveConfig, GeneratorConfig};
use crate::generator::{FieldHook, GeneratedField, MESSAGE_TAG, VALIDATE_TAG};
use crate::naming::{FieldNameMap, NamingConvention};
use crate::schema::{DirectiveDef, FieldDef, InputValueDef, Schema, TypeDef, TypeRef};
use crate::Result;
use tracing::{debug, warn};

/// Collects, compiles and attaches `@validate` rules
#[derive(Debug, Clone)]
pub struct ValidatePlugin {
    convention: NamingConvention,
    annotations: Annotations,
    names: FieldNameMap,
    compiled: Vec<CompiledRule>,
    markers: MarkerSet,
}

impl ValidatePlugin {
    pub const NAME: &'static str = "gqlvalidate";

    pub fn new(convention: NamingConvention) -> Self {
        Self {
            convention,
            annotations: Annotations::default(),
            names: FieldNameMap::new(),
            compiled: Vec::new(),
            markers: MarkerSet::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    /// `directive @validate(rule: String!, message: String) on INPUT_FIELD_DEFINITION`
    pub fn directive_definition() -> DirectiveDef {
        DirectiveDef::new(DIRECTIVE_NAME)
            .with_argument(InputValueDef::new(
                collector::RULE_ARGUMENT,
                TypeRef::non_null(TypeRef::named("String")),
            ))
            .with_argument(InputValueDef::new(collector::MESSAGE_ARGUMENT, TypeRef::named("String")))
            .with_location("INPUT_FIELD_DEFINITION")
    }

    /// Mark the directive as compile-time only, unless configured already
    pub fn mutate_config(&self, config: &mut GeneratorConfig) {
        config
            .directives
            .entry(DIRECTIVE_NAME.to_string())
            .or_insert(DirectiveConfig { skip_runtime: true });
    }

    /// Register the directive and collect every annotation
    pub fn mutate_schema(&mut self, schema: &mut Schema) -> Result<()> {
        if schema.add_directive(Self::directive_definition()) {
            debug!("Registered @{} directive definition", DIRECTIVE_NAME);
        }

        self.annotations = collector::collect(schema)?;
        self.names = FieldNameMap::seed(schema, self.convention);
        self.compiled.clear();
        self.markers = MarkerSet::new();
        Ok(())
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn names(&self) -> &FieldNameMap {
        &self.names
    }

    /// Rules compiled so far, in generation order
    pub fn compiled(&self) -> &[CompiledRule] {
        &self.compiled
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn into_compilation(self) -> Compilation {
        Compilation {
            rules: self.compiled,
            markers: self.markers,
        }
    }
}

impl FieldHook for ValidatePlugin {
    fn begin_type(&mut self, type_def: &TypeDef, fields: &[GeneratedField]) -> Result<()> {
        for field in fields {
            self.names.refine(&type_def.name, &field.schema_name, &field.ident);
        }
        Ok(())
    }

    fn mutate_field(
        &mut self,
        type_def: &TypeDef,
        field_def: &FieldDef,
        mut generated: GeneratedField,
    ) -> Result<GeneratedField> {
        self.names.refine(&type_def.name, &field_def.name, &generated.ident);

        let Some(annotation) = self.annotations.get(&type_def.name, &field_def.name) else {
            return Ok(generated);
        };
        let compiled = CompiledRule::compile(annotation, &self.names);

        for rule in compiled.unknown_rules() {
            warn!(
                type_name = %type_def.name,
                field = %field_def.name,
                rule = %rule,
                "Rule is not known to the runtime evaluator"
            );
        }

        generated.tags.set(VALIDATE_TAG, compiled.rule.clone());
        if let Some(message) = &compiled.message {
            generated.tags.set(MESSAGE_TAG, message.clone());
        }
        if !compiled.rule.is_empty() {
            self.markers.insert(type_def.name.clone());
        }
        self.compiled.push(compiled);
        Ok(generated)
    }
}
