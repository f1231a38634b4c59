//! Model generator
//!
//! Produces one [`GeneratedModel`] per input object type. Every field is
//! passed through a [`FieldHook`] before it is final, which is where the
//! validation plugin attaches compiled rules.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::config::GeneratorConfig;
use crate::naming::rust_field_name;
use crate::schema::{FieldDef, Schema, TypeDef, TypeKind, TypeRef};
use crate::Result;
use gqlvalidate_core::{FieldDescriptor, FieldType, TypeCatalog, TypeDescriptor};
use serde::Serialize;
use tracing::debug;

/// Tag holding the wire name
pub const JSON_TAG: &str = "json";
/// Tag holding the compiled rule
pub const VALIDATE_TAG: &str = "validate";
/// Tag holding the override message
pub const MESSAGE_TAG: &str = "message";

/// Ordered key/value metadata attached to a generated field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldTags(Vec<(String, String)>);

impl FieldTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the value of `key`, or append it
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A field of a generated model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedField {
    /// Schema name, also the wire name
    pub schema_name: String,
    /// Identifier used in validation namespaces
    pub ident: String,
    /// Rust struct field name
    pub rust_name: String,
    pub rust_type: String,
    pub field_type: FieldType,
    pub description: Option<String>,
    pub tags: FieldTags,
}

impl GeneratedField {
    pub fn descriptor(&self) -> FieldDescriptor {
        let mut descriptor =
            FieldDescriptor::new(self.ident.clone(), self.field_type.clone()).with_wire_name(self.wire_name());
        if let Some(rules) = self.tags.get(VALIDATE_TAG) {
            descriptor = descriptor.with_rules(rules);
        }
        if let Some(message) = self.tags.get(MESSAGE_TAG) {
            descriptor = descriptor.with_message(message);
        }
        descriptor
    }

    pub fn wire_name(&self) -> &str {
        self.tags.get(JSON_TAG).unwrap_or(self.schema_name.as_str())
    }

    /// Rust name without a raw identifier prefix
    pub fn bare_rust_name(&self) -> &str {
        self.rust_name.strip_prefix("r#").unwrap_or(self.rust_name.as_str())
    }
}

/// A generated input model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedModel {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<GeneratedField>,
}

impl GeneratedModel {
    pub fn descriptor(&self) -> TypeDescriptor {
        self.fields
            .iter()
            .fold(TypeDescriptor::new(self.name.clone()), |descriptor, field| {
                descriptor.field(field.descriptor())
            })
    }

    pub fn has_rules(&self) -> bool {
        self.fields.iter().any(|field| field.tags.get(VALIDATE_TAG).is_some())
    }
}

/// Catalog manifest describing every generated model
pub fn catalog(models: &[GeneratedModel]) -> TypeCatalog {
    models
        .iter()
        .fold(TypeCatalog::new(), |catalog, model| catalog.with_type(model.descriptor()))
}

/// Hook invoked while models are generated
pub trait FieldHook {
    /// Called once per type with every base field, before any field is mutated
    fn begin_type(&mut self, _type_def: &TypeDef, _fields: &[GeneratedField]) -> Result<()> {
        Ok(())
    }

    /// Adjust one generated field
    fn mutate_field(
        &mut self,
        type_def: &TypeDef,
        field_def: &FieldDef,
        generated: GeneratedField,
    ) -> Result<GeneratedField>;
}

/// Generates the host models for every input object type
#[derive(Debug, Clone, Copy)]
pub struct ModelGenerator<'c> {
    config: &'c GeneratorConfig,
}

impl<'c> ModelGenerator<'c> {
    pub fn new(config: &'c GeneratorConfig) -> Self {
        Self { config }
    }

    /// Models sorted by type name
    pub fn generate(&self, schema: &Schema, hook: &mut dyn FieldHook) -> Result<Vec<GeneratedModel>> {
        let mut models = Vec::new();

        for def in schema.input_objects() {
            let base: Vec<GeneratedField> = def
                .fields
                .iter()
                .map(|field| self.base_field(schema, def, field))
                .collect();
            hook.begin_type(def, &base)?;

            let mut fields = Vec::with_capacity(base.len());
            for (field_def, generated) in def.fields.iter().zip(base) {
                fields.push(hook.mutate_field(def, field_def, generated)?);
            }

            debug!(type_name = %def.name, fields = fields.len(), "Generated model");
            models.push(GeneratedModel {
                name: def.name.clone(),
                description: def.description.clone(),
                fields,
            });
        }
        Ok(models)
    }

    /// Field before any hook ran
    pub fn base_field(&self, schema: &Schema, type_def: &TypeDef, field: &FieldDef) -> GeneratedField {
        let ident = self
            .config
            .identifier(&type_def.name, &field.name)
            .map(str::to_string)
            .unwrap_or_else(|| self.config.naming.apply(&field.name));

        let mut tags = FieldTags::new();
        tags.set(JSON_TAG, field.name.clone());

        GeneratedField {
            schema_name: field.name.clone(),
            ident,
            rust_name: rust_field_name(&field.name),
            rust_type: rust_type(schema, &field.field_type),
            field_type: field_type(schema, &field.field_type),
            description: field.description.clone(),
            tags,
        }
    }
}

/// Runtime type of a schema type reference
pub fn field_type(schema: &Schema, type_ref: &TypeRef) -> FieldType {
    match type_ref {
        TypeRef::NonNull(inner) => required_field_type(schema, inner),
        other => FieldType::optional(required_field_type(schema, other)),
    }
}

fn required_field_type(schema: &Schema, type_ref: &TypeRef) -> FieldType {
    match type_ref {
        TypeRef::NonNull(inner) => required_field_type(schema, inner),
        TypeRef::List(element) => FieldType::list(field_type(schema, element)),
        TypeRef::Named(name) => match name.as_str() {
            "String" => FieldType::String,
            "Int" => FieldType::Int,
            "Float" => FieldType::Float,
            "Boolean" => FieldType::Boolean,
            "ID" => FieldType::Id,
            _ => match schema.get_type(name).map(|def| def.kind) {
                Some(TypeKind::Enum) => FieldType::Enum(name.clone()),
                Some(TypeKind::InputObject) => FieldType::object(name.clone()),
                _ => FieldType::Scalar(name.clone()),
            },
        },
    }
}

/// Rust type of a schema type reference
pub fn rust_type(schema: &Schema, type_ref: &TypeRef) -> String {
    match type_ref {
        TypeRef::NonNull(inner) => required_rust_type(schema, inner),
        TypeRef::Named(name) if schema.is_input_object(name) => format!("Option<Box<{}>>", name),
        other => format!("Option<{}>", required_rust_type(schema, other)),
    }
}

fn required_rust_type(schema: &Schema, type_ref: &TypeRef) -> String {
    match type_ref {
        TypeRef::NonNull(inner) => required_rust_type(schema, inner),
        TypeRef::List(element) => format!("Vec<{}>", rust_type(schema, element)),
        TypeRef::Named(name) => match name.as_str() {
            "String" | "ID" => "String".to_string(),
            "Int" => "i32".to_string(),
            "Float" => "f64".to_string(),
            "Boolean" => "bool".to_string(),
            _ => match schema.get_type(name).map(|def| def.kind) {
                Some(TypeKind::Enum) => "String".to_string(),
                Some(TypeKind::InputObject) => name.clone(),
                _ => "serde_json::Value".to_string(),
            },
        },
    }
}
