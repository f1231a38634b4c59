//! Rust source templates for generated artifacts
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::config::GeneratorConfig;
use crate::generator::{GeneratedField, GeneratedModel};

/// First line of every generated artifact
pub const GENERATED_HEADER: &str = "// Code generated by gqlvalidate. DO NOT EDIT.";

/// Renders generated Rust sources
pub struct Template;

impl Template {
    /// Generated-file header followed by a blank line
    pub fn header() -> String {
        format!("{}\n\n", GENERATED_HEADER)
    }

    /// `///` lines for an optional description
    pub fn doc_comment(description: Option<&str>, indent: &str) -> String {
        let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) else {
            return String::new();
        };
        description
            .lines()
            .map(|line| {
                let line = line.trim_end();
                if line.is_empty() {
                    format!("{}///\n", indent)
                } else {
                    format!("{}/// {}\n", indent, line)
                }
            })
            .collect()
    }

    /// One struct field with its serde attributes
    pub fn field(field: &GeneratedField) -> String {
        let mut result = Self::doc_comment(field.description.as_deref(), "    ");
        if field.bare_rust_name() != field.wire_name() {
            result.push_str(&format!("    #[serde(rename = \"{}\")]\n", field.wire_name()));
        }
        result.push_str(&format!("    pub {}: {},\n", field.rust_name, field.rust_type));
        result
    }

    /// Model struct plus its `InputObject` impl
    pub fn model(model: &GeneratedModel) -> String {
        let mut result = Self::doc_comment(model.description.as_deref(), "");
        result.push_str("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]\n");
        result.push_str(&format!("pub struct {} {{\n", model.name));
        for field in &model.fields {
            result.push_str(&Self::field(field));
        }
        result.push_str("}\n\n");

        result.push_str(&format!("impl InputObject for {} {{\n", model.name));
        result.push_str(&format!("    const TYPE_NAME: &'static str = \"{}\";\n", model.name));
        result.push_str("}\n\n");
        result
    }

    /// Whole models file: every model and the catalog loader
    pub fn models(config: &GeneratorConfig, models: &[GeneratedModel]) -> String {
        let mut result = Self::header();
        result.push_str("use serde::{Deserialize, Serialize};\n");
        result.push_str(&format!("use {}::{{InputObject, TypeCatalog}};\n\n", config.core_crate));

        for model in models {
            result.push_str(&Self::model(model));
        }

        result.push_str("/// Descriptor manifest of every generated input type\n");
        result.push_str(&format!(
            "pub const RULES_MANIFEST: &str = include_str!(\"{}\");\n\n",
            config.manifest_file
        ));
        result.push_str("/// Type catalog consumed by the validation engine\n");
        result.push_str(&format!(
            "pub fn type_catalog() -> {}::Result<TypeCatalog> {{\n",
            config.core_crate
        ));
        result.push_str("    TypeCatalog::from_json(RULES_MANIFEST)\n");
        result.push_str("}\n");
        result
    }

    /// `impl Validatable` for every marker type, in the given order
    pub fn markers(config: &GeneratorConfig, types: &[&str]) -> String {
        let mut result = Self::header();
        result.push_str(&format!("use {}::Validatable;\n\n", config.core_crate));
        result.push_str(&format!(
            "use super::{}::{{{}}};\n\n",
            config.models_module(),
            types.join(", ")
        ));
        for type_name in types {
            result.push_str(&format!("impl Validatable for {} {{}}\n", type_name));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::FieldTags;
    use gqlvalidate_core::FieldType;

    fn field(schema_name: &str, rust_name: &str, rust_type: &str) -> GeneratedField {
        let mut tags = FieldTags::new();
        tags.set("json", schema_name);
        GeneratedField {
            schema_name: schema_name.to_string(),
            ident: schema_name.to_string(),
            rust_name: rust_name.to_string(),
            rust_type: rust_type.to_string(),
            field_type: FieldType::String,
            description: None,
            tags,
        }
    }

    #[test]
    fn test_field_rename_only_when_needed() {
        assert_eq!(
            Template::field(&field("legalName", "legal_name", "Option<String>")),
            "    #[serde(rename = \"legalName\")]\n    pub legal_name: Option<String>,\n"
        );
        assert_eq!(Template::field(&field("name", "name", "String")), "    pub name: String,\n");
        assert_eq!(Template::field(&field("type", "r#type", "String")), "    pub r#type: String,\n");
    }

    #[test]
    fn test_markers_file() {
        let rendered = Template::markers(&GeneratorConfig::default(), &["AInput", "BInput"]);
        assert!(rendered.starts_with(GENERATED_HEADER));
        assert!(rendered.contains("use super::models_gen::{AInput, BInput};"));
        assert!(rendered.contains("impl Validatable for AInput {}\nimpl Validatable for BInput {}\n"));
    }

    #[test]
    fn test_doc_comment_lines() {
        assert_eq!(Template::doc_comment(Some("a\n\nb"), ""), "/// a\n///\n/// b\n");
        assert_eq!(Template::doc_comment(Some("  "), ""), "");
        assert_eq!(Template::doc_comment(None, "    "), "");
    }
}
