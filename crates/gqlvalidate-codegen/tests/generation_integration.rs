//! End-to-end tests for the generation pipeline
//!
//! Schemas go through collection, compilation, model generation and
//! emission; the emitted manifest is then fed back into the runtime engine.

use gqlvalidate_codegen::templates::GENERATED_HEADER;
use gqlvalidate_codegen::{
    Error, FsArtifactWriter, Generator, GeneratorConfig, MemoryArtifactWriter, Schema,
};
use gqlvalidate_core::{
    FieldContext, RequestContext, ResolvedArgument, ResponsePath, TypeCatalog, ValidationEngine,
};
use serde_json::json;
use std::sync::Arc;

const SCHEMA: &str = r#"
input SignupInput {
    name: String @validate(rule: "min=2,required", message: "name is required")
    nickname: String
}

input OwnershipInput {
    userOwned: Boolean!
    legalName: String @validate(rule: "required_if=userOwned false")
}

input SearchInput {
    term: String
}

type Mutation {
    signup(input: SignupInput!): Boolean!
    own(input: OwnershipInput!): Boolean!
}
"#;

fn generate_in_memory(sdl: &str) -> (gqlvalidate_codegen::GenerationReport, MemoryArtifactWriter, GeneratorConfig) {
    let config = GeneratorConfig::default();
    let mut writer = MemoryArtifactWriter::new();
    let report = Generator::new(config.clone())
        .run(Schema::parse(sdl).unwrap(), &mut writer)
        .unwrap();
    (report, writer, config)
}

fn validate_input(catalog: TypeCatalog, type_name: &str, input: serde_json::Value) -> Vec<gqlvalidate_core::GraphQLError> {
    let engine = ValidationEngine::new(Arc::new(catalog));
    let ctx = RequestContext::new();
    let argument = ResolvedArgument::classify("input", Some(type_name), input, engine.catalog());
    let field = FieldContext::new(ctx.clone(), ResponsePath::new()).with_argument(argument);

    let mut errors = ctx.errors().snapshot();
    if let Err(error) = engine.validate_arguments(&field) {
        errors = ctx.errors().snapshot();
        errors.push(error);
    }
    errors
}

#[cfg(test)]
mod report_tests {
    use super::*;

    #[test]
    fn test_report_lists_types_markers_and_rules() {
        let (report, _, config) = generate_in_memory(SCHEMA);

        assert_eq!(report.types, vec!["OwnershipInput", "SearchInput", "SignupInput"]);
        assert_eq!(report.markers, vec!["OwnershipInput", "SignupInput"]);
        assert_eq!(report.compiled_rules, 2);
        assert!(report.unknown_rules.is_empty());
        assert!(report.runtime_directives.is_empty());
        assert_eq!(
            report.written,
            vec![config.models_path(), config.manifest_path(), config.markers_path()]
        );

        let legal = report.rules.iter().find(|r| r.field_name == "legalName").unwrap();
        assert_eq!(legal.rule, "required_if=UserOwned false");
    }

    #[test]
    fn test_artifacts_carry_header_and_markers() {
        let (_, writer, config) = generate_in_memory(SCHEMA);

        let models = writer.get(&config.models_path()).unwrap();
        assert!(models.starts_with(GENERATED_HEADER));
        assert!(models.contains("pub struct SignupInput {"));
        assert!(models.contains("#[serde(rename = \"legalName\")]\n    pub legal_name: Option<String>,"));
        assert!(models.contains("const TYPE_NAME: &'static str = \"OwnershipInput\";"));

        let markers = writer.get(&config.markers_path()).unwrap();
        assert!(markers.contains("impl Validatable for OwnershipInput {}"));
        assert!(markers.contains("impl Validatable for SignupInput {}"));
        assert!(!markers.contains("SearchInput"));
    }

    #[test]
    fn test_unknown_rules_reported() {
        let (report, _, _) = generate_in_memory(r#"input T { f: String @validate(rule: "required,sparkly") }"#);
        assert_eq!(report.unknown_rules.len(), 1);
        assert_eq!(report.unknown_rules[0].field, "T.f");
        assert_eq!(report.unknown_rules[0].rule, "sparkly");
    }

    #[test]
    fn test_user_directives_need_runtime() {
        let (report, _, _) = generate_in_memory(
            r#"directive @auth on FIELD_DEFINITION
               input T { f: String @validate(rule: "required") }"#,
        );
        assert_eq!(report.runtime_directives, vec!["auth"]);
    }
}

#[cfg(test)]
mod failure_tests {
    use super::*;

    #[test]
    fn test_annotation_error_writes_nothing() {
        let mut writer = MemoryArtifactWriter::new();
        let err = Generator::new(GeneratorConfig::default())
            .run(
                Schema::parse(r#"input BadInput { name: String @validate(rule: "") }"#).unwrap(),
                &mut writer,
            )
            .unwrap_err();

        assert_eq!(err.to_string(), "@validate on BadInput.name requires a rule");
        assert_eq!(writer.files().count(), 0);
    }

    #[test]
    fn test_missing_schema_config() {
        let err = Generator::new(GeneratorConfig::default())
            .generate(&mut MemoryArtifactWriter::new())
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}

#[cfg(test)]
mod filesystem_tests {
    use super::*;

    #[test]
    fn test_stale_markers_removed_on_regeneration() {
        let dir = tempfile::tempdir().unwrap();
        let schema_path = dir.path().join("schema.graphql");
        std::fs::write(&schema_path, SCHEMA).unwrap();

        let config = GeneratorConfig {
            schema: vec![schema_path.clone()],
            output_dir: dir.path().join("generated"),
            ..GeneratorConfig::default()
        };
        let generator = Generator::new(config.clone());

        let report = generator.generate(&mut FsArtifactWriter).unwrap();
        assert!(config.markers_path().exists());
        assert!(report.removed.is_empty());

        std::fs::write(&schema_path, "input PlainInput { note: String }").unwrap();
        let report = generator.generate(&mut FsArtifactWriter).unwrap();
        assert!(!config.markers_path().exists());
        assert_eq!(report.removed, vec![config.markers_path()]);
        assert!(report.markers.is_empty());
    }

    #[test]
    fn test_manifest_loads_into_runtime_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let schema_path = dir.path().join("schema.graphql");
        std::fs::write(&schema_path, SCHEMA).unwrap();

        let config = GeneratorConfig {
            schema: vec![schema_path],
            output_dir: dir.path().to_path_buf(),
            ..GeneratorConfig::default()
        };
        Generator::new(config.clone()).generate(&mut FsArtifactWriter).unwrap();

        let catalog = TypeCatalog::from_file(&config.manifest_path()).unwrap();
        assert!(catalog.is_validatable("SignupInput"));
        assert!(!catalog.is_validatable("SearchInput"));
    }
}

#[cfg(test)]
mod runtime_tests {
    use super::*;

    fn generated_catalog() -> TypeCatalog {
        let (_, writer, config) = generate_in_memory(SCHEMA);
        TypeCatalog::from_json(writer.get(&config.manifest_path()).unwrap()).unwrap()
    }

    #[test]
    fn test_empty_name_reports_override_message() {
        let errors = validate_input(generated_catalog(), "SignupInput", json!({"name": ""}));

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "name is required");
        assert_eq!(errors[0].path, ResponsePath::field("name"));
        assert_eq!(errors[0].extension("rule"), Some(&json!("min")));
    }

    #[test]
    fn test_required_if_on_compiled_identifier() {
        let errors = validate_input(
            generated_catalog(),
            "OwnershipInput",
            json!({"userOwned": false, "legalName": null}),
        );

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, ResponsePath::field("legalName"));
        assert_eq!(errors[0].extension("rule"), Some(&json!("required_if")));
        assert_eq!(
            errors[0].message,
            "legalName failed on the 'required_if' rule (param: UserOwned false)"
        );

        let errors = validate_input(
            generated_catalog(),
            "OwnershipInput",
            json!({"userOwned": true, "legalName": null}),
        );
        assert!(errors.is_empty());
    }
}
