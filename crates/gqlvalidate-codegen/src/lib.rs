//! gqlvalidate code generation
//!
//! Reads GraphQL SDL, collects `@validate(rule: "...", message: "...")`
//! annotations on input fields, rewrites the field references inside each
//! rule to generated identifiers and emits:
//!
//! - `models_gen.rs`: serde models with `InputObject` impls and a catalog loader
//! - `rules_gen.json`: the type catalog manifest read by the runtime
//! - `validatable_gen.rs`: `impl Validatable` for every type carrying a rule,
//!   removed when there is none
//!
//! # Example
//!
//! ```no_run
//! use gqlvalidate_codegen::{FsArtifactWriter, Generator, GeneratorConfig};
//!
//! let config = GeneratorConfig {
//!     schema: vec!["schema.graphql".into()],
//!     ..GeneratorConfig::default()
//! };
//! let report = Generator::new(config).generate(&mut FsArtifactWriter)?;
//! println!("{} rules compiled", report.compiled_rules);
//! # Ok::<(), gqlvalidate_codegen::Error>(())
//! ```
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

pub mod collector;
pub mod config;
pub mod emit;
pub mod error;
pub mod generator;
pub mod grammar;
pub mod naming;
pub mod plugin;
pub mod schema;
pub mod templates;

pub use collector::{collect, Annotations, Compilation, CompiledRule, MarkerSet, RuleAnnotation};
pub use config::{DirectiveConfig, GeneratorConfig};
pub use emit::{emit, ArtifactWriter, Emitted, FsArtifactWriter, MemoryArtifactWriter};
pub use error::{Error, Result};
pub use generator::{FieldHook, FieldTags, GeneratedField, GeneratedModel, ModelGenerator};
pub use grammar::{rewrite_rule, RuleFamily};
pub use naming::{FieldNameMap, NamingConvention};
pub use plugin::ValidatePlugin;
pub use schema::Schema;

use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Version of the codegen crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A rule name the runtime evaluator does not implement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownRule {
    /// `Type.field`
    pub field: String,
    pub rule: String,
}

/// Outcome of one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Generated model types, sorted
    pub types: Vec<String>,
    /// Types marked validatable, sorted
    pub markers: Vec<String>,
    pub compiled_rules: usize,
    pub rules: Vec<CompiledRule>,
    pub unknown_rules: Vec<UnknownRule>,
    pub written: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
    /// Schema directives without `skip_runtime`
    pub runtime_directives: Vec<String>,
}

/// Drives schema loading, the plugin lifecycle and artifact emission
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Parse every configured schema file
    pub fn load_schema(&self) -> Result<Schema> {
        self.config.validate()?;
        Schema::from_files(&self.config.schema)
    }

    /// Load the configured schema and run the whole pipeline
    pub fn generate(&self, writer: &mut dyn ArtifactWriter) -> Result<GenerationReport> {
        let schema = self.load_schema()?;
        self.run(schema, writer)
    }

    /// Run the pipeline on an already parsed schema
    ///
    /// Nothing is written when collection fails.
    pub fn run(&self, mut schema: Schema, writer: &mut dyn ArtifactWriter) -> Result<GenerationReport> {
        let mut config = self.config.clone();
        let mut plugin = ValidatePlugin::new(config.naming);

        plugin.mutate_config(&mut config);
        plugin.mutate_schema(&mut schema)?;
        let models = ModelGenerator::new(&config).generate(&schema, &mut plugin)?;

        let compilation = plugin.into_compilation();
        let emitted = emit(&config, &models, &compilation.markers, writer)?;

        let report = GenerationReport {
            types: models.iter().map(|model| model.name.clone()).collect(),
            markers: compilation.markers.to_vec(),
            compiled_rules: compilation.rules.len(),
            unknown_rules: compilation
                .unknown_rules()
                .into_iter()
                .map(|(field, rule)| UnknownRule { field, rule })
                .collect(),
            rules: compilation.rules,
            written: emitted.written,
            removed: emitted.removed,
            runtime_directives: schema
                .directives()
                .map(|directive| directive.name.clone())
                .filter(|name| !config.skips_runtime(name))
                .collect(),
        };

        info!(
            types = report.types.len(),
            markers = report.markers.len(),
            rules = report.compiled_rules,
            written = report.written.len(),
            removed = report.removed.len(),
            "Generation complete"
        );
        Ok(report)
    }

    /// Collect and compile without generating models or writing anything
    pub fn check(&self, mut schema: Schema) -> Result<Compilation> {
        let mut plugin = ValidatePlugin::new(self.config.naming);
        plugin.mutate_schema(&mut schema)?;

        let mut names = plugin.names().clone();
        self.refine_names(&schema, &mut names);
        Ok(Compilation::compile(plugin.annotations(), &names))
    }

    /// Rewrite one rule as if written on `type_name`
    pub fn rewrite(&self, schema: &Schema, type_name: &str, rule: &str) -> Result<String> {
        schema
            .get_type(type_name)
            .filter(|def| def.is_input_object())
            .ok_or_else(|| Error::invalid_schema(format!("{} is not an input object type", type_name)))?;

        let mut names = FieldNameMap::seed(schema, self.config.naming);
        self.refine_names(schema, &mut names);
        Ok(rewrite_rule(rule, type_name, &names))
    }

    /// Apply the identifiers the model generator would choose
    fn refine_names(&self, schema: &Schema, names: &mut FieldNameMap) {
        let generator = ModelGenerator::new(&self.config);
        for def in schema.input_objects() {
            for field in &def.fields {
                let base = generator.base_field(schema, def, field);
                names.refine(&def.name, &field.name, &base.ident);
            }
        }
    }
}
